//! Relay wire format.
//!
//! Every request starts with one tag byte:
//!
//! | Tag | Payload | Reply |
//! |---|---|---|
//! | `I` | seat byte, room name, `\n` | `S` or `F` |
//! | `P` | one command byte | none |
//! | `G` | none | command byte or [`NO_DATA`] |
//! | `O` | none | none, connection closes |
//!
//! TCP may split or coalesce requests, so [`RequestDecoder`] buffers bytes
//! and yields requests as soon as they are complete.

use crate::error::ProtocolError;
use tracing::{instrument, warn};

/// Login request tag.
pub const TAG_LOGIN: u8 = b'I';
/// Put request tag.
pub const TAG_PUT: u8 = b'P';
/// Get request tag.
pub const TAG_GET: u8 = b'G';
/// Logout request tag.
pub const TAG_LOGOUT: u8 = b'O';

/// Login accepted.
pub const REPLY_SUCCESS: u8 = b'S';
/// Login refused.
pub const REPLY_FAILURE: u8 = b'F';
/// Get found nothing from the peer.
pub const NO_DATA: u8 = 0x16;

/// Longest room name accepted before the terminator.
pub const MAX_ROOM_NAME: usize = 255;

/// One client request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    /// Claim `seat` in `room`.
    Login {
        /// Raw seat byte, 0 or 1 when valid.
        seat: u8,
        /// Room name.
        room: String,
    },
    /// Forward a command byte to the peer.
    Put(u8),
    /// Fetch the peer's oldest pending command.
    Get,
    /// Release the seat and hang up.
    Logout,
}

impl Request {
    /// Wire bytes for this request.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Request::Login { seat, room } => {
                let mut bytes = Vec::with_capacity(room.len() + 3);
                bytes.push(TAG_LOGIN);
                bytes.push(*seat);
                bytes.extend_from_slice(room.as_bytes());
                bytes.push(b'\n');
                bytes
            }
            Request::Put(command) => vec![TAG_PUT, *command],
            Request::Get => vec![TAG_GET],
            Request::Logout => vec![TAG_LOGOUT],
        }
    }
}

/// Incremental request parser.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    buffer: Vec<u8>,
}

impl RequestDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly read bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes buffered but not yet part of a complete request.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Pops the next complete request.
    ///
    /// Returns `Ok(None)` when more bytes are needed. Unknown tag bytes are
    /// skipped.
    #[instrument(skip(self), fields(buffered = self.buffer.len()))]
    pub fn next_request(&mut self) -> Result<Option<Request>, ProtocolError> {
        loop {
            let Some(&tag) = self.buffer.first() else {
                return Ok(None);
            };
            let (request, consumed) = match tag {
                TAG_LOGIN => match self.login()? {
                    Some(parsed) => parsed,
                    None => return Ok(None),
                },
                TAG_PUT => match self.buffer.get(1) {
                    Some(&command) => (Request::Put(command), 2),
                    None => return Ok(None),
                },
                TAG_GET => (Request::Get, 1),
                TAG_LOGOUT => (Request::Logout, 1),
                other => {
                    warn!(byte = other, "Skipping unknown request byte");
                    self.buffer.remove(0);
                    continue;
                }
            };
            self.buffer.drain(..consumed);
            return Ok(Some(request));
        }
    }

    fn login(&self) -> Result<Option<(Request, usize)>, ProtocolError> {
        let Some(&seat) = self.buffer.get(1) else {
            return Ok(None);
        };
        let name = &self.buffer[2..];
        match name.iter().position(|b| *b == b'\n') {
            Some(end) if end <= MAX_ROOM_NAME => {
                let room = String::from_utf8_lossy(&name[..end]).into_owned();
                Ok(Some((Request::Login { seat, room }, end + 3)))
            }
            Some(_) => Err(ProtocolError::RoomNameTooLong {
                limit: MAX_ROOM_NAME,
            }),
            None if name.len() > MAX_ROOM_NAME => Err(ProtocolError::RoomNameTooLong {
                limit: MAX_ROOM_NAME,
            }),
            None => Ok(None),
        }
    }
}
