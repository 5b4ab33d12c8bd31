//! Error types for the relay, the client and configuration.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// Seat arbitration failure inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RoomError {
    /// The seat already has a player.
    #[display("Seat {} is already taken", seat)]
    SeatTaken {
        /// Requested seat.
        seat: usize,
    },
    /// The seat was not occupied.
    #[display("Seat {} is not occupied", seat)]
    SeatFree {
        /// Released seat.
        seat: usize,
    },
    /// Seats are 0 and 1.
    #[display("Seat byte {} is out of range", seat)]
    InvalidSeat {
        /// Raw seat byte from the wire.
        seat: u8,
    },
    /// The connection already holds a seat.
    #[display("Session is already logged in")]
    AlreadyLoggedIn,
}

/// Cell data that does not describe a star board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// The grid has the wrong number of cells.
    #[display("Board has {} cells, expected {}", found, expected)]
    WrongSize {
        /// Cells required.
        expected: usize,
        /// Cells supplied.
        found: usize,
    },
    /// A cell disagrees with the star outline.
    #[display("Cell {} does not match the star outline", index)]
    OutlineMismatch {
        /// Row-major index of the first offending cell.
        index: usize,
    },
}

/// Malformed wire input. Closes the offending connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// No `\n` within the room name limit.
    #[display("Room name exceeds {} bytes without terminator", limit)]
    RoomNameTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
}

/// Failure reading from an input source.
#[derive(Debug, Display, Error, From)]
pub enum SourceError {
    /// Underlying I/O failed.
    #[display("Input source I/O error: {}", source)]
    #[from]
    Io {
        /// Cause.
        source: std::io::Error,
    },
    /// The peer closed the stream.
    #[display("Input source closed")]
    Closed,
}

/// Failure in a networked client.
#[derive(Debug, Display, Error, From)]
pub enum ClientError {
    /// The relay refused the seat.
    #[display("Login rejected for seat {} in room {}", seat, room)]
    LoginRejected {
        /// Requested seat.
        seat: u8,
        /// Requested room.
        room: String,
    },
    /// The relay connection dropped mid-game.
    #[display("Connection to relay lost")]
    ConnectionLost,
    /// Input source failure.
    #[display("{}", source)]
    #[from]
    Source {
        /// Cause.
        source: SourceError,
    },
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Source {
            source: SourceError::from(err),
        }
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_records_its_origin() {
        let err = ConfigError::new("bad port");
        assert_eq!(err.file, file!());
        assert!(err.to_string().starts_with("Config error: bad port at "));
    }

    #[test]
    fn io_errors_lift_into_client_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err = ClientError::from(io);
        assert!(matches!(err, ClientError::Source { source: SourceError::Io { .. } }));
    }

    #[test]
    fn room_errors_name_the_seat() {
        assert_eq!(RoomError::SeatTaken { seat: 1 }.to_string(), "Seat 1 is already taken");
    }
}
