//! Relay connection for networked play.
//!
//! The connection is split in two: a [`RemoteSender`] that writes requests,
//! shared by whoever needs to send, and a [`RemoteSource`] that owns the
//! read half and polls the relay for the opponent's commands.

use super::InputSource;
use crate::error::{ClientError, SourceError};
use crate::protocol::{NO_DATA, REPLY_SUCCESS, Request};
use crate::sync::Signal;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Write half of a relay connection.
#[derive(Debug, Clone)]
pub struct RemoteSender {
    writer: Arc<Mutex<OwnedWriteHalf>>,
}

impl RemoteSender {
    async fn send(&self, request: &Request) -> Result<(), SourceError> {
        self.writer.lock().await.write_all(&request.encode()).await?;
        Ok(())
    }

    /// Forwards one key byte to the opponent.
    pub async fn put(&self, command: u8) -> Result<(), SourceError> {
        self.send(&Request::Put(command)).await
    }

    /// Releases the seat. The relay closes the connection afterwards.
    pub async fn logout(&self) -> Result<(), SourceError> {
        self.send(&Request::Logout).await
    }
}

/// Read half of a relay connection, polling `GET` on an interval.
#[derive(Debug)]
pub struct RemoteSource {
    reader: OwnedReadHalf,
    sender: RemoteSender,
    ticker: Interval,
}

impl RemoteSource {
    async fn read_byte(&mut self) -> Result<u8, SourceError> {
        let mut reply = [0u8; 1];
        if self.reader.read(&mut reply).await? == 0 {
            return Err(SourceError::Closed);
        }
        Ok(reply[0])
    }
}

/// Connects and claims `seat` in `room`.
///
/// Returns the polling source and a sender for this player's own keys.
#[instrument(skip(interval))]
pub async fn connect(
    host: &str,
    port: u16,
    seat: u8,
    room: &str,
    interval: Duration,
) -> Result<(RemoteSource, RemoteSender), ClientError> {
    let stream = TcpStream::connect((host, port)).await?;
    stream.set_nodelay(true)?;
    let (reader, writer) = stream.into_split();
    let sender = RemoteSender {
        writer: Arc::new(Mutex::new(writer)),
    };

    sender
        .send(&Request::Login {
            seat,
            room: room.to_string(),
        })
        .await?;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut source = RemoteSource {
        reader,
        sender: sender.clone(),
        ticker,
    };
    if source.read_byte().await? != REPLY_SUCCESS {
        return Err(ClientError::LoginRejected {
            seat,
            room: room.to_string(),
        });
    }

    info!(seat, room, "Logged in to relay");
    Ok((source, sender))
}

impl InputSource for RemoteSource {
    async fn next_signal(&mut self) -> Result<Option<Signal>, SourceError> {
        self.ticker.tick().await;
        self.sender.send(&Request::Get).await?;
        match self.read_byte().await? {
            NO_DATA => Ok(None),
            command => {
                debug!(command, "Received remote command");
                Ok(Some(Signal::Command(command)))
            }
        }
    }
}
