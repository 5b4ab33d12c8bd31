//! Relay server: a tokio accept loop with one task per connection.

use crate::config::RelayConfig;
use crate::protocol::RequestDecoder;
use crate::room::RoomManager;
use crate::session::{Action, Session};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

/// Bytes a held connection may buffer before it stops reading.
const HOLD_BUFFER_LIMIT: usize = 1024;

/// Pairs clients in named rooms and forwards their commands.
#[derive(Debug)]
pub struct RelayServer {
    listener: TcpListener,
    rooms: RoomManager,
}

impl RelayServer {
    /// Binds the listening socket.
    #[instrument(fields(address = %config.address()))]
    pub async fn bind(config: &RelayConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        info!(local = %listener.local_addr()?, "Relay listening");
        Ok(Self {
            listener,
            rooms: RoomManager::new(),
        })
    }

    /// Address actually bound. Useful when binding port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Registry shared by every connection.
    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    /// Accepts connections until accepting fails.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let rooms = self.rooms.clone();
            info!(%peer, "Connection accepted");
            tokio::spawn(
                async move {
                    match serve_connection(stream, rooms).await {
                        Ok(()) => info!("Connection closed"),
                        Err(e) => error!(error = %e, "Connection failed"),
                    }
                }
                .instrument(info_span!("connection", %peer)),
            );
        }
    }
}

/// Runs one connection's read → handle → write loop.
///
/// The session's seat is released when this returns, however it returns.
async fn serve_connection(mut stream: TcpStream, rooms: RoomManager) -> std::io::Result<()> {
    let mut session = Session::new(rooms);
    let mut decoder = RequestDecoder::new();
    let mut buf = [0u8; 512];

    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            debug!(seat = ?session.seat(), "Peer hung up");
            return Ok(());
        }
        decoder.extend(&buf[..n]);

        loop {
            let request = match decoder.next_request() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Protocol error, dropping connection");
                    return Ok(());
                }
            };
            match session.handle(request) {
                Action::Reply(byte) => stream.write_all(&[byte]).await?,
                Action::Nothing => {}
                Action::Hold(command) => {
                    if !hold(&session, command, &mut stream, &mut decoder, &mut buf).await? {
                        debug!(seat = ?session.seat(), "Peer hung up while held");
                        return Ok(());
                    }
                }
                Action::Close => {
                    stream.shutdown().await?;
                    return Ok(());
                }
            }
        }
    }
}

/// Waits until a held command is queued.
///
/// Reading continues meanwhile so a hangup is noticed, but requests are only
/// buffered, never handled. Returns false when the peer hung up.
async fn hold(
    session: &Session,
    command: u8,
    stream: &mut TcpStream,
    decoder: &mut RequestDecoder,
    buf: &mut [u8],
) -> std::io::Result<bool> {
    let deliver = session.deliver(command);
    tokio::pin!(deliver);
    loop {
        tokio::select! {
            () = &mut deliver => return Ok(true),
            read = stream.read(buf), if decoder.pending() < HOLD_BUFFER_LIMIT => {
                let n = read?;
                if n == 0 {
                    return Ok(false);
                }
                decoder.extend(&buf[..n]);
            }
        }
    }
}
