//! Per-connection relay state.
//!
//! A [`Session`] turns decoded requests into replies. It holds no socket, so
//! the server loop owns all I/O and tests can drive sessions directly.

use crate::error::RoomError;
use crate::games::checkers::rotate_key;
use crate::protocol::{NO_DATA, REPLY_FAILURE, REPLY_SUCCESS, Request};
use crate::room::{Room, RoomManager, SEATS};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Login state of one connection.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No seat claimed yet.
    #[default]
    NotLoggedIn,
    /// Holding `seat` in `room_name`.
    LoggedIn {
        /// Claimed seat.
        seat: usize,
        /// Registry key of the room.
        room_name: String,
        /// Shared room handle.
        room: Arc<Room>,
    },
}

/// What the server should do after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Write one byte back.
    Reply(u8),
    /// Write nothing.
    Nothing,
    /// The sender's previous command has not been taken yet. Await
    /// [`Session::deliver`] with this command before reading further requests.
    Hold(u8),
    /// Hang up.
    Close,
}

/// Protocol state machine for one TCP connection.
///
/// Dropping a logged-in session releases its seat.
#[derive(Debug)]
pub struct Session {
    manager: RoomManager,
    state: SessionState,
}

impl Session {
    /// Creates a session that has not logged in.
    pub fn new(manager: RoomManager) -> Self {
        Self {
            manager,
            state: SessionState::NotLoggedIn,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Claimed seat, if logged in.
    pub fn seat(&self) -> Option<usize> {
        match &self.state {
            SessionState::LoggedIn { seat, .. } => Some(*seat),
            SessionState::NotLoggedIn => None,
        }
    }

    /// Handles one request.
    #[instrument(skip(self), fields(seat = ?self.seat()))]
    pub fn handle(&mut self, request: Request) -> Action {
        match request {
            Request::Login { seat, room } => match self.login(seat, room) {
                Ok(()) => Action::Reply(REPLY_SUCCESS),
                Err(e) => {
                    warn!(error = %e, "Login failed");
                    Action::Reply(REPLY_FAILURE)
                }
            },
            Request::Put(command) => match &self.state {
                SessionState::LoggedIn { seat, room, .. } => {
                    if room.try_put(*seat, command) {
                        debug!(command, "Queued");
                        Action::Nothing
                    } else {
                        debug!(command, "Held until the opponent catches up");
                        Action::Hold(command)
                    }
                }
                SessionState::NotLoggedIn => {
                    debug!("Put ignored before login");
                    Action::Nothing
                }
            },
            Request::Get => match &self.state {
                SessionState::LoggedIn { seat, room, .. } => {
                    Action::Reply(room.take_for(*seat).map_or(NO_DATA, rotate_key))
                }
                SessionState::NotLoggedIn => Action::Nothing,
            },
            Request::Logout => {
                self.close();
                Action::Close
            }
        }
    }

    fn login(&mut self, seat: u8, room_name: String) -> Result<(), RoomError> {
        if matches!(self.state, SessionState::LoggedIn { .. }) {
            return Err(RoomError::AlreadyLoggedIn);
        }
        let seat_index = usize::from(seat);
        if seat_index >= SEATS {
            return Err(RoomError::InvalidSeat { seat });
        }
        let room = self.manager.login(&room_name, seat_index)?;
        self.state = SessionState::LoggedIn {
            seat: seat_index,
            room_name,
            room,
        };
        Ok(())
    }

    /// Queues a held command once the opponent has taken the previous one.
    pub async fn deliver(&self, command: u8) {
        if let SessionState::LoggedIn { seat, room, .. } = &self.state {
            room.put(*seat, command).await;
            debug!(command, "Held command queued");
        }
    }

    /// Releases the seat, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let SessionState::LoggedIn {
            seat, room_name, ..
        } = std::mem::take(&mut self.state)
        {
            match self.manager.logout(&room_name, seat) {
                Ok(()) => info!(room = %room_name, seat, "Session closed"),
                Err(e) => warn!(room = %room_name, seat, error = %e, "Logout failed"),
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(seat: u8, room: &str) -> Request {
        Request::Login {
            seat,
            room: room.to_string(),
        }
    }

    #[test]
    fn second_login_on_same_seat_fails() {
        let manager = RoomManager::new();
        let mut first = Session::new(manager.clone());
        let mut second = Session::new(manager.clone());
        assert_eq!(first.handle(login(0, "r1")), Action::Reply(REPLY_SUCCESS));
        assert_eq!(second.handle(login(0, "r1")), Action::Reply(REPLY_FAILURE));
        drop(first);
        assert_eq!(second.handle(login(0, "r1")), Action::Reply(REPLY_SUCCESS));
    }

    #[test]
    fn session_cannot_log_in_twice() {
        let mut session = Session::new(RoomManager::new());
        session.handle(login(0, "r1"));
        assert_eq!(session.handle(login(1, "r1")), Action::Reply(REPLY_FAILURE));
        assert_eq!(session.seat(), Some(0));
    }

    #[test]
    fn out_of_range_seat_is_refused() {
        let manager = RoomManager::new();
        let mut session = Session::new(manager.clone());
        assert_eq!(session.handle(login(2, "r1")), Action::Reply(REPLY_FAILURE));
        assert!(!manager.contains("r1"));
    }

    #[test]
    fn requests_before_login_are_ignored() {
        let mut session = Session::new(RoomManager::new());
        assert_eq!(session.handle(Request::Put(b'a')), Action::Nothing);
        assert_eq!(session.handle(Request::Get), Action::Nothing);
    }

    #[test]
    fn get_relays_rotated_peer_commands() {
        let manager = RoomManager::new();
        let mut zero = Session::new(manager.clone());
        let mut one = Session::new(manager);
        zero.handle(login(0, "r1"));
        one.handle(login(1, "r1"));
        assert_eq!(zero.handle(Request::Put(b'w')), Action::Nothing);
        assert_eq!(zero.handle(Request::Get), Action::Reply(NO_DATA));
        assert_eq!(one.handle(Request::Get), Action::Reply(b'x'));
        assert_eq!(zero.handle(Request::Put(b' ')), Action::Nothing);
        assert_eq!(one.handle(Request::Get), Action::Reply(b' '));
        assert_eq!(one.handle(Request::Get), Action::Reply(NO_DATA));
    }

    #[test]
    fn second_put_is_held_until_taken() {
        let manager = RoomManager::new();
        let mut zero = Session::new(manager.clone());
        let mut one = Session::new(manager);
        zero.handle(login(0, "r1"));
        one.handle(login(1, "r1"));
        assert_eq!(zero.handle(Request::Put(b'a')), Action::Nothing);
        for _ in 0..100 {
            assert_eq!(zero.handle(Request::Put(b'e')), Action::Hold(b'e'));
        }
        assert_eq!(one.handle(Request::Get), Action::Reply(b'd'));
        assert_eq!(one.handle(Request::Get), Action::Reply(NO_DATA));
    }

    #[tokio::test]
    async fn deliver_completes_after_peer_get() {
        let manager = RoomManager::new();
        let mut zero = Session::new(manager.clone());
        let mut one = Session::new(manager);
        zero.handle(login(0, "r1"));
        one.handle(login(1, "r1"));
        zero.handle(Request::Put(b'a'));
        assert_eq!(zero.handle(Request::Put(b'e')), Action::Hold(b'e'));

        let deliver = zero.deliver(b'e');
        tokio::pin!(deliver);
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(20), &mut deliver)
                .await
                .is_err()
        );
        assert_eq!(one.handle(Request::Get), Action::Reply(b'd'));
        deliver.await;
        assert_eq!(one.handle(Request::Get), Action::Reply(b'z'));
    }

    #[test]
    fn logout_releases_seat_and_closes() {
        let manager = RoomManager::new();
        let mut session = Session::new(manager.clone());
        session.handle(login(1, "r1"));
        assert_eq!(session.handle(Request::Logout), Action::Close);
        assert!(!manager.contains("r1"));
        assert_eq!(session.seat(), None);
    }
}
