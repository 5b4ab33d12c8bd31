//! Rooms pair two seats around a one-command outbox per seat.

use crate::error::RoomError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::{debug, info, instrument, warn};

/// Seats per room.
pub const SEATS: usize = 2;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One relay game: two seats and the commands in flight between them.
///
/// Each seat has a single outbox slot. A seat cannot queue a second command
/// until the opponent has taken the first, so nothing piles up when one side
/// stops polling.
#[derive(Debug, Default)]
pub struct Room {
    occupancy: Mutex<[bool; SEATS]>,
    outbox: Mutex<[Option<u8>; SEATS]>,
    drained: Notify,
}

impl Room {
    /// Creates an empty room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a seat.
    #[instrument(skip(self))]
    pub fn player_login(&self, seat: usize) -> Result<(), RoomError> {
        let mut occupancy = lock(&self.occupancy);
        let slot = occupancy
            .get_mut(seat)
            .ok_or_else(|| invalid_seat(seat))?;
        if *slot {
            return Err(RoomError::SeatTaken { seat });
        }
        *slot = true;
        Ok(())
    }

    /// Releases a seat.
    #[instrument(skip(self))]
    pub fn player_logout(&self, seat: usize) -> Result<(), RoomError> {
        let mut occupancy = lock(&self.occupancy);
        match occupancy.get_mut(seat) {
            Some(slot) if *slot => {
                *slot = false;
                Ok(())
            }
            Some(_) => Err(RoomError::SeatFree { seat }),
            None => Err(invalid_seat(seat)),
        }
    }

    /// True when both seats are free.
    pub fn is_vacant(&self) -> bool {
        lock(&self.occupancy).iter().all(|taken| !taken)
    }

    /// Stores a command from `seat` if its outbox is empty.
    ///
    /// Returns false, leaving the outbox untouched, while the previous
    /// command is still waiting for the opponent.
    pub fn try_put(&self, seat: usize, command: u8) -> bool {
        let mut outbox = lock(&self.outbox);
        let Some(slot) = outbox.get_mut(seat) else {
            warn!(seat, "Put from invalid seat dropped");
            return true;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(command);
        true
    }

    /// Stores a command from `seat`, waiting until its outbox is free.
    #[instrument(skip(self))]
    pub async fn put(&self, seat: usize, command: u8) {
        loop {
            // Registered before the check so a drain in between is not missed.
            let drained = self.drained.notified();
            if self.try_put(seat, command) {
                return;
            }
            debug!("Outbox full, waiting for opponent");
            drained.await;
        }
    }

    /// Takes the command the other seat left, if any.
    ///
    /// A seat never receives its own commands back.
    pub fn take_for(&self, seat: usize) -> Option<u8> {
        let other = SEATS.checked_sub(1)?.checked_sub(seat)?;
        let command = lock(&self.outbox).get_mut(other)?.take();
        if command.is_some() {
            self.drained.notify_waiters();
        }
        command
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        lock(&self.outbox).iter().flatten().count()
    }
}

fn invalid_seat(seat: usize) -> RoomError {
    RoomError::InvalidSeat {
        seat: u8::try_from(seat).unwrap_or(u8::MAX),
    }
}

/// Registry of live rooms keyed by name.
#[derive(Debug, Clone, Default)]
pub struct RoomManager {
    rooms: Arc<Mutex<HashMap<String, Arc<Room>>>>,
}

impl RoomManager {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room manager");
        Self::default()
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<String, Arc<Room>>> {
        lock(&self.rooms)
    }

    /// Claims `seat` in `name`, creating the room on first use.
    ///
    /// Lookup and claim happen under one registry lock so a concurrent logout
    /// cannot remove the room in between. A room created by a failed login is
    /// removed again.
    #[instrument(skip(self))]
    pub fn login(&self, name: &str, seat: usize) -> Result<Arc<Room>, RoomError> {
        let mut rooms = self.rooms();
        let room = Arc::clone(rooms.entry(name.to_string()).or_insert_with(|| {
            debug!(room = name, "Creating room");
            Arc::new(Room::new())
        }));
        match room.player_login(seat) {
            Ok(()) => {
                info!(room = name, seat, "Seat claimed");
                Ok(room)
            }
            Err(e) => {
                if room.is_vacant() {
                    rooms.remove(name);
                }
                warn!(room = name, seat, error = %e, "Login refused");
                Err(e)
            }
        }
    }

    /// Releases `seat` and drops the room once nobody is seated.
    #[instrument(skip(self))]
    pub fn logout(&self, name: &str, seat: usize) -> Result<(), RoomError> {
        let mut rooms = self.rooms();
        let Some(room) = rooms.get(name).cloned() else {
            return Err(RoomError::SeatFree { seat });
        };
        room.player_logout(seat)?;
        if room.is_vacant() {
            rooms.remove(name);
            debug!(room = name, "Room removed");
        }
        info!(room = name, seat, "Seat released");
        Ok(())
    }

    /// Whether a room with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.rooms().contains_key(name)
    }

    /// True when no rooms exist.
    pub fn is_empty(&self) -> bool {
        self.rooms().is_empty()
    }
}
