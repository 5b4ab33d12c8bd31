//! Producers of client input.
//!
//! Each source is drained by a [`Listener`] task into one shared
//! [`BlockingQueue`](crate::sync::BlockingQueue), tagged with its
//! [`Origin`] so the game loop knows whose command it is.

mod keyboard;
mod listener;
mod remote;

pub use keyboard::{KeyboardSource, signal_for_key};
pub use listener::Listener;
pub use remote::{RemoteSender, RemoteSource, connect};

use crate::error::SourceError;
use crate::sync::Signal;
use std::future::Future;

/// Where an input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The local terminal.
    Keyboard,
    /// The relay, carrying the opponent's keys.
    Remote,
}

/// A signal tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    /// Producer.
    pub origin: Origin,
    /// What arrived.
    pub signal: Signal,
}

/// Something that yields signals one at a time.
pub trait InputSource: Send + 'static {
    /// Waits for the next signal.
    ///
    /// `Ok(None)` means something arrived that carries no signal; the caller
    /// should ask again. An error ends the source.
    fn next_signal(&mut self) -> impl Future<Output = Result<Option<Signal>, SourceError>> + Send;
}
