//! Terminal client: rendering, input sources and the game loops.
//!
//! Input sources run as tokio tasks; the relay connection is a tokio socket
//! and keys come from crossterm's event stream. The loops themselves block,
//! so they run on tokio's blocking pool.

mod inbox;
mod play;
pub mod sources;
pub mod ui;

pub use inbox::{AfterGame, Inbox};
pub use play::{
    hot_seat_perspective, local_status, networked_status, outcome_message, run_local,
    run_networked,
};
