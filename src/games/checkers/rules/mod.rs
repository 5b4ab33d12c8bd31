//! Game rules for star-board checkers.
//!
//! Pure functions over a [`Board`](super::Board). Rules are kept apart from
//! the move engine so renderers and tests can evaluate positions directly.

pub mod win;

pub use win::{check_win, tip_cells, winner};
