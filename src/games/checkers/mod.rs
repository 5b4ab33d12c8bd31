//! Two-player Chinese Checkers on a 17×25 star board.
//!
//! The board is stored in one canonical orientation. [`Perspective`]
//! rotates display and keys for whichever player is looking.

mod action;
mod direction;
mod engine;
pub mod rules;
mod types;

pub use action::{
    Command, KEY_REPLAY, KEY_TOGGLE, Perspective, direction_for_key, key_for_direction, rotate_key,
};
pub use direction::{Delta, Direction, reflect};
pub use engine::{Frame, MoveEngine, MoveKind, Outcome};
pub use rules::{check_win, tip_cells, winner};
pub use types::{Board, COLS, Cell, Player, Pos, ROWS, Side};
