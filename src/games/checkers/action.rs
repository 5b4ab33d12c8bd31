//! Commands fed to the move engine, and the key alphabet that produces them.
//!
//! Keys are single bytes so the same alphabet travels unchanged over the
//! relay. A [`Perspective`] sits between the keys and the engine: a flipped
//! view maps each direction key to its opposite so that "up" always points
//! away from the viewer's home tip.

use super::direction::Direction;
use super::types::{Board, Cell, Pos};
use serde::{Deserialize, Serialize};

/// Toggles selection, or ends the turn once a piece has moved.
pub const KEY_TOGGLE: u8 = b' ';

/// Requests a replay of the current turn's moves.
pub const KEY_REPLAY: u8 = b'r';

/// Keymap A in direction-table order: Left, LeftUp, RightUp, LeftDown,
/// RightDown, Right.
const KEYMAP_A: [u8; 6] = *b"awezxd";

/// Keymap B in direction-table order.
const KEYMAP_B: [u8; 6] = *b"huinmk";

/// An engine input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Select, deselect or commit.
    Toggle,
    /// Step, hop or navigate in a direction.
    Move(Direction),
    /// Animate the current turn.
    Replay,
    /// Any other byte. Ignored by the engine.
    Unknown,
}

impl Command {
    /// Decodes a key byte.
    pub fn from_key(key: u8) -> Self {
        match key {
            KEY_TOGGLE => Command::Toggle,
            KEY_REPLAY => Command::Replay,
            _ => direction_for_key(key).map_or(Command::Unknown, Command::Move),
        }
    }
}

/// Maps a key of either keymap to its direction.
pub fn direction_for_key(key: u8) -> Option<Direction> {
    KEYMAP_A
        .iter()
        .position(|k| *k == key)
        .or_else(|| KEYMAP_B.iter().position(|k| *k == key))
        .and_then(Direction::from_index)
}

/// The keymap-A key for a direction.
pub fn key_for_direction(direction: Direction) -> u8 {
    KEYMAP_A[direction.index()]
}

/// Which way round the local viewer sees the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Perspective {
    flipped: bool,
}

impl Perspective {
    /// Canonical view: Player 0's tip at the bottom.
    pub const UPRIGHT: Self = Self { flipped: false };

    /// Rotated 180°: Player 1's tip at the bottom.
    pub const FLIPPED: Self = Self { flipped: true };

    /// Perspective for a seat in networked play.
    pub fn for_seat(seat: usize) -> Self {
        Self { flipped: seat == 1 }
    }

    /// True when the view is rotated.
    pub fn is_flipped(self) -> bool {
        self.flipped
    }

    /// Translates a key pressed by this viewer into an engine command.
    pub fn command(self, key: u8) -> Command {
        match Command::from_key(key) {
            Command::Move(dir) if self.flipped => Command::Move(dir.opposite()),
            other => other,
        }
    }

    /// Maps a canonical position to where this viewer draws it.
    pub fn view_pos(self, pos: Pos) -> Pos {
        if self.flipped { pos.rotated() } else { pos }
    }

    /// Cells in this viewer's row-major drawing order.
    pub fn view_cells(self, board: &Board) -> Vec<Cell> {
        let mut cells = board.cells().to_vec();
        if self.flipped {
            cells.reverse();
        }
        cells
    }
}

/// 180° rotation applied to key bytes: `a..z` mapped through
/// `dbcazfgknjhluiopqrstmvxwye`, everything else unchanged.
///
/// Swaps each direction key with the key of the opposite direction in both
/// keymaps.
pub fn rotate_key(key: u8) -> u8 {
    const TABLE: &[u8; 26] = b"dbcazfgknjhluiopqrstmvxwye";
    if key.is_ascii_lowercase() {
        TABLE[(key - b'a') as usize]
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn both_keymaps_decode() {
        assert_eq!(Command::from_key(b'a'), Command::Move(Direction::Left));
        assert_eq!(Command::from_key(b'h'), Command::Move(Direction::Left));
        assert_eq!(Command::from_key(b'x'), Command::Move(Direction::RightDown));
        assert_eq!(Command::from_key(b'n'), Command::Move(Direction::LeftDown));
        assert_eq!(Command::from_key(b'k'), Command::Move(Direction::Right));
        assert_eq!(Command::from_key(b' '), Command::Toggle);
        assert_eq!(Command::from_key(b'r'), Command::Replay);
        assert_eq!(Command::from_key(b'#'), Command::Unknown);
    }

    #[test]
    fn rotation_swaps_opposite_keys() {
        for dir in Direction::iter() {
            let a = KEYMAP_A[dir.index()];
            let b = KEYMAP_B[dir.index()];
            assert_eq!(rotate_key(a), KEYMAP_A[dir.opposite().index()]);
            assert_eq!(rotate_key(b), KEYMAP_B[dir.opposite().index()]);
        }
    }

    #[test]
    fn rotation_is_an_involution() {
        for key in 0..=u8::MAX {
            assert_eq!(rotate_key(rotate_key(key)), key);
        }
    }

    #[test]
    fn rotation_leaves_controls_alone() {
        assert_eq!(rotate_key(KEY_TOGGLE), KEY_TOGGLE);
        assert_eq!(rotate_key(KEY_REPLAY), KEY_REPLAY);
        assert_eq!(rotate_key(0x16), 0x16);
    }

    #[test]
    fn flipped_perspective_reverses_directions() {
        let view = Perspective::FLIPPED;
        assert_eq!(view.command(b'w'), Command::Move(Direction::RightDown));
        assert_eq!(view.command(b' '), Command::Toggle);
        assert_eq!(Perspective::UPRIGHT.command(b'w'), Command::Move(Direction::LeftUp));
    }

    #[test]
    fn flipped_view_matches_rotated_keys() {
        let view = Perspective::FLIPPED;
        for key in b'a'..=b'z' {
            assert_eq!(view.command(key), Command::from_key(rotate_key(key)));
        }
    }

    #[test]
    fn flipped_cells_are_reversed() {
        let board = Board::new();
        let cells = Perspective::FLIPPED.view_cells(&board);
        assert_eq!(cells.first(), board.cells().last());
        assert_eq!(
            Perspective::FLIPPED.view_pos(Pos::new(16, 12).unwrap()),
            Pos::new(0, 12).unwrap()
        );
    }
}
