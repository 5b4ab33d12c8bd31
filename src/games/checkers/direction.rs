//! Hex-direction geometry over the 17×25 grid.
//!
//! Every direction is a row of [`GEOMETRY`]: its row/column delta. Step,
//! reflection and ray walking are table lookups, never per-direction code.

use super::types::Pos;
use serde::{Deserialize, Serialize};

/// One of the six hex directions.
///
/// Discriminants are chosen so that opposite directions sum to five.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Direction {
    /// Two columns left on the same row.
    Left = 0,
    /// Up one row, one column left.
    LeftUp = 1,
    /// Up one row, one column right.
    RightUp = 2,
    /// Down one row, one column left.
    LeftDown = 3,
    /// Down one row, one column right.
    RightDown = 4,
    /// Two columns right on the same row.
    Right = 5,
}

/// Row and column delta for a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    /// Row change per step.
    pub row: i32,
    /// Column change per step.
    pub col: i32,
}

/// Deltas indexed by `Direction as usize`.
const GEOMETRY: [Delta; 6] = [
    Delta { row: 0, col: -2 },
    Delta { row: -1, col: -1 },
    Delta { row: -1, col: 1 },
    Delta { row: 1, col: -1 },
    Delta { row: 1, col: 1 },
    Delta { row: 0, col: 2 },
];

const ALL: [Direction; 6] = [
    Direction::Left,
    Direction::LeftUp,
    Direction::RightUp,
    Direction::LeftDown,
    Direction::RightDown,
    Direction::Right,
];

impl Direction {
    /// Looks up a direction by its table index.
    pub fn from_index(index: usize) -> Option<Self> {
        ALL.get(index).copied()
    }

    /// Table index of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        ALL[5 - self.index()]
    }

    /// Row and column delta.
    pub fn delta(self) -> Delta {
        GEOMETRY[self.index()]
    }

    /// True for the two same-row directions.
    pub fn is_horizontal(self) -> bool {
        self.delta().row == 0
    }

    /// The neighbouring cell, or `None` past the grid edge.
    pub fn step(self, from: Pos) -> Option<Pos> {
        let d = self.delta();
        from.offset(d.row, d.col)
    }

    /// Whether a step from `from` would leave the grid.
    pub fn out_of_bounds(self, from: Pos) -> bool {
        self.step(from).is_none()
    }

    /// Successive cells from `from` (exclusive) up to the grid edge.
    pub fn ray(self, from: Pos) -> impl Iterator<Item = Pos> {
        std::iter::successors(self.step(from), move |p| self.step(*p))
    }
}

/// Mirrors `source` through `pivot`: `2·pivot − source`.
///
/// Returns `None` when the mirror image falls outside the grid.
pub fn reflect(source: Pos, pivot: Pos) -> Option<Pos> {
    let row = 2 * pivot.row() as i32 - source.row() as i32;
    let col = 2 * pivot.col() as i32 - source.col() as i32;
    Pos::from_signed(row, col)
}
