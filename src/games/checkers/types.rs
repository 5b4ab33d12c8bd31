//! Core domain types for star-board Chinese Checkers.

use crate::error::BoardError;
use serde::{Deserialize, Serialize};

/// Number of board rows.
pub const ROWS: usize = 17;

/// Number of board columns.
pub const COLS: usize = 25;

/// Initial layout, one character per cell in row-major order.
///
/// `' '` is outside the star, `'O'` is an empty hole, `'@'` is Player 0
/// and `'*'` is Player 1.
const INITIAL_LAYOUT: [&str; ROWS] = [
    "            *            ",
    "           * *           ",
    "          * * *          ",
    "         * * * *         ",
    "O O O O O O O O O O O O O",
    " O O O O O O O O O O O O ",
    "  O O O O O O O O O O O  ",
    "   O O O O O O O O O O   ",
    "    O O O O O O O O O    ",
    "   O O O O O O O O O O   ",
    "  O O O O O O O O O O O  ",
    " O O O O O O O O O O O O ",
    "O O O O O O O O O O O O O",
    "         @ @ @ @         ",
    "          @ @ @          ",
    "           @ @           ",
    "            @            ",
];

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Player {
    /// Player 0 (moves first, starts at the bottom tip).
    Zero,
    /// Player 1 (starts at the top tip).
    One,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }

    /// Returns the seat index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }

    /// Creates a player from a seat index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::Zero),
            1 => Some(Player::One),
            _ => None,
        }
    }

    /// The side of the board this player starts on.
    pub fn home_side(self) -> Side {
        match self {
            Player::Zero => Side::Bottom,
            Player::One => Side::Top,
        }
    }

    /// The tip this player must fill to win.
    pub fn target_side(self) -> Side {
        self.home_side().opposite()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index())
    }
}

/// One of the two star tips that face each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Rows 0..=3.
    Top,
    /// Rows 13..=16.
    Bottom,
}

impl Side {
    /// Returns the facing side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Playable and free.
    Empty,
    /// Holds a player's piece.
    Occupied(Player),
    /// Outside the star. Never a move target.
    Unused,
}

impl Cell {
    /// True for empty holes.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// True for cells holding any piece.
    pub fn is_occupied(self) -> bool {
        matches!(self, Cell::Occupied(_))
    }

    fn from_layout(c: char) -> Self {
        match c {
            'O' => Cell::Empty,
            '@' => Cell::Occupied(Player::Zero),
            '*' => Cell::Occupied(Player::One),
            _ => Cell::Unused,
        }
    }
}

/// A grid coordinate, always inside the 17×25 extents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Pos {
    row: usize,
    col: usize,
}

impl Pos {
    /// Creates a position, or `None` outside the grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < ROWS && col < COLS).then_some(Self { row, col })
    }

    /// Creates a position from signed coordinates, or `None` outside the grid.
    pub fn from_signed(row: i32, col: i32) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        Self::new(row, col)
    }

    /// Row index.
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index.
    pub fn col(self) -> usize {
        self.col
    }

    /// Shifts by a delta, or `None` when the result leaves the grid.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Self::from_signed(self.row as i32 + d_row, self.col as i32 + d_col)
    }

    /// Index into a row-major array.
    pub fn index(self) -> usize {
        self.row * COLS + self.col
    }

    /// Inverse of [`Pos::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / COLS, index % COLS)
    }

    /// The same cell seen from the opposite side of the table.
    pub fn rotated(self) -> Self {
        Self {
            row: ROWS - 1 - self.row,
            col: COLS - 1 - self.col,
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 17×25 star board.
///
/// Serialised as its row-major cells. Deserialising checks the size and the
/// star outline, so a loaded board is always safe to index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates the starting position.
    pub fn new() -> Self {
        let cells = INITIAL_LAYOUT
            .iter()
            .flat_map(|row| row.chars().map(Cell::from_layout))
            .collect();
        Self { cells }
    }

    /// Creates a board with the star's holes all empty.
    pub fn empty() -> Self {
        let mut board = Self::new();
        for cell in &mut board.cells {
            if cell.is_occupied() {
                *cell = Cell::Empty;
            }
        }
        board
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.index()]
    }

    /// Sets the cell at the given position.
    ///
    /// Unused cells are fixed walls; writes to them, and writes of `Unused`
    /// onto playable cells, are rejected.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), &'static str> {
        let current = &mut self.cells[pos.index()];
        if *current == Cell::Unused || cell == Cell::Unused {
            return Err("Unused cells are fixed");
        }
        *current = cell;
        Ok(())
    }

    /// Checks if a position is a free hole.
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_empty()
    }

    /// Exchanges the contents of two cells.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        self.cells.swap(a.index(), b.index());
    }

    /// Overwrites this board with another one.
    pub fn copy_from(&mut self, other: &Board) {
        self.cells.copy_from_slice(&other.cells);
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates over positions holding the given player's pieces.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| **c == Cell::Occupied(player))
            .filter_map(|(i, _)| Pos::from_index(i))
    }

    /// First piece of `player` met when scanning row-major from `side`.
    ///
    /// From the bottom the scan runs backward from the last cell, from the
    /// top it runs forward from the first.
    pub fn first_piece_from(&self, side: Side, player: Player) -> Option<Pos> {
        let target = Cell::Occupied(player);
        let found = match side {
            Side::Top => self.cells.iter().position(|c| *c == target),
            Side::Bottom => self.cells.iter().rposition(|c| *c == target),
        };
        found.and_then(Pos::from_index)
    }

    /// Formats the board as plain text, one line per row.
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(ROWS * (COLS + 1));
        for row in self.cells.chunks(COLS) {
            for cell in row {
                result.push(match cell {
                    Cell::Unused => ' ',
                    Cell::Empty => 'O',
                    Cell::Occupied(Player::Zero) => '@',
                    Cell::Occupied(Player::One) => '*',
                });
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        let outline = Self::new();
        if cells.len() != outline.cells.len() {
            return Err(BoardError::WrongSize {
                expected: outline.cells.len(),
                found: cells.len(),
            });
        }
        if let Some(index) = cells
            .iter()
            .zip(&outline.cells)
            .position(|(cell, star)| (*cell == Cell::Unused) != (*star == Cell::Unused))
        {
            return Err(BoardError::OutlineMismatch { index });
        }
        Ok(Self { cells })
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}
