//! Win detection for star-board checkers.

use super::super::{Board, Cell, Player, Pos, Side};
use strum::IntoEnumIterator;
use tracing::instrument;

/// Depth of each tip in rows.
const TIP_ROWS: usize = 4;

/// The ten cells forming the tip on `side`.
///
/// Top tip row `i` spans columns `12 − i ..= 12 + i` in steps of two; the
/// bottom tip mirrors it on rows 13..=16.
pub fn tip_cells(side: Side) -> impl Iterator<Item = Pos> {
    (0..TIP_ROWS).flat_map(move |i| {
        let row = match side {
            Side::Top => i,
            Side::Bottom => 16 - i,
        };
        (0..=i).filter_map(move |k| Pos::new(row, 12 - i + 2 * k))
    })
}

/// True iff every tip cell on `side` holds `player`'s piece.
#[instrument(skip(board))]
pub fn check_win(board: &Board, side: Side, player: Player) -> bool {
    tip_cells(side).all(|pos| board.get(pos) == Cell::Occupied(player))
}

/// Returns a player who has filled their target tip, if any.
#[instrument(skip(board))]
pub fn winner(board: &Board) -> Option<Player> {
    Player::iter().find(|p| check_win(board, p.target_side(), *p))
}
