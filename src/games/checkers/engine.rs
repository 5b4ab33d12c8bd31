//! Move-legality state machine.
//!
//! The engine owns the canonical board and consumes one [`Command`] at a
//! time. While a piece is lifted the cursor tracks it; otherwise the cursor
//! hops between the current player's pieces. Orientation is not handled
//! here: callers translate keys through a
//! [`Perspective`](super::action::Perspective) first.

use super::action::Command;
use super::direction::{Direction, reflect};
use super::rules::check_win;
use super::types::{Board, Cell, Player, Pos, ROWS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// How the turn's first move was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// A step to an adjacent cell. The only move of the turn.
    SingleStep,
    /// One or more hops over bridges.
    Hop,
}

/// What a command did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Same player keeps control.
    Continue,
    /// The move was committed and the other player is up.
    TurnChanged,
    /// The move was committed and filled the mover's target tip.
    GameWon(Player),
}

/// Best destination found in a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// Adjacent cell.
    Step { to: Pos },
    /// Jump over a bridge. `step` is the adjacent cell in the same direction.
    Hop { to: Pos, step: Option<Pos> },
}

impl Probe {
    fn destination(self) -> Pos {
        match self {
            Probe::Step { to } | Probe::Hop { to, .. } => to,
        }
    }
}

/// One board snapshot of a replayed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Board with the moving piece at `cursor`.
    pub board: Board,
    /// Where the moving piece sits in this frame.
    pub cursor: Pos,
}

/// Selection, movement and turn bookkeeping for one game.
#[derive(Debug, Clone)]
pub struct MoveEngine {
    board: Board,
    current: Player,
    cursor: Pos,
    selected: bool,
    trace: Vec<Pos>,
    move_kind: Option<MoveKind>,
    optional: Option<Pos>,
    last_direction: Option<Direction>,
}

// ─────────────────────────────────────────────────────────────
//  Construction and queries
// ─────────────────────────────────────────────────────────────

impl MoveEngine {
    /// Starts a game from the initial layout with Player 0 to move.
    #[instrument]
    pub fn new() -> Self {
        Self::with_board(Board::new(), Player::Zero)
    }

    /// Starts from an arbitrary position.
    ///
    /// The cursor lands on `current`'s first piece scanned from their home
    /// side.
    pub fn with_board(board: Board, current: Player) -> Self {
        let cursor = home_cursor(&board, current);
        Self {
            board,
            current,
            cursor,
            selected: false,
            trace: Vec::new(),
            move_kind: None,
            optional: None,
            last_direction: None,
        }
    }

    /// Resets to the initial layout.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The canonical board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move.
    pub fn current(&self) -> Player {
        self.current
    }

    /// Cursor or lifted-piece location.
    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    /// Moves the navigation cursor directly.
    ///
    /// Ignored while a piece is lifted.
    pub fn set_cursor(&mut self, pos: Pos) {
        if !self.selected {
            self.cursor = pos;
        }
    }

    /// True while a piece is lifted.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Origins visited this turn, oldest first.
    pub fn trace(&self) -> &[Pos] {
        &self.trace
    }

    /// Kind fixed by the turn's first move.
    pub fn move_kind(&self) -> Option<MoveKind> {
        self.move_kind
    }

    /// Alternate hop target kept after an ambiguous first move.
    pub fn optional(&self) -> Option<Pos> {
        self.optional
    }

    /// Direction of the last successful move this turn.
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Snapshots of the lifted piece at each trace entry, then where it is now.
    ///
    /// Empty unless a piece is lifted and has moved.
    pub fn replay_frames(&self) -> Vec<Frame> {
        if !self.selected || self.trace.is_empty() {
            return Vec::new();
        }
        self.trace
            .iter()
            .map(|&origin| {
                let mut board = self.board.clone();
                board.swap(self.cursor, origin);
                Frame {
                    board,
                    cursor: origin,
                }
            })
            .chain(std::iter::once(Frame {
                board: self.board.clone(),
                cursor: self.cursor,
            }))
            .collect()
    }
}

impl Default for MoveEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn home_cursor(board: &Board, player: Player) -> Pos {
    board
        .first_piece_from(player.home_side(), player)
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────
//  Command handling
// ─────────────────────────────────────────────────────────────

impl MoveEngine {
    /// Applies one command. Illegal moves change nothing.
    #[instrument(skip(self), fields(player = %self.current, cursor = %self.cursor))]
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Toggle => self.toggle(),
            Command::Move(direction) if self.selected => {
                self.move_selected(direction);
                Outcome::Continue
            }
            Command::Move(direction) => {
                self.navigate(direction);
                Outcome::Continue
            }
            Command::Replay | Command::Unknown => Outcome::Continue,
        }
    }

    fn toggle(&mut self) -> Outcome {
        if !self.selected {
            if self.board.get(self.cursor) == Cell::Occupied(self.current) {
                self.selected = true;
                debug!(at = %self.cursor, "Piece lifted");
            }
            return Outcome::Continue;
        }

        self.selected = false;
        let moved = !self.trace.is_empty();
        self.clear_turn();
        if !moved {
            debug!(at = %self.cursor, "Piece put back");
            return Outcome::Continue;
        }

        if check_win(&self.board, self.current.target_side(), self.current) {
            info!(winner = %self.current, "Game won");
            return Outcome::GameWon(self.current);
        }

        self.current = self.current.opponent();
        self.cursor = home_cursor(&self.board, self.current);
        info!(next = %self.current, "Turn changed");
        Outcome::TurnChanged
    }

    fn clear_turn(&mut self) {
        self.trace.clear();
        self.move_kind = None;
        self.optional = None;
        self.last_direction = None;
    }

    fn move_selected(&mut self, direction: Direction) {
        if self.trace.len() == 1
            && self.move_kind == Some(MoveKind::SingleStep)
            && self.last_direction == Some(direction)
            && let Some(target) = self.optional.take()
        {
            self.move_kind = Some(MoveKind::Hop);
            self.relocate(target);
            debug!(to = %target, "Step upgraded to hop");
            return;
        }

        let Some(probe) = self.probe(direction) else {
            return;
        };
        if !self.board.is_empty(probe.destination()) {
            return;
        }

        let committed = match (self.move_kind, probe) {
            _ if self.trace.is_empty() => {
                self.first_move(probe);
                true
            }
            (Some(MoveKind::SingleStep), _) => self.undo_step(probe),
            (_, Probe::Hop { to, .. }) => {
                self.chain_hop(to);
                true
            }
            (_, Probe::Step { .. }) => false,
        };

        if committed {
            self.last_direction = Some(direction);
            debug!(%direction, at = %self.cursor, trace = self.trace.len(), "Moved");
        }
    }

    fn first_move(&mut self, probe: Probe) {
        self.trace.push(self.cursor);
        match probe {
            Probe::Step { to } => {
                self.move_kind = Some(MoveKind::SingleStep);
                self.optional = None;
                self.relocate(to);
            }
            Probe::Hop {
                to,
                step: Some(step),
            } if self.board.is_empty(step) => {
                self.move_kind = Some(MoveKind::SingleStep);
                self.optional = Some(to);
                self.relocate(step);
            }
            Probe::Hop { to, .. } => {
                self.move_kind = Some(MoveKind::Hop);
                self.optional = None;
                self.relocate(to);
            }
        }
    }

    fn undo_step(&mut self, probe: Probe) -> bool {
        let Some(&last) = self.trace.last() else {
            return false;
        };
        let back = match probe {
            Probe::Step { to } => to == last,
            Probe::Hop { step, .. } => step == Some(last),
        };
        if back {
            self.trace.pop();
            self.optional = None;
            self.relocate(last);
        }
        back
    }

    fn chain_hop(&mut self, to: Pos) {
        match self.trace.iter().position(|p| *p == to) {
            Some(k) => self.trace.truncate(k),
            None => self.trace.push(self.cursor),
        }
        self.optional = None;
        self.relocate(to);
    }

    fn relocate(&mut self, to: Pos) {
        self.board.swap(self.cursor, to);
        self.cursor = to;
    }

    /// Looks for a hop in `direction`, falling back to a plain step.
    fn probe(&self, direction: Direction) -> Option<Probe> {
        let step = direction.step(self.cursor);
        match self.hop_target(direction) {
            Some(to) => Some(Probe::Hop { to, step }),
            None => step.map(|to| Probe::Step { to }),
        }
    }

    fn hop_target(&self, direction: Direction) -> Option<Pos> {
        let bridge = direction
            .ray(self.cursor)
            .take_while(|p| self.board.get(*p) != Cell::Unused)
            .find(|p| self.board.get(*p).is_occupied())?;
        let target = reflect(self.cursor, bridge)?;
        if self.board.get(target) == Cell::Unused {
            return None;
        }
        let landing_clear = direction
            .ray(bridge)
            .take_while(|p| *p != target)
            .all(|p| self.board.is_empty(p));
        (landing_clear && self.board.is_empty(target)).then_some(target)
    }

    /// Moves the cursor to another of the current player's pieces.
    fn navigate(&mut self, direction: Direction) {
        let own = Cell::Occupied(self.current);
        let found = if direction.is_horizontal() {
            direction
                .ray(self.cursor)
                .take_while(|p| self.board.get(*p) != Cell::Unused)
                .find(|p| self.board.get(*p) == own)
        } else {
            self.scan_rows(direction, own)
        };
        if let Some(pos) = found {
            self.cursor = pos;
        }
    }

    /// Walks rows toward the edge, scanning each sideways from a zig-zag start
    /// column.
    fn scan_rows(&self, direction: Direction, own: Cell) -> Option<Pos> {
        let delta = direction.delta();
        let row = self.cursor.row() as i32;
        let col = self.cursor.col() as i32;
        let rows = std::iter::successors(Some(row + delta.row), |r| Some(r + delta.row))
            .take_while(|r| (0..ROWS as i32).contains(r));
        for r in rows {
            let start = col + delta.col * ((r - row).abs() & 1);
            let hit = std::iter::successors(Some(start), |c| Some(c + 2 * delta.col))
                .map_while(|c| Pos::from_signed(r, c))
                .find(|p| self.board.get(*p) == own);
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Pos {
        Pos::new(row, col).unwrap()
    }

    fn lone_piece(at: Pos) -> MoveEngine {
        let mut board = Board::empty();
        board.set(at, Cell::Occupied(Player::Zero)).unwrap();
        // Player 1 needs a piece somewhere for turn handoff.
        board.set(pos(0, 12), Cell::Occupied(Player::One)).unwrap();
        MoveEngine::with_board(board, Player::Zero)
    }

    #[test]
    fn starts_on_bottom_tip() {
        let engine = MoveEngine::new();
        assert_eq!(engine.current(), Player::Zero);
        assert_eq!(engine.cursor(), pos(16, 12));
        assert!(!engine.is_selected());
    }

    #[test]
    fn select_requires_own_piece() {
        let mut engine = MoveEngine::new();
        engine.set_cursor(pos(8, 12));
        engine.apply(Command::Toggle);
        assert!(!engine.is_selected());
    }

    #[test]
    fn step_and_reverse_empties_trace() {
        let mut engine = lone_piece(pos(8, 12));
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.cursor(), pos(7, 11));
        assert_eq!(engine.move_kind(), Some(MoveKind::SingleStep));
        engine.apply(Command::Move(Direction::RightDown));
        assert_eq!(engine.cursor(), pos(8, 12));
        assert!(engine.trace().is_empty());
    }

    #[test]
    fn second_step_after_single_step_is_illegal() {
        let mut engine = lone_piece(pos(8, 12));
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Left));
        let before = engine.clone();
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.cursor(), before.cursor());
        assert_eq!(engine.trace(), before.trace());
        assert_eq!(engine.board(), before.board());
    }

    #[test]
    fn adjacent_hop_fixes_kind() {
        let mut engine = lone_piece(pos(8, 12));
        let mut board = engine.board().clone();
        board.set(pos(8, 14), Cell::Occupied(Player::One)).unwrap();
        engine = MoveEngine::with_board(board, Player::Zero);
        engine.set_cursor(pos(8, 12));
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(8, 16));
        assert_eq!(engine.move_kind(), Some(MoveKind::Hop));
        assert_eq!(engine.trace(), &[pos(8, 12)]);
    }

    #[test]
    fn long_hop_is_ambiguous_until_repeated() {
        let mut board = Board::empty();
        board.set(pos(8, 8), Cell::Occupied(Player::Zero)).unwrap();
        board.set(pos(8, 12), Cell::Occupied(Player::One)).unwrap();
        let mut engine = MoveEngine::with_board(board, Player::Zero);
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(8, 10));
        assert_eq!(engine.optional(), Some(pos(8, 16)));
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(8, 16));
        assert_eq!(engine.move_kind(), Some(MoveKind::Hop));
        assert_eq!(engine.optional(), None);
        assert_eq!(engine.trace(), &[pos(8, 8)]);
    }

    #[test]
    fn hop_blocked_by_crowded_landing_falls_back_to_step() {
        let mut board = Board::empty();
        board.set(pos(8, 8), Cell::Occupied(Player::Zero)).unwrap();
        board.set(pos(8, 12), Cell::Occupied(Player::One)).unwrap();
        board.set(pos(8, 14), Cell::Occupied(Player::One)).unwrap();
        let mut engine = MoveEngine::with_board(board, Player::Zero);
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(8, 10));
        assert_eq!(engine.optional(), None);
    }

    #[test]
    fn returning_hop_truncates_trace() {
        let mut board = Board::empty();
        board.set(pos(8, 8), Cell::Occupied(Player::Zero)).unwrap();
        board.set(pos(8, 10), Cell::Occupied(Player::One)).unwrap();
        board.set(pos(7, 13), Cell::Occupied(Player::One)).unwrap();
        let mut engine = MoveEngine::with_board(board, Player::Zero);
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(8, 12));
        engine.apply(Command::Move(Direction::RightUp));
        assert_eq!(engine.cursor(), pos(6, 14));
        assert_eq!(engine.trace(), &[pos(8, 8), pos(8, 12)]);
        engine.apply(Command::Move(Direction::LeftDown));
        assert_eq!(engine.cursor(), pos(8, 12));
        assert_eq!(engine.trace(), &[pos(8, 8)]);
    }

    #[test]
    fn commit_hands_turn_over() {
        let mut engine = MoveEngine::new();
        engine.set_cursor(pos(13, 9));
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.apply(Command::Toggle), Outcome::TurnChanged);
        assert_eq!(engine.current(), Player::One);
        assert_eq!(engine.cursor(), pos(0, 12));
        assert!(engine.trace().is_empty());
    }

    #[test]
    fn deselect_without_moving_keeps_turn() {
        let mut engine = MoveEngine::new();
        engine.apply(Command::Toggle);
        assert_eq!(engine.apply(Command::Toggle), Outcome::Continue);
        assert_eq!(engine.current(), Player::Zero);
    }

    #[test]
    fn horizontal_navigation_stops_at_unused() {
        let mut engine = MoveEngine::new();
        engine.set_cursor(pos(13, 9));
        engine.apply(Command::Move(Direction::Right));
        assert_eq!(engine.cursor(), pos(13, 11));
        engine.set_cursor(pos(13, 9));
        engine.apply(Command::Move(Direction::Left));
        assert_eq!(engine.cursor(), pos(13, 9));
    }

    #[test]
    fn diagonal_navigation_finds_next_row() {
        let mut engine = MoveEngine::new();
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.cursor(), pos(15, 11));
        engine.apply(Command::Move(Direction::RightUp));
        assert_eq!(engine.cursor(), pos(14, 12));
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.cursor(), pos(13, 11));
        engine.apply(Command::Move(Direction::LeftUp));
        assert_eq!(engine.cursor(), pos(13, 11));
    }

    #[test]
    fn replay_frames_follow_the_trace() {
        let mut engine = lone_piece(pos(8, 12));
        engine.apply(Command::Toggle);
        engine.apply(Command::Move(Direction::Right));
        let before = engine.board().clone();
        let frames = engine.replay_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].cursor, pos(8, 12));
        assert_eq!(frames[0].board.get(pos(8, 12)), Cell::Occupied(Player::Zero));
        assert_eq!(frames[0].board.get(pos(8, 14)), Cell::Empty);
        assert_eq!(frames[1].board, before);
        assert_eq!(engine.apply(Command::Replay), Outcome::Continue);
        assert_eq!(engine.board(), &before);
    }
}
