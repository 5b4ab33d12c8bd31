//! Move engine scenarios through the public API.

use star_checkers::games::checkers::tip_cells;
use star_checkers::tui::hot_seat_perspective;
use star_checkers::{
    Board, Cell, Command, Direction, MoveEngine, MoveKind, Outcome, Player, Pos, Side,
};

fn pos(row: usize, col: usize) -> Pos {
    Pos::new(row, col).unwrap()
}

fn keys(engine: &mut MoveEngine, keys: &[u8]) -> Vec<Outcome> {
    keys.iter()
        .map(|key| {
            let command = hot_seat_perspective(engine.current()).command(*key);
            engine.apply(command)
        })
        .collect()
}

#[test]
fn test_step_then_commit_changes_turn() {
    let mut engine = MoveEngine::new();
    // Walk to the front row, lift, step up-left, commit.
    let outcomes = keys(&mut engine, b"www w ");
    assert_eq!(outcomes.last(), Some(&Outcome::TurnChanged));
    assert_eq!(engine.current(), Player::One);
    assert!(engine.trace().is_empty());
    assert!(!engine.is_selected());
    assert_eq!(engine.board().get(pos(12, 8)), Cell::Occupied(Player::Zero));
    assert_eq!(engine.board().get(pos(13, 9)), Cell::Empty);
}

#[test]
fn test_player_one_keys_are_mirrored() {
    let mut engine = MoveEngine::new();
    keys(&mut engine, b"www w ");
    assert_eq!(engine.current(), Player::One);
    assert_eq!(engine.cursor(), pos(0, 12));

    // "Up-left" for Player 1 is canonical down-right.
    let outcomes = keys(&mut engine, b"www w ");
    assert_eq!(outcomes.last(), Some(&Outcome::TurnChanged));
    assert_eq!(engine.board().get(pos(4, 16)), Cell::Occupied(Player::One));
    assert_eq!(engine.board().get(pos(3, 15)), Cell::Empty);
    assert_eq!(engine.current(), Player::Zero);
    assert_eq!(engine.cursor(), pos(16, 12));
}

#[test]
fn test_hop_is_undone_by_reverse_direction() {
    let mut board = Board::empty();
    board.set(pos(8, 12), Cell::Occupied(Player::Zero)).unwrap();
    board.set(pos(7, 11), Cell::Occupied(Player::One)).unwrap();
    let mut engine = MoveEngine::with_board(board.clone(), Player::Zero);

    engine.apply(Command::Toggle);
    engine.apply(Command::Move(Direction::LeftUp));
    assert_eq!(engine.cursor(), pos(6, 10));
    assert_eq!(engine.move_kind(), Some(MoveKind::Hop));
    assert_eq!(engine.trace(), &[pos(8, 12)]);

    engine.apply(Command::Move(Direction::RightDown));
    assert_eq!(engine.cursor(), pos(8, 12));
    assert!(engine.trace().is_empty());
    assert_eq!(engine.board(), &board);

    // Nothing moved, so toggling keeps the turn.
    assert_eq!(engine.apply(Command::Toggle), Outcome::Continue);
    assert_eq!(engine.current(), Player::Zero);
}

#[test]
fn test_single_step_is_the_only_move() {
    let mut engine = MoveEngine::new();
    keys(&mut engine, b"www w");
    let board = engine.board().clone();
    let cursor = engine.cursor();

    for key in *b"aweq" {
        let command = hot_seat_perspective(engine.current()).command(key);
        assert_eq!(engine.apply(command), Outcome::Continue);
    }
    assert_eq!(engine.board(), &board);
    assert_eq!(engine.cursor(), cursor);
    assert_eq!(engine.trace().len(), 1);

    // Reversing the step is still allowed.
    keys(&mut engine, b"x");
    assert!(engine.trace().is_empty());
}

#[test]
fn test_hop_chain_trace_has_no_cycles() {
    let mut board = Board::empty();
    board.set(pos(8, 8), Cell::Occupied(Player::Zero)).unwrap();
    board.set(pos(8, 10), Cell::Occupied(Player::One)).unwrap();
    board.set(pos(8, 14), Cell::Occupied(Player::One)).unwrap();
    let mut engine = MoveEngine::with_board(board, Player::Zero);

    engine.apply(Command::Toggle);
    for direction in [
        Direction::Right,
        Direction::Right,
        Direction::Left,
        Direction::Left,
        Direction::Right,
    ] {
        engine.apply(Command::Move(direction));
        let trace = engine.trace();
        let mut unique = trace.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), trace.len(), "cycle in {trace:?}");
        assert!(!trace.contains(&engine.cursor()));
    }
    assert_eq!(engine.cursor(), pos(8, 12));
    assert_eq!(engine.trace(), &[pos(8, 8)]);
}

#[test]
fn test_filling_target_tip_wins() {
    let mut board = Board::empty();
    for cell in tip_cells(Side::Top).filter(|p| *p != pos(3, 11)) {
        board.set(cell, Cell::Occupied(Player::Zero)).unwrap();
    }
    board.set(pos(4, 12), Cell::Occupied(Player::Zero)).unwrap();
    board.set(pos(16, 12), Cell::Occupied(Player::One)).unwrap();
    let mut engine = MoveEngine::with_board(board, Player::Zero);
    assert_eq!(engine.cursor(), pos(4, 12));

    engine.apply(Command::Toggle);
    engine.apply(Command::Move(Direction::LeftUp));
    assert_eq!(engine.cursor(), pos(3, 11));
    assert_eq!(engine.apply(Command::Toggle), Outcome::GameWon(Player::Zero));
    assert_eq!(engine.current(), Player::Zero);
}

#[test]
fn test_replay_never_changes_state() {
    let mut engine = MoveEngine::new();
    keys(&mut engine, b"www w");
    let before = engine.clone();
    assert_eq!(engine.apply(Command::Replay), Outcome::Continue);
    assert_eq!(engine.board(), before.board());
    assert_eq!(engine.trace(), before.trace());
    assert_eq!(engine.replay_frames().len(), 2);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut engine = MoveEngine::new();
    let before = engine.clone();
    keys(&mut engine, b"#1?");
    assert_eq!(engine.board(), before.board());
    assert_eq!(engine.cursor(), before.cursor());
}
