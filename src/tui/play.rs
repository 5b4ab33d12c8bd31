//! Local and networked game loops.
//!
//! Listeners run as tokio tasks and feed an [`Inbox`]. The game loop itself
//! blocks on that inbox and on terminal drawing, so it runs on the blocking
//! pool and is the only owner of the [`MoveEngine`].

use super::inbox::{AfterGame, Inbox};
use super::sources::{self, KeyboardSource, Listener, Origin, RemoteSender};
use super::ui::{self, View};
use crate::config::ClientConfig;
use crate::error::{ClientError, RoomError};
use crate::games::checkers::{Command, MoveEngine, Outcome, Perspective, Player};
use crate::sync::Signal;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, instrument, warn};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Raw-mode alternate screen, restored on drop.
struct Screen {
    terminal: Term,
}

impl Screen {
    fn open() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn show(&mut self, engine: &MoveEngine, perspective: Perspective, status: &str) -> Result<()> {
        let view = View {
            board: engine.board(),
            cursor: engine.cursor(),
            selected: engine.is_selected(),
            perspective,
            status,
        };
        self.terminal.draw(|frame| ui::draw(frame, &view))?;
        Ok(())
    }

    /// Animates the current turn's moves.
    fn replay(
        &mut self,
        engine: &MoveEngine,
        perspective: Perspective,
        delay: Duration,
    ) -> Result<()> {
        for frame in engine.replay_frames() {
            let view = View {
                board: &frame.board,
                cursor: frame.cursor,
                selected: true,
                perspective,
                status: "Replaying...",
            };
            self.terminal.draw(|f| ui::draw(f, &view))?;
            std::thread::sleep(delay);
        }
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Perspective for hot-seat play: whoever moves sees their tip at the bottom.
pub fn hot_seat_perspective(player: Player) -> Perspective {
    Perspective::for_seat(player.index())
}

/// Status line for hot-seat play.
pub fn local_status(engine: &MoveEngine) -> String {
    let action = if engine.is_selected() {
        "piece lifted"
    } else {
        "choose a piece"
    };
    format!("{} to move ({})", engine.current(), action)
}

/// Status line for networked play.
pub fn networked_status(engine: &MoveEngine, me: Player) -> String {
    if engine.current() == me {
        local_status(engine).replacen(&engine.current().to_string(), "You", 1)
    } else {
        "Opponent's turn".to_string()
    }
}

/// Win message from the local seat's point of view.
pub fn outcome_message(winner: Player, me: Option<Player>) -> String {
    match me {
        Some(me) if me == winner => "You win! Press any key for another game.".to_string(),
        Some(_) => "You lose! Press any key for another game.".to_string(),
        None => format!("{} wins! Press any key for another game.", winner),
    }
}

/// Runs a two-player game on one terminal.
#[instrument(skip_all)]
pub async fn run_local(config: ClientConfig) -> Result<()> {
    let mut screen = Screen::open()?;
    let inbox = Arc::new(Inbox::new());
    let keyboard = Listener::spawn(KeyboardSource::new(), Origin::Keyboard, inbox.queue());
    info!("Local game started");

    let result = {
        let inbox = Arc::clone(&inbox);
        tokio::task::spawn_blocking(move || local_games(&mut screen, &inbox, &config)).await
    };
    inbox.close();
    keyboard.stop().await;
    result?
}

fn local_games(screen: &mut Screen, inbox: &Inbox, config: &ClientConfig) -> Result<()> {
    let mut engine = MoveEngine::new();
    loop {
        engine.reset();
        inbox.clear();
        loop {
            let perspective = hot_seat_perspective(engine.current());
            screen.show(&engine, perspective, &local_status(&engine))?;

            let key = match inbox.next_input() {
                Some(sources::Input {
                    signal: Signal::Command(key),
                    ..
                }) => key,
                _ => return Ok(()),
            };
            let command = perspective.command(key);
            if command == Command::Replay {
                screen.replay(&engine, perspective, config.replay_delay())?;
            }
            match engine.apply(command) {
                Outcome::Continue => {}
                Outcome::TurnChanged => inbox.clear(),
                Outcome::GameWon(winner) => {
                    screen.show(&engine, perspective, &outcome_message(winner, None))?;
                    match inbox.wait_for_key() {
                        AfterGame::Again => break,
                        AfterGame::Quit => return Ok(()),
                    }
                }
            }
        }
    }
}

/// Joins a relay room and plays from a fixed seat.
///
/// # Errors
///
/// [`ClientError::LoginRejected`] when the seat is taken and
/// [`ClientError::ConnectionLost`] when the relay goes away mid-game.
#[instrument(skip(config), fields(room = %config.room()))]
pub async fn run_networked(
    config: ClientConfig,
    host: String,
    port: u16,
    seat: u8,
) -> Result<()> {
    let me = Player::from_index(usize::from(seat)).ok_or(RoomError::InvalidSeat { seat })?;
    let (remote, sender) =
        sources::connect(&host, port, seat, config.room(), config.poll_interval()).await?;

    let mut screen = Screen::open()?;
    let inbox = Arc::new(Inbox::new());
    let keyboard = Listener::spawn(KeyboardSource::new(), Origin::Keyboard, inbox.queue());
    let poller = Listener::spawn(remote, Origin::Remote, inbox.queue());
    info!(seat, "Networked game started");

    let result = {
        let inbox = Arc::clone(&inbox);
        let sender = sender.clone();
        let runtime = Handle::current();
        tokio::task::spawn_blocking(move || {
            networked_games(&mut screen, &inbox, &runtime, &sender, me, &config)
        })
        .await
    };
    if let Err(e) = sender.logout().await {
        debug!(error = %e, "Logout not delivered");
    }
    inbox.close();
    keyboard.stop().await;
    poller.stop().await;
    result?
}

fn networked_games(
    screen: &mut Screen,
    inbox: &Inbox,
    runtime: &Handle,
    sender: &RemoteSender,
    me: Player,
    config: &ClientConfig,
) -> Result<()> {
    let perspective = Perspective::for_seat(me.index());
    let mut engine = MoveEngine::new();
    loop {
        // No clearing here: input carried over from the game-over screen
        // already belongs to this game.
        engine.reset();
        loop {
            screen.show(&engine, perspective, &networked_status(&engine, me))?;

            let Some(input) = inbox.next_input() else {
                return Ok(());
            };
            let my_turn = engine.current() == me;
            let key = match (input.origin, input.signal) {
                (_, Signal::Quit) => return Ok(()),
                (Origin::Remote, Signal::ConnectionLost) => {
                    return Err(ClientError::ConnectionLost.into());
                }
                (Origin::Keyboard, Signal::ConnectionLost) => return Ok(()),
                (Origin::Keyboard, Signal::Command(key)) if my_turn => {
                    runtime.block_on(sender.put(key))?;
                    key
                }
                (Origin::Remote, Signal::Command(key)) if !my_turn => key,
                (origin, Signal::Command(key)) => {
                    if origin == Origin::Remote {
                        warn!(key, "Remote command outside opponent's turn");
                    }
                    continue;
                }
            };

            let command = perspective.command(key);
            if command == Command::Replay {
                screen.replay(&engine, perspective, config.replay_delay())?;
            }
            if let Outcome::GameWon(winner) = engine.apply(command) {
                screen.show(&engine, perspective, &outcome_message(winner, Some(me)))?;
                match inbox.wait_for_key() {
                    AfterGame::Again => break,
                    AfterGame::Quit => return Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_seat_flips_for_player_one() {
        assert!(!hot_seat_perspective(Player::Zero).is_flipped());
        assert!(hot_seat_perspective(Player::One).is_flipped());
    }

    #[test]
    fn messages_follow_the_local_seat() {
        assert!(outcome_message(Player::One, Some(Player::One)).starts_with("You win"));
        assert!(outcome_message(Player::One, Some(Player::Zero)).starts_with("You lose"));
        assert!(outcome_message(Player::Zero, None).starts_with("Player 0 wins"));
    }

    #[test]
    fn networked_status_names_whose_turn() {
        let engine = MoveEngine::new();
        assert_eq!(networked_status(&engine, Player::Zero), "You to move (choose a piece)");
        assert_eq!(networked_status(&engine, Player::One), "Opponent's turn");
    }
}
