//! The game loop's view of its input.

use super::sources::{Input, Origin};
use crate::sync::{BlockingQueue, CommandQueue, PollQueue, Signal};
use std::sync::Arc;
use tracing::debug;

/// What the loop does after a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterGame {
    /// Start a new game.
    Again,
    /// Leave the client.
    Quit,
}

/// Listener queue plus remote input held over from the game-over screen.
///
/// The opponent may restart and move before the local player has dismissed
/// the result. Those moves belong to the next game, so they are kept and
/// handed out ahead of anything still in the queue.
#[derive(Debug, Default)]
pub struct Inbox {
    queue: Arc<BlockingQueue<Input>>,
    carried: PollQueue<Input>,
}

impl Inbox {
    /// Creates an inbox around a fresh queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue listeners feed.
    pub fn queue(&self) -> Arc<BlockingQueue<Input>> {
        Arc::clone(&self.queue)
    }

    /// Next input, carried items first. Blocks on the queue otherwise.
    ///
    /// `None` once the queue is closed and drained.
    pub fn next_input(&self) -> Option<Input> {
        self.carried.get().or_else(|| self.queue.get())
    }

    /// Waits on the game-over screen for a local key.
    ///
    /// Remote input that arrives meanwhile is carried into the next game.
    pub fn wait_for_key(&self) -> AfterGame {
        loop {
            match self.queue.get() {
                Some(input @ Input {
                    origin: Origin::Remote,
                    ..
                }) => {
                    debug!(signal = ?input.signal, "Carrying remote input into the next game");
                    self.carried.put(input);
                }
                Some(Input {
                    signal: Signal::Command(_),
                    ..
                }) => return AfterGame::Again,
                Some(_) | None => return AfterGame::Quit,
            }
        }
    }

    /// Remote inputs waiting for the next game.
    pub fn carried(&self) -> usize {
        self.carried.len()
    }

    /// Drops everything pending, carried input included.
    pub fn clear(&self) {
        self.carried.clear();
        self.queue.clear();
    }

    /// Closes the queue so listeners and a blocked loop wind down.
    pub fn close(&self) {
        self.queue.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(key: u8) -> Input {
        Input {
            origin: Origin::Remote,
            signal: Signal::Command(key),
        }
    }

    fn keyboard(signal: Signal) -> Input {
        Input {
            origin: Origin::Keyboard,
            signal,
        }
    }

    fn feed(inbox: &Arc<Inbox>, inputs: Vec<Input>) -> std::thread::JoinHandle<()> {
        let queue = inbox.queue();
        std::thread::spawn(move || inputs.into_iter().for_each(|input| queue.put(input)))
    }

    #[test]
    fn remote_move_during_game_over_survives_restart() {
        let inbox = Arc::new(Inbox::new());
        let producer = feed(&inbox, vec![remote(b'w'), keyboard(Signal::Command(b' '))]);
        assert_eq!(inbox.wait_for_key(), AfterGame::Again);
        producer.join().unwrap();
        assert_eq!(inbox.carried(), 1);
        assert_eq!(inbox.next_input(), Some(remote(b'w')));
    }

    #[test]
    fn carried_input_comes_before_queued_input() {
        let inbox = Arc::new(Inbox::new());
        let producer = feed(
            &inbox,
            vec![remote(b'a'), keyboard(Signal::Command(b'x')), remote(b'e')],
        );
        assert_eq!(inbox.wait_for_key(), AfterGame::Again);
        assert_eq!(inbox.next_input(), Some(remote(b'a')));
        assert_eq!(inbox.next_input(), Some(remote(b'e')));
        producer.join().unwrap();
    }

    #[test]
    fn local_quit_ends_the_wait() {
        let inbox = Arc::new(Inbox::new());
        let producer = feed(&inbox, vec![keyboard(Signal::Quit)]);
        assert_eq!(inbox.wait_for_key(), AfterGame::Quit);
        producer.join().unwrap();
    }

    #[test]
    fn closed_inbox_quits() {
        let inbox = Inbox::new();
        inbox.close();
        assert_eq!(inbox.wait_for_key(), AfterGame::Quit);
        assert_eq!(inbox.next_input(), None);
    }

    #[test]
    fn clear_drops_carried_input() {
        let inbox = Arc::new(Inbox::new());
        let producer = feed(&inbox, vec![remote(b'w'), keyboard(Signal::Command(b' '))]);
        inbox.wait_for_key();
        producer.join().unwrap();
        inbox.clear();
        assert_eq!(inbox.carried(), 0);
        inbox.close();
        assert_eq!(inbox.next_input(), None);
    }
}
