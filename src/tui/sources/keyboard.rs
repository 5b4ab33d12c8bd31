//! Terminal key events as signals.

use super::InputSource;
use crate::error::SourceError;
use crate::sync::Signal;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;

/// Reads keys from the raw-mode terminal.
pub struct KeyboardSource {
    events: EventStream,
}

impl std::fmt::Debug for KeyboardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardSource").finish_non_exhaustive()
    }
}

impl KeyboardSource {
    /// Creates a keyboard source. The terminal must already be in raw mode.
    pub fn new() -> Self {
        Self {
            events: EventStream::new(),
        }
    }
}

impl Default for KeyboardSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardSource {
    async fn next_signal(&mut self) -> Result<Option<Signal>, SourceError> {
        match self.events.next().await {
            Some(Ok(Event::Key(key))) => Ok(signal_for_key(key)),
            Some(Ok(_)) => Ok(None),
            Some(Err(e)) => Err(e.into()),
            None => Err(SourceError::Closed),
        }
    }
}

/// Maps a key event to a signal.
///
/// `q`, Esc and Ctrl-C quit; other ASCII characters pass through as command
/// bytes. Key releases and non-ASCII keys are dropped.
pub fn signal_for_key(key: KeyEvent) -> Option<Signal> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(Signal::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Signal::Quit),
        KeyCode::Char('q') => Some(Signal::Quit),
        KeyCode::Char(c) if c.is_ascii() => Some(Signal::Command(c as u8)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_become_commands() {
        assert_eq!(signal_for_key(press(KeyCode::Char('w'))), Some(Signal::Command(b'w')));
        assert_eq!(signal_for_key(press(KeyCode::Char(' '))), Some(Signal::Command(b' ')));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(signal_for_key(press(KeyCode::Char('q'))), Some(Signal::Quit));
        assert_eq!(signal_for_key(press(KeyCode::Esc)), Some(Signal::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(signal_for_key(ctrl_c), Some(Signal::Quit));
    }

    #[test]
    fn other_keys_are_dropped() {
        assert_eq!(signal_for_key(press(KeyCode::Up)), None);
        assert_eq!(signal_for_key(press(KeyCode::Char('é'))), None);
    }
}
