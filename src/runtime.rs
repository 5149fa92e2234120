use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, ModifierKeyCode};

/// Unified event type consumed by the session driver
#[derive(Clone, Debug)]
pub enum DrillEvent {
    Key(KeyEvent),
    Tick,
}

/// Source of terminal key events
pub trait DrillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<DrillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => DrillEvent::Key(key),
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event stream failed: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DrillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the driver one event/tick at a time
pub struct Runner<E: DrillEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: DrillEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DrillEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => DrillEvent::Tick,
        }
    }
}

/// Raw key identifier for a terminal key event, in the same vocabulary a
/// browser reports (`"a"`, `" "`, `"Backspace"`, `"ShiftLeft"`, ...).
/// Keys with no meaning to a typing session map to `None`.
pub fn key_identifier(key: &KeyEvent) -> Option<String> {
    let id = match key.code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Backspace => "Backspace",
        KeyCode::Enter => "Enter",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Delete => "Delete",
        KeyCode::CapsLock => "CapsLock",
        KeyCode::Menu => "ContextMenu",
        KeyCode::Modifier(modifier) => match modifier {
            ModifierKeyCode::LeftShift => "ShiftLeft",
            ModifierKeyCode::RightShift => "ShiftRight",
            ModifierKeyCode::LeftControl => "ControlLeft",
            ModifierKeyCode::RightControl => "ControlRight",
            ModifierKeyCode::LeftAlt => "AltLeft",
            ModifierKeyCode::RightAlt => "AltRight",
            ModifierKeyCode::LeftSuper | ModifierKeyCode::LeftMeta => "WinLeft",
            ModifierKeyCode::RightSuper | ModifierKeyCode::RightMeta => "WinRight",
            _ => return None,
        },
        _ => return None,
    };
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{normalize_key, KeyInput};
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        match runner.step() {
            DrillEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(DrillEvent::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)))
            .unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            DrillEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('j')),
            DrillEvent::Tick => panic!("expected the queued key"),
        }
    }

    #[test]
    fn key_identifiers_normalize() {
        let cases = [
            (KeyCode::Char('a'), Some("a")),
            (KeyCode::Char('A'), Some("a")),
            (KeyCode::Char(' '), Some("space")),
            (KeyCode::Backspace, Some("backspace")),
            (KeyCode::Enter, Some("enter")),
            (KeyCode::Modifier(ModifierKeyCode::LeftShift), Some("shiftleft")),
            (KeyCode::Modifier(ModifierKeyCode::RightControl), Some("controlright")),
            (KeyCode::Menu, Some("menuright")),
            (KeyCode::Left, None),
            (KeyCode::F(3), None),
        ];
        for (code, expected) in cases {
            let id = key_identifier(&KeyEvent::new(code, KeyModifiers::NONE));
            assert_eq!(id.as_deref().map(normalize_key).as_deref(), expected, "{code:?}");
        }
    }

    #[test]
    fn backspace_event_classifies() {
        let id = key_identifier(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)).unwrap();
        assert_eq!(KeyInput::classify(&id), KeyInput::Backspace);
    }
}
