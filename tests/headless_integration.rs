use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use keydrill::clock::ManualClock;
use keydrill::metrics::Score;
use keydrill::runtime::{key_identifier, DrillEvent, FixedTicker, Runner, TestEventSource};
use keydrill::session::{Phase, Session, SessionOptions, Transition};

fn key(code: KeyCode) -> DrillEvent {
    DrillEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless run of the terminal input path without a TTY: events go through
// the runner, get mapped to key identifiers and drive a session.
#[test]
fn headless_typing_flow_completes() {
    let clock = ManualClock::new(0);
    let mut session = Session::new("L1-hi", "hi", SessionOptions::default(), &clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char('h'))).unwrap();
    tx.send(key(KeyCode::Left)).unwrap();
    tx.send(key(KeyCode::Char('i'))).unwrap();

    let mut record = None;
    for _ in 0..100u32 {
        match runner.step() {
            DrillEvent::Tick => {}
            DrillEvent::Key(key) => {
                clock.advance(300);
                let Some(id) = key_identifier(&key) else {
                    continue;
                };
                if let Transition::Completed(r) = session.handle_key(&id) {
                    record = Some(r);
                    break;
                }
            }
        }
    }

    let record = record.expect("session should have completed");
    assert_eq!(session.phase(), Phase::Complete);
    assert_eq!(record.target_length, 2);
    assert_eq!(record.state.start_time, Some(300));
    assert_eq!(record.state.end_time, Some(900));

    let score = Score::from_state(&record.state).unwrap();
    assert_eq!(score.accuracy, 100);
    assert!(score.wpm > 0.0);
}

#[test]
fn headless_strict_mode_flow() {
    let clock = ManualClock::new(0);
    let mut session = Session::new("L1-ab", "ab", SessionOptions::default(), &clock);

    assert_eq!(session.handle_key("x"), Transition::Rejected);
    assert_eq!(session.state().current_index, 0);

    session.handle_key("a");
    assert_eq!(session.state().current_index, 1);
    assert!(matches!(session.handle_key("b"), Transition::Completed(_)));

    // One miss against two accepted characters
    let score = Score::from_state(session.state()).unwrap();
    assert_eq!(score.accuracy, 50);
}

#[test]
fn headless_backspace_flow() {
    let clock = ManualClock::new(0);
    let options = SessionOptions {
        allow_backspace: true,
        ..SessionOptions::default()
    };
    let mut session = Session::new("L1-cat", "cat", options, &clock);

    for raw in ["c", "o", "Backspace", "a", "t"] {
        clock.advance(250);
        session.handle_key(raw);
    }

    assert!(session.is_complete());
    let score = Score::from_state(session.state()).unwrap();
    assert_eq!(score.accuracy, 100);
}

#[test]
fn headless_pauses_reduce_active_time() {
    let clock = ManualClock::new(0);
    let mut session = Session::new("L1-abc", "abcde", SessionOptions::default(), &clock);

    session.handle_key("a");
    clock.advance(1_000);
    session.handle_key("b");
    clock.advance(30_000);
    session.handle_key("c");
    clock.advance(1_000);
    session.handle_key("d");
    clock.advance(1_000);
    session.handle_key("e");

    let state = session.state();
    assert_eq!(state.pauses.len(), 1);
    assert_eq!(state.total_pause_ms(), 30_000);

    // 33s elapsed, 30s paused: 5 chars in 3 active seconds
    let score = Score::from_state(state).unwrap();
    assert!((score.wpm - 20.0).abs() < 1e-9);
}
