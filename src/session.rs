use crate::clock::{Clock, SystemClock};
use crate::keys::{normalize_char, KeyInput};
use crate::lesson::{GeneratedTarget, LessonSpec};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum gap between keystrokes, exclusive, that counts as a pause.
pub const PAUSE_THRESHOLD_MS: u64 = 2000;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub allow_backspace: bool,
    pub pause_threshold_ms: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_backspace: false,
            pause_threshold_ms: PAUSE_THRESHOLD_MS,
        }
    }
}

impl SessionOptions {
    pub fn for_lesson(lesson: &LessonSpec) -> Self {
        Self {
            allow_backspace: lesson.allow_backspace,
            ..Self::default()
        }
    }
}

/// Inactivity interval excluded from active typing time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pause {
    pub start: u64,
    pub end: u64,
}

impl Pause {
    pub fn duration_ms(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Complete,
}

/// Progress of one attempt at a target.
///
/// `current_index == typed.len()` always holds. Timestamps are milliseconds
/// from whatever [`Clock`] drives the attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypingState {
    pub typed: Vec<String>,
    pub current_index: usize,
    /// Serialized as an ascending list.
    pub errors: BTreeSet<usize>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub pauses: Vec<Pause>,
    pub last_key_time: Option<u64>,
}

/// Result of feeding one key to a [`TypingState`]
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Outside the vocabulary, or a no-op in the current state
    Ignored,
    /// A token was entered and the cursor moved on
    Advanced { correct: bool },
    /// Wrong key with backspacing disallowed: error recorded, cursor held
    Rejected,
    /// Backspace removed the last token
    Erased,
    /// The last position was filled; the attempt is frozen
    Completed(SessionRecord),
}

/// Finalized attempt handed across the results boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub state: TypingState,
    pub target_length: usize,
}

impl TypingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (self.start_time, self.end_time) {
            (_, Some(_)) => Phase::Complete,
            (Some(_), None) => Phase::Active,
            (None, None) => Phase::Idle,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn total_pause_ms(&self) -> u64 {
        self.pauses.iter().map(Pause::duration_ms).sum()
    }

    /// Tokens typed that are not flagged as errors.
    pub fn correct_chars(&self) -> usize {
        self.typed.len().saturating_sub(self.errors.len())
    }

    /// Advance the state by one key.
    pub fn apply(
        &mut self,
        target: &[char],
        input: &KeyInput,
        now: u64,
        options: &SessionOptions,
    ) -> Transition {
        if self.is_complete() {
            return Transition::Ignored;
        }

        let token = match input {
            KeyInput::Ignored => return Transition::Ignored,
            KeyInput::Backspace => return self.erase(options),
            KeyInput::Glyph(token) => token,
        };

        let Some(&expected) = target.get(self.current_index) else {
            return Transition::Ignored;
        };
        let correct = *token == normalize_char(expected);

        self.touch(now, options.pause_threshold_ms);

        if !correct && !options.allow_backspace {
            self.errors.insert(self.current_index);
            return Transition::Rejected;
        }
        if !correct {
            self.errors.insert(self.current_index);
        }
        self.typed.push(token.clone());
        self.current_index += 1;

        if self.current_index == target.len() {
            self.end_time = self.last_key_time;
            return Transition::Completed(SessionRecord {
                state: self.clone(),
                target_length: target.len(),
            });
        }

        Transition::Advanced { correct }
    }

    fn erase(&mut self, options: &SessionOptions) -> Transition {
        if !options.allow_backspace || self.current_index == 0 {
            return Transition::Ignored;
        }
        self.typed.pop();
        self.current_index -= 1;
        self.errors.remove(&self.current_index);
        Transition::Erased
    }

    /// Start the clock on the first key and record a pause after a long gap.
    fn touch(&mut self, now: u64, pause_threshold_ms: u64) {
        match self.last_key_time {
            Some(last) if self.start_time.is_some() => {
                let now = now.max(last);
                if now - last > pause_threshold_ms {
                    self.pauses.push(Pause {
                        start: last,
                        end: now,
                    });
                }
                self.last_key_time = Some(now);
            }
            _ => {
                self.start_time = Some(now);
                self.last_key_time = Some(now);
            }
        }
    }
}

/// One attempt at a lesson: the target, its state and the clock driving it
#[derive(Debug)]
pub struct Session<C: Clock = SystemClock> {
    pub lesson_id: String,
    target: Vec<char>,
    options: SessionOptions,
    state: TypingState,
    clock: C,
}

impl Session<SystemClock> {
    pub fn for_lesson(lesson: &LessonSpec, target: &GeneratedTarget) -> Self {
        Self::new(
            lesson.id.clone(),
            &target.text,
            SessionOptions::for_lesson(lesson),
            SystemClock,
        )
    }
}

impl<C: Clock> Session<C> {
    pub fn new(lesson_id: impl Into<String>, target: &str, options: SessionOptions, clock: C) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            target: target.chars().collect(),
            options,
            state: TypingState::new(),
            clock,
        }
    }

    /// Normalize a raw key identifier and apply it at the current time.
    pub fn handle_key(&mut self, raw_key: &str) -> Transition {
        let input = KeyInput::classify(raw_key);
        let now = self.clock.now_ms();
        let transition = self.state.apply(&self.target, &input, now, &self.options);
        if let Transition::Completed(ref record) = transition {
            info!(
                "lesson {} complete: {} chars, {} errors, {} pauses",
                self.lesson_id,
                record.target_length,
                record.state.errors.len(),
                record.state.pauses.len()
            );
        }
        transition
    }

    pub fn state(&self) -> &TypingState {
        &self.state
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// Character the learner should type next, if any.
    pub fn expected_char(&self) -> Option<char> {
        self.target.get(self.state.current_index).copied()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Finalized record, once the attempt is complete.
    pub fn record(&self) -> Option<SessionRecord> {
        self.is_complete().then(|| SessionRecord {
            state: self.state.clone(),
            target_length: self.target.len(),
        })
    }
}
