use crate::lesson::Goal;
use crate::session::{Pause, SessionRecord, TypingState};
use log::warn;
use serde::{Deserialize, Serialize};

pub const CHARS_PER_WORD: f64 = 5.0;

/// `(correct_chars / 5) / active_minutes`, where active time excludes pauses.
/// Zero when no active time remains.
pub fn calculate_wpm(correct_chars: usize, start_ms: u64, end_ms: u64, pauses: &[Pause]) -> f64 {
    let total_ms = end_ms as f64 - start_ms as f64;
    let pause_ms: f64 = pauses.iter().map(|p| p.duration_ms() as f64).sum();
    let minutes = (total_ms - pause_ms) / 60_000.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    (correct_chars as f64 / CHARS_PER_WORD) / minutes
}

/// Percentage of correct characters, rounded. Zero when nothing was typed.
pub fn calculate_accuracy(correct_chars: usize, total_chars: usize) -> u32 {
    if total_chars == 0 {
        return 0;
    }
    ((correct_chars as f64 / total_chars as f64) * 100.0).round() as u32
}

/// Result tier shown with a finished lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rating {
    Excellent,
    Great,
    Good,
    Okay,
}

impl Rating {
    pub fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            95.. => Rating::Excellent,
            90.. => Rating::Great,
            85.. => Rating::Good,
            _ => Rating::Okay,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub wpm: f64,
    pub accuracy: u32,
}

impl Score {
    /// Score a finished attempt; `None` until both start and end are set.
    pub fn from_state(state: &TypingState) -> Option<Self> {
        let (start, end) = (state.start_time?, state.end_time?);
        let correct = state.correct_chars();
        let wpm = calculate_wpm(correct, start, end, &state.pauses);
        Some(Self {
            wpm: if wpm.is_finite() { wpm } else { 0.0 },
            accuracy: calculate_accuracy(correct, state.typed.len()),
        })
    }

    pub fn rounded_wpm(&self) -> u32 {
        self.wpm.round() as u32
    }

    pub fn rating(&self) -> Rating {
        Rating::from_accuracy(self.accuracy)
    }

    pub fn meets_goal(&self, goal: &Goal) -> bool {
        self.wpm >= goal.wpm && self.accuracy as f64 >= goal.accuracy
    }
}

/// Score a persisted session record.
///
/// Missing or malformed data is logged and scored as zero rather than
/// returned as an error.
pub fn score_session_json(raw: Option<&str>) -> Score {
    raw.and_then(parse_session_record)
        .and_then(|record| Score::from_state(&record.state))
        .unwrap_or_default()
}

pub fn parse_session_record(raw: &str) -> Option<SessionRecord> {
    serde_json::from_str(raw)
        .map_err(|e| warn!("failed to parse session data: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn finished(typed: usize, errors: &[usize], start: u64, end: u64, pauses: Vec<Pause>) -> TypingState {
        TypingState {
            typed: vec!["a".to_string(); typed],
            current_index: typed,
            errors: errors.iter().copied().collect::<BTreeSet<_>>(),
            start_time: Some(start),
            end_time: Some(end),
            last_key_time: Some(end),
            pauses,
        }
    }

    #[test]
    fn test_wpm_one_minute() {
        assert_eq!(calculate_wpm(50, 0, 60_000, &[]), 10.0);
    }

    #[test]
    fn test_wpm_excludes_pauses() {
        let pauses = [Pause {
            start: 10_000,
            end: 40_000,
        }];
        // 90s total minus 30s paused leaves one active minute.
        assert_eq!(calculate_wpm(50, 0, 90_000, &pauses), 10.0);
    }

    #[test]
    fn test_wpm_non_positive_time() {
        assert_eq!(calculate_wpm(50, 1_000, 1_000, &[]), 0.0);
        let pauses = [Pause {
            start: 0,
            end: 60_000,
        }];
        assert_eq!(calculate_wpm(50, 0, 60_000, &pauses), 0.0);
        assert_eq!(calculate_wpm(50, 2_000, 1_000, &[]), 0.0);
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(calculate_accuracy(45, 50), 90);
        assert_eq!(calculate_accuracy(50, 50), 100);
        assert_eq!(calculate_accuracy(2, 3), 67);
        assert_eq!(calculate_accuracy(0, 0), 0);
    }

    #[test]
    fn test_score_from_state() {
        let state = finished(50, &[1, 2, 3, 4, 5], 0, 60_000, vec![]);
        let score = Score::from_state(&state).unwrap();
        assert_eq!(score.wpm, 9.0);
        assert_eq!(score.accuracy, 90);
        assert_eq!(score.rating(), Rating::Great);
    }

    #[test]
    fn test_score_requires_end() {
        let mut state = finished(5, &[], 0, 1_000, vec![]);
        state.end_time = None;
        assert_eq!(Score::from_state(&state), None);
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(Rating::from_accuracy(100), Rating::Excellent);
        assert_eq!(Rating::from_accuracy(95), Rating::Excellent);
        assert_eq!(Rating::from_accuracy(94), Rating::Great);
        assert_eq!(Rating::from_accuracy(85), Rating::Good);
        assert_eq!(Rating::from_accuracy(84), Rating::Okay);
        assert_eq!(Rating::from_accuracy(0), Rating::Okay);
    }

    #[test]
    fn test_meets_goal() {
        let goal = Goal {
            wpm: 20.0,
            accuracy: 90.0,
            time_sec: None,
        };
        assert!(Score { wpm: 20.0, accuracy: 90 }.meets_goal(&goal));
        assert!(!Score { wpm: 19.9, accuracy: 100 }.meets_goal(&goal));
        assert!(!Score { wpm: 40.0, accuracy: 89 }.meets_goal(&goal));
    }

    #[test]
    fn test_rounded_wpm() {
        assert_eq!(Score { wpm: 41.5, accuracy: 0 }.rounded_wpm(), 42);
        assert_eq!(Score { wpm: 41.49, accuracy: 0 }.rounded_wpm(), 41);
    }

    #[test]
    fn test_score_session_json() {
        let record = SessionRecord {
            state: finished(10, &[0], 0, 60_000, vec![]),
            target_length: 10,
        };
        let raw = serde_json::to_string(&record).unwrap();
        let score = score_session_json(Some(&raw));
        assert_eq!(score.accuracy, 90);
        assert!((score.wpm - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_score_session_json_defends_against_bad_data() {
        assert_eq!(score_session_json(None), Score::default());
        assert_eq!(score_session_json(Some("not json")), Score::default());
        assert_eq!(score_session_json(Some(r#"{"targetLength": 3}"#)), Score::default());
        assert_eq!(
            score_session_json(Some(r#"{"state": {"typed": "abc"}, "targetLength": 3}"#)),
            Score::default()
        );
    }

    #[test]
    fn test_score_session_json_unfinished() {
        let mut state = finished(3, &[], 0, 1_000, vec![]);
        state.end_time = None;
        let raw = serde_json::to_string(&SessionRecord {
            state,
            target_length: 5,
        })
        .unwrap();
        assert_eq!(score_session_json(Some(&raw)), Score::default());
    }
}
