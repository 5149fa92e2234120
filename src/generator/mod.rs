pub mod finger_mix;
pub mod region_random;
pub mod sequence;
pub mod timed;

use crate::{
    error::{KeydrillError, Result},
    lesson::{GeneratedTarget, LessonKind, LessonSpec, LessonVariant},
    rng::{time_seed, Lcg},
};
use log::debug;

/// Generate the practice text for a lesson.
///
/// Without a seed the wall clock is used, so output is only reproducible
/// when the caller pins one.
pub fn generate_lesson(lesson: &LessonSpec, seed: Option<u32>) -> Result<GeneratedTarget> {
    if lesson.pool.is_empty() {
        return Err(KeydrillError::EmptyPool {
            lesson_id: lesson.id.clone(),
        });
    }
    lesson.check_size()?;

    let seed = seed.unwrap_or_else(time_seed);
    let pool = &lesson.pool;
    let text = match lesson.variant {
        LessonVariant::Sequence {
            pattern,
            chunk,
            repeat,
        } => sequence::generate(pool, pattern, chunk, repeat, seed),
        LessonVariant::FingerMix {
            chunk,
            repeat,
            max_repeat,
            ..
        } => finger_mix::generate(pool, chunk, repeat, max_repeat, seed),
        LessonVariant::RegionRandom {
            length,
            min_run,
            max_repeat,
        } => region_random::generate(pool, length, min_run, max_repeat, seed),
        LessonVariant::Timed { time_limit_sec } => {
            timed::generate(pool, time_limit_sec, lesson.goal.wpm, seed)
        }
    };

    debug!(
        "generated {} chars for lesson {} ({}) with seed {}",
        text.chars().count(),
        lesson.id,
        lesson.kind(),
        seed
    );

    Ok(GeneratedTarget {
        text,
        kind: lesson.kind(),
    })
}

/// Generate from an untyped lesson record, checking its `type` tag first so
/// an unrecognised variant is reported as such instead of as a parse error.
pub fn generate_from_value(value: &serde_json::Value, seed: Option<u32>) -> Result<GeneratedTarget> {
    let tag = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if LessonKind::from_tag(tag).is_none() {
        return Err(KeydrillError::UnknownLessonType(tag.to_string()));
    }

    let lesson: LessonSpec = serde_json::from_value(value.clone())?;
    generate_lesson(&lesson, seed)
}

/// Length of the current run of identical characters.
#[derive(Debug, Default)]
pub(crate) struct RunTracker {
    last: Option<char>,
    repeat_count: usize,
}

impl RunTracker {
    pub(crate) fn would_exceed(&self, c: char, max_repeat: usize) -> bool {
        self.last == Some(c) && self.repeat_count >= max_repeat
    }

    pub(crate) fn push(&mut self, c: char) {
        if self.last == Some(c) {
            self.repeat_count += 1;
        } else {
            self.last = Some(c);
            self.repeat_count = 1;
        }
    }
}

/// Draw from `pool` until `reject` passes or `max_attempts` draws were made,
/// in which case the last draw is returned anyway.
pub(crate) fn draw_with_retries(
    rng: &mut Lcg,
    pool: &[char],
    max_attempts: usize,
    mut reject: impl FnMut(char) -> bool,
) -> char {
    let mut c = pool[rng.next_index(pool.len())];
    let mut attempts = 1;
    while reject(c) {
        if attempts >= max_attempts {
            debug!("safety break after {attempts} draws, keeping {c:?}");
            break;
        }
        c = pool[rng.next_index(pool.len())];
        attempts += 1;
    }
    c
}

/// Longest run of one repeated character in `text`.
pub fn longest_run(text: &str) -> usize {
    let mut run = RunTracker::default();
    let mut longest = 0;
    for c in text.chars() {
        run.push(c);
        longest = longest.max(run.repeat_count);
    }
    longest
}
