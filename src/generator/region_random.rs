use super::{draw_with_retries, Lcg, RunTracker};
use crate::lesson::MAX_OUTPUT_LEN;
use std::collections::{HashSet, VecDeque};

/// Rejection-sampling budget per character.
pub const MAX_ATTEMPTS: usize = 200;

/// `length` draws from the pool under two soft constraints.
///
/// A draw is rejected if it would push a run past `max_repeat`, or if the
/// trailing window (the last `2 * min_run` accepted characters) already holds
/// at least `min_run` characters but fewer than `min_run` distinct ones and
/// the draw is one of them. After [`MAX_ATTEMPTS`] draws the last one is kept.
pub fn generate(
    pool: &[char],
    length: usize,
    min_run: Option<usize>,
    max_repeat: Option<usize>,
    seed: u32,
) -> String {
    if pool.is_empty() {
        return String::new();
    }
    let mut rng = Lcg::new(seed);
    let min_run = min_run.unwrap_or(1);
    let max_repeat = max_repeat.unwrap_or(pool.len()).max(1);
    let window = min_run.saturating_mul(2);
    let mut run = RunTracker::default();
    let mut recent: VecDeque<char> = VecDeque::with_capacity(window.min(length).saturating_add(1));
    let mut result = String::with_capacity(length.min(MAX_OUTPUT_LEN));

    for _ in 0..length {
        let distinct_recent = recent.iter().collect::<HashSet<_>>().len();
        let needs_variety = recent.len() >= min_run && distinct_recent < min_run;

        let c = draw_with_retries(&mut rng, pool, MAX_ATTEMPTS, |c| {
            run.would_exceed(c, max_repeat) || (needs_variety && recent.contains(&c))
        });

        run.push(c);
        result.push(c);
        recent.push_back(c);
        if recent.len() > window {
            recent.pop_front();
        }
    }

    result
}
