use super::{draw_with_retries, Lcg, RunTracker};
use crate::lesson::MAX_OUTPUT_LEN;

/// Rejection-sampling budget per character.
pub const MAX_ATTEMPTS: usize = 100;

/// `repeat` chunks of `chunk` uniform draws from the pool.
///
/// A draw that would grow a run of one character past `max_repeat` is
/// redrawn, up to [`MAX_ATTEMPTS`] times; after that the last draw is kept
/// even if it breaks the limit. Runs are tracked across chunk boundaries.
pub fn generate(
    pool: &[char],
    chunk: usize,
    repeat: usize,
    max_repeat: Option<usize>,
    seed: u32,
) -> String {
    if pool.is_empty() {
        return String::new();
    }
    let mut rng = Lcg::new(seed);
    let max_repeat = max_repeat.unwrap_or(pool.len()).max(1);
    let mut run = RunTracker::default();
    let mut result = String::with_capacity(chunk.saturating_mul(repeat).min(MAX_OUTPUT_LEN));

    for _ in 0..repeat {
        for _ in 0..chunk {
            let c = draw_with_retries(&mut rng, pool, MAX_ATTEMPTS, |c| {
                run.would_exceed(c, max_repeat)
            });
            run.push(c);
            result.push(c);
        }
    }

    result
}
