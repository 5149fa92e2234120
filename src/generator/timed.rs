use super::Lcg;

/// Assumed characters per second when sizing a timed lesson.
pub const CHARS_PER_SECOND: f64 = 5.0;

/// `ceil(time_limit_sec * CHARS_PER_SECOND * (goal_wpm / 60) * 5)`, never negative.
pub fn estimated_length(time_limit_sec: u32, goal_wpm: f64) -> usize {
    let estimate = (time_limit_sec as f64 * CHARS_PER_SECOND * (goal_wpm / 60.0) * 5.0).ceil();
    if estimate.is_finite() && estimate > 0.0 {
        estimate as usize
    } else {
        0
    }
}

/// Independent uniform draws, enough to fill the time limit at the goal pace.
pub fn generate(pool: &[char], time_limit_sec: u32, goal_wpm: f64, seed: u32) -> String {
    if pool.is_empty() {
        return String::new();
    }
    let mut rng = Lcg::new(seed);
    (0..estimated_length(time_limit_sec, goal_wpm))
        .map(|_| pool[rng.next_index(pool.len())])
        .collect()
}
