/// Linear congruential generator yielding values in `[0, 1)`.
///
/// `state' = state * 1664525 + 1013904223 (mod 2^32)` and each emitted value
/// is `state' / 2^32`. The same seed always yields the same stream, which is
/// what makes generated lessons reproducible.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state as f64 / MODULUS
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len - 1)
    }
}

/// Seed taken from the wall clock, used when the caller does not pin one.
pub fn time_seed() -> u32 {
    chrono::Utc::now().timestamp_millis() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_values_for_seed_zero() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_f64(), 1_013_904_223.0 / MODULUS);

        // 1013904223 * 1664525 + 1013904223 mod 2^32
        let expected = 1_013_904_223u32
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        assert_eq!(rng.next_f64(), expected as f64 / MODULUS);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = Lcg::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_index_in_range() {
        let mut rng = Lcg::new(u32::MAX);
        for len in 1..20 {
            for _ in 0..100 {
                assert!(rng.next_index(len) < len);
            }
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Lcg::new(1);
        let mut b = Lcg::new(2);
        assert_ne!(a.next_f64(), b.next_f64());
    }
}
