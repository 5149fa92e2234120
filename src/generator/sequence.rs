use super::Lcg;
use crate::lesson::SequencePattern;
use itertools::Itertools;

/// Base ordering of the pool for a pattern.
///
/// Mirror walks the first `ceil(n/2)` entries forward and then the first
/// `floor(n/2)` entries backwards, so `[a, b, c, d]` becomes `[a, b, c, d, b, a]`.
/// Shuffle is a Fisher-Yates pass from the last index down to 1.
pub fn ordering(pool: &[char], pattern: SequencePattern, rng: &mut Lcg) -> Vec<char> {
    match pattern {
        SequencePattern::Ascend => pool.to_vec(),
        SequencePattern::Descend => pool.iter().rev().copied().collect(),
        SequencePattern::Mirror => {
            let forward = pool.len().div_ceil(2);
            let backward = pool.len() / 2;
            pool.iter()
                .take(forward)
                .chain(pool[..backward].iter().rev())
                .copied()
                .collect()
        }
        SequencePattern::Shuffle => {
            let mut shuffled = pool.to_vec();
            for i in (1..shuffled.len()).rev() {
                let j = rng.next_index(i + 1);
                shuffled.swap(i, j);
            }
            shuffled
        }
    }
}

/// `repeat` chunks of `chunk` characters cycling through the ordering.
pub fn generate(
    pool: &[char],
    pattern: SequencePattern,
    chunk: usize,
    repeat: usize,
    seed: u32,
) -> String {
    let mut rng = Lcg::new(seed);
    let sequence = ordering(pool, pattern, &mut rng);
    if sequence.is_empty() {
        return String::new();
    }

    (0..repeat)
        .map(|r| {
            (0..chunk)
                .map(|c| sequence[(r * chunk + c) % sequence.len()])
                .collect::<String>()
        })
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: [char; 4] = ['a', 'b', 'c', 'd'];

    #[test]
    fn test_ascend_cycles_pool() {
        assert_eq!(
            generate(&POOL, SequencePattern::Ascend, 3, 3, 1),
            "abcdabcda"
        );
    }

    #[test]
    fn test_descend_reverses_pool() {
        assert_eq!(generate(&POOL, SequencePattern::Descend, 4, 2, 1), "dcbadcba");
    }

    #[test]
    fn test_mirror_even_pool() {
        let mut rng = Lcg::new(0);
        assert_eq!(
            ordering(&POOL, SequencePattern::Mirror, &mut rng),
            vec!['a', 'b', 'c', 'd', 'b', 'a']
        );
    }

    #[test]
    fn test_mirror_odd_pool() {
        let mut rng = Lcg::new(0);
        assert_eq!(
            ordering(&['a', 'b', 'c'], SequencePattern::Mirror, &mut rng),
            vec!['a', 'b', 'a']
        );
    }

    #[test]
    fn test_mirror_output() {
        assert_eq!(
            generate(&POOL, SequencePattern::Mirror, 6, 2, 9),
            "abcdbaabcdba"
        );
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = Lcg::new(1234);
        let mut shuffled = ordering(&POOL, SequencePattern::Shuffle, &mut rng);
        shuffled.sort_unstable();
        assert_eq!(shuffled, POOL.to_vec());
    }

    #[test]
    fn test_shuffle_deterministic() {
        let a = generate(&POOL, SequencePattern::Shuffle, 5, 4, 77);
        let b = generate(&POOL, SequencePattern::Shuffle, 5, 4, 77);
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_is_repeat_times_chunk() {
        for (chunk, repeat) in [(1, 1), (3, 7), (10, 2), (0, 5), (5, 0)] {
            let text = generate(&POOL, SequencePattern::Shuffle, chunk, repeat, 3);
            assert_eq!(text.chars().count(), chunk * repeat);
        }
    }

    #[test]
    fn test_single_entry_pool() {
        assert_eq!(generate(&['j'], SequencePattern::Mirror, 2, 2, 0), "jjjj");
    }
}
