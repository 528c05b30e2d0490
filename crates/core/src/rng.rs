//! Explicit random stream threaded through every generation call.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct GenRng {
    inner: ChaCha8Rng,
}

impl GenRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Non-reproducible stream for callers that do not care about seeds.
    pub fn from_runtime_seed() -> Self {
        Self::seed_from_u64(generate_runtime_seed())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform value in `min_value..=max_value`.
    pub fn range(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value, "empty range {min_value}..={max_value}");
        let range_size = (max_value - min_value) as u64 + 1;
        min_value + (self.next_u64() % range_size) as usize
    }

    pub fn range_i32(&mut self, min_value: i32, max_value: i32) -> i32 {
        debug_assert!(min_value <= max_value);
        let range_size = u64::from(min_value.abs_diff(max_value)) + 1;
        min_value + (self.next_u64() % range_size) as i32
    }

    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.range(0, items.len() - 1);
        items.get(index)
    }

    /// Independent child stream, e.g. for pre-generating levels on other threads.
    pub fn fork(&mut self) -> Self {
        Self::seed_from_u64(self.next_u64())
    }
}

static RUNTIME_SEED_DRAWS: AtomicU64 = AtomicU64::new(0);

/// Seed from wall-clock time, the process id and a per-process draw counter.
pub fn generate_runtime_seed() -> u64 {
    let nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_nanos());
    let draw = RUNTIME_SEED_DRAWS.fetch_add(1, Ordering::Relaxed);
    let clock = (nanos as u64) ^ ((nanos >> 64) as u64);
    [clock, u64::from(process::id()), draw]
        .into_iter()
        .fold(0, |state, word| splitmix(state ^ word))
}

/// SplitMix64 output function; a bijection on `u64`.
pub(crate) fn splitmix(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    value = (value ^ (value >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_inside_requested_bounds() {
        let mut rng = GenRng::seed_from_u64(12_345);
        for _ in 0..500 {
            let value = rng.range(7, 13);
            assert!((7..=13).contains(&value), "{value} escaped 7..=13");
            let signed = rng.range_i32(-3, 2);
            assert!((-3..=2).contains(&signed));
        }
    }

    #[test]
    fn same_seed_produces_same_stream() {
        let mut left = GenRng::seed_from_u64(99);
        let mut right = GenRng::seed_from_u64(99);
        for _ in 0..32 {
            assert_eq!(left.next_u64(), right.next_u64());
        }
    }

    #[test]
    fn chance_respects_extremes() {
        let mut rng = GenRng::seed_from_u64(5);
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn choose_returns_none_for_empty_slice() {
        let mut rng = GenRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choose(&empty), None);
        assert_eq!(rng.choose(&[4]), Some(&4));
    }

    #[test]
    fn forked_streams_diverge_from_parent() {
        let mut parent = GenRng::seed_from_u64(77);
        let mut child = parent.fork();
        assert_ne!(parent.next_u64(), child.next_u64());
    }

    #[test]
    fn runtime_seeds_differ_between_draws() {
        let seeds: Vec<u64> = (0..8).map(|_| generate_runtime_seed()).collect();
        assert!(seeds.windows(2).all(|pair| pair[0] != pair[1]), "{seeds:?}");
    }

    #[test]
    fn splitmix_is_not_the_identity() {
        assert_ne!(splitmix(0), 0);
        assert_ne!(splitmix(1), splitmix(2));
    }
}
