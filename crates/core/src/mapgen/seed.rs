//! Per-depth seeds: every level of a run draws from its own stream of the run seed.

use crate::rng::splitmix;

const RUN_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Murmur3 finalizer over `seed` offset by an odd multiple of `stream`.
fn stream_hash(seed: u64, stream: u64) -> u64 {
    let mut hash = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    for multiplier in [0xFF51_AFD7_ED55_8CCD, 0xC4CE_B9FE_1A85_EC53] {
        hash ^= hash >> 33;
        hash = hash.wrapping_mul(multiplier);
    }
    hash ^ (hash >> 33)
}

/// Levels use even streams and arenas odd ones, so the arena at depth `n` never
/// shares a seed with the level at depth `n`.
pub fn derive_level_seed(run_seed: u64, depth: u32, boss_arena: bool) -> u64 {
    let stream = (u64::from(depth) << 1) | u64::from(boss_arena);
    stream_hash(splitmix(run_seed ^ RUN_SALT), stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_input_moves_the_level_seed() {
        let baseline = derive_level_seed(99, 2, false);
        assert_eq!(baseline, derive_level_seed(99, 2, false));
        for other in [
            derive_level_seed(98, 2, false),
            derive_level_seed(99, 3, false),
            derive_level_seed(99, 2, true),
        ] {
            assert_ne!(baseline, other);
        }
    }

    #[test]
    fn depths_of_one_run_get_distinct_seeds() {
        let mut seeds: Vec<u64> = (0..64)
            .flat_map(|depth| [false, true].map(|arena| derive_level_seed(7, depth, arena)))
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 128);
    }
}
