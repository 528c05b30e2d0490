//! Run progression: successive levels of one run, each from its own derived seed.

use log::info;

use crate::error::GenError;
use crate::rng::GenRng;

use super::generator::LevelGenerator;
use super::model::{BossArena, GeneratedLevel};
use super::seed::derive_level_seed;

#[derive(Clone, Debug)]
pub struct Descent {
    run_seed: u64,
    depth: u32,
    player_level: u32,
    generator: LevelGenerator,
}

impl Descent {
    pub fn new(run_seed: u64, generator: LevelGenerator) -> Self {
        Self { run_seed, depth: 0, player_level: 1, generator }
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    /// Number of levels generated so far; the first level is depth 1.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn player_level(&self) -> u32 {
        self.player_level
    }

    pub fn set_player_level(&mut self, player_level: u32) {
        self.player_level = player_level;
    }

    /// Generates the next level down and gates its exit once the player qualifies.
    pub fn next_level(&mut self, width: usize, height: usize) -> Result<GeneratedLevel, GenError> {
        let depth = self.depth + 1;
        let mut rng = GenRng::seed_from_u64(derive_level_seed(self.run_seed, depth, false));
        let mut level = self.generator.generate(width, height, None, &mut rng)?;
        let promoted = level.promote_boss_door(self.player_level, self.generator.config());
        self.depth = depth;
        info!(
            "descended to depth {depth}: {} level, boss door {}",
            level.archetype,
            if promoted.is_some() { "open" } else { "locked" }
        );
        Ok(level)
    }

    /// Arena for the current depth; generating it does not advance the run.
    pub fn enter_boss_arena(&self, width: usize, height: usize) -> Result<BossArena, GenError> {
        let mut rng = GenRng::seed_from_u64(derive_level_seed(self.run_seed, self.depth, true));
        self.generator.generate_boss_arena(width, height, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    fn descent(seed: u64) -> Descent {
        Descent::new(seed, LevelGenerator::default())
    }

    #[test]
    fn replaying_a_run_reproduces_every_level() {
        let mut first = descent(2_024);
        let mut second = descent(2_024);
        for _ in 0..4 {
            let a = first.next_level(40, 20).expect("level");
            let b = second.next_level(40, 20).expect("level");
            assert_eq!(a.fingerprint(), b.fingerprint());
        }
        assert_eq!(first.depth(), 4);
    }

    #[test]
    fn consecutive_depths_differ() {
        let mut run = descent(9);
        let shallow = run.next_level(40, 20).expect("level");
        let deeper = run.next_level(40, 20).expect("level");
        assert_ne!(shallow.fingerprint(), deeper.fingerprint());
    }

    #[test]
    fn low_level_players_see_a_regular_door() {
        let mut run = descent(5);
        for _ in 0..5 {
            let level = run.next_level(40, 20).expect("level");
            assert_eq!(level.grid.count(Tile::Door), 1);
            assert_eq!(level.grid.count(Tile::BossDoor), 0);
        }
    }

    #[test]
    fn qualified_players_get_boss_doors() {
        let mut run = descent(5);
        run.set_player_level(3);
        let mut promoted = 0;
        for _ in 0..10 {
            let level = run.next_level(40, 20).expect("level");
            assert_eq!(level.grid.count(Tile::Door) + level.grid.count(Tile::BossDoor), 1);
            if level.has_boss_door() {
                promoted += 1;
            }
        }
        assert!(promoted >= 8, "only {promoted} of 10 levels got a boss door");
    }

    #[test]
    fn arena_does_not_advance_depth() {
        let mut run = descent(31);
        run.next_level(40, 20).expect("level");
        let arena = run.enter_boss_arena(30, 22).expect("arena");
        assert_eq!(run.depth(), 1);
        assert_eq!(arena, run.enter_boss_arena(30, 22).expect("arena"));
    }
}
