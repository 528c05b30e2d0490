//! Procedural level generation split into one submodule per pipeline stage.

pub mod model;
pub mod progression;

mod arena;
mod connectivity;
mod corridors;
mod decorate;
pub(crate) mod door;
mod generator;
mod grid;
mod layout;
mod seed;
mod spawns;

pub use arena::seal_entrance;
pub use connectivity::{
    DEFAULT_SAMPLE_LIMIT, RepairReport, ensure_connected, ensure_connected_with_limit,
    walkable_regions,
};
pub use corridors::{Edge, connect};
pub use decorate::decorate;
pub use door::{door_neighbor_counts, is_good_door_spot, place_door};
pub use generator::LevelGenerator;
pub use layout::{Room, partition};
pub use model::{BossArena, GeneratedLevel};
pub use progression::Descent;
pub use seed::derive_level_seed;
pub use spawns::{is_open_area, place_spawn};

use crate::archetype::ArchetypeId;
use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::grid::Grid;
use crate::rng::GenRng;
use crate::types::Pos;

/// Builds a level with the default configuration.
pub fn generate_level(
    width: usize,
    height: usize,
    archetype: Option<ArchetypeId>,
    rng: &mut GenRng,
) -> Result<GeneratedLevel, GenError> {
    LevelGenerator::default().generate(width, height, archetype, rng)
}

pub fn generate_boss_arena(
    width: usize,
    height: usize,
    rng: &mut GenRng,
) -> Result<BossArena, GenError> {
    LevelGenerator::default().generate_boss_arena(width, height, rng)
}

/// Swaps the level's door for a boss door when `player_level` reaches `threshold`, using
/// the default search radius. Tiles within the default spawn radius of `spawn` are never
/// chosen.
pub fn promote_boss_door(
    grid: &mut Grid,
    spawn: Pos,
    player_level: u32,
    threshold: u32,
) -> Option<Pos> {
    let config = GeneratorConfig::default();
    door::promote_guarded(
        grid,
        player_level,
        threshold,
        config.boss_door_search_radius,
        door::near_spawn(spawn, config.spawn_radius),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    #[test]
    fn generate_level_matches_level_generator_output() {
        let from_helper =
            generate_level(40, 20, None, &mut GenRng::seed_from_u64(123)).expect("level");
        let from_generator = LevelGenerator::default()
            .generate(40, 20, None, &mut GenRng::seed_from_u64(123))
            .expect("level");
        assert_eq!(from_helper, from_generator);
    }

    #[test]
    fn promote_boss_door_uses_default_radius() {
        let mut rng = GenRng::seed_from_u64(6);
        let mut level = generate_level(40, 20, Some(ArchetypeId::Crypt), &mut rng).expect("level");
        let old_door = level.door;
        if let Some(boss) = promote_boss_door(&mut level.grid, level.spawn, 4, 3) {
            assert_eq!(level.grid.tile_at(boss), Tile::BossDoor);
            let clearance = boss.x.abs_diff(level.spawn.x).max(boss.y.abs_diff(level.spawn.y));
            assert!(clearance > GeneratorConfig::default().spawn_radius as u32);
            assert_eq!(level.grid.tile_at(old_door), Tile::Empty);
        } else {
            assert_eq!(level.grid.tile_at(old_door), Tile::Door);
        }
    }
}
