//! Level assembly: composes layout, corridors, decoration, repair and placement passes.

use log::debug;

use crate::archetype::{Archetype, ArchetypeId};
use crate::config::{GeneratorConfig, check_dimensions};
use crate::error::GenError;
use crate::grid::Grid;
use crate::rng::GenRng;

use super::arena::build_arena;
use super::connectivity::ensure_connected_with_limit;
use super::corridors::connect;
use super::decorate::decorate;
use super::door::place_door;
use super::layout::{Room, carve_room, partition};
use super::model::{BossArena, GeneratedLevel};
use super::spawns::place_spawn;

#[derive(Clone, Debug, Default)]
pub struct LevelGenerator {
    config: GeneratorConfig,
}

impl LevelGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds a level. The archetype falls back to the configured one, then to a uniform
    /// pick among the level archetypes.
    pub fn generate(
        &self,
        width: usize,
        height: usize,
        archetype: Option<ArchetypeId>,
        rng: &mut GenRng,
    ) -> Result<GeneratedLevel, GenError> {
        self.check_fits(width, height)?;
        let archetype_id = archetype
            .or(self.config.archetype)
            .unwrap_or_else(|| ArchetypeId::random(rng));
        debug!("generating {width}x{height} level with archetype {archetype_id}");

        let archetype = archetype_id.archetype();
        let (mut grid, rooms) = self.carve_layout(width, height, archetype, rng);
        let spawn =
            place_spawn(&mut grid, self.config.spawn_radius, self.config.repair_sample_limit);
        let door = place_door(&mut grid, spawn, archetype.door_search, &self.config, rng);
        debug!("level ready: {} rooms, spawn {spawn:?}, door {door:?}", rooms.len());

        Ok(GeneratedLevel { grid, spawn, door, archetype: archetype_id, rooms })
    }

    pub fn generate_boss_arena(
        &self,
        width: usize,
        height: usize,
        rng: &mut GenRng,
    ) -> Result<BossArena, GenError> {
        self.check_fits(width, height)?;
        debug!("generating {width}x{height} boss arena");
        let archetype = ArchetypeId::BossArena.archetype();
        let (grid, _) = self.carve_layout(width, height, archetype, rng);
        Ok(build_arena(grid, archetype, self.config.repair_sample_limit))
    }

    fn check_fits(&self, width: usize, height: usize) -> Result<(), GenError> {
        check_dimensions(width, height)?;
        let spawn_span = 2 * self.config.spawn_radius + 3;
        if spawn_span > width || spawn_span > height {
            return Err(GenError::InvalidConfig(format!(
                "spawn_radius {} does not fit a {width}x{height} grid",
                self.config.spawn_radius
            )));
        }
        Ok(())
    }

    /// Rooms, corridors, decoration and repair: everything before placement.
    fn carve_layout(
        &self,
        width: usize,
        height: usize,
        archetype: &Archetype,
        rng: &mut GenRng,
    ) -> (Grid, Vec<Room>) {
        let mut grid = Grid::new(width, height, archetype.wall);
        let rooms = partition(width, height, archetype, rng);
        for room in &rooms {
            carve_room(&mut grid, room, archetype.floor);
        }
        let corridors = connect(&rooms, &mut grid, archetype, rng);
        let decorated = decorate(&mut grid, archetype, rng);
        debug!(
            "layout: {} rooms, {} corridors, {decorated} tiles decorated",
            rooms.len(),
            corridors.len()
        );
        ensure_connected_with_limit(&mut grid, self.config.repair_sample_limit);
        (grid, rooms)
    }
}
