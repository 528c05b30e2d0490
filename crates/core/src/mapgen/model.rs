//! Public data models for generated levels and boss arenas.

use xxhash_rust::xxh3::xxh3_64;

use crate::archetype::{Archetype, ArchetypeId};
use crate::config::GeneratorConfig;
use crate::grid::Grid;
use crate::types::{Pos, Tile};

use super::door::{near_spawn, promote_guarded};
use super::layout::Room;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub grid: Grid,
    pub spawn: Pos,
    /// Current exit tile; moves when the door is promoted.
    pub door: Pos,
    pub archetype: ArchetypeId,
    pub rooms: Vec<Room>,
}

impl GeneratedLevel {
    pub fn archetype_params(&self) -> &'static Archetype {
        self.archetype.archetype()
    }

    pub fn door_tile(&self) -> Tile {
        self.grid.tile_at(self.door)
    }

    pub fn has_boss_door(&self) -> bool {
        self.door_tile() == Tile::BossDoor
    }

    /// Promotes the exit while keeping the spawn neighborhood untouched.
    pub fn promote_boss_door(
        &mut self,
        player_level: u32,
        config: &GeneratorConfig,
    ) -> Option<Pos> {
        let promoted = promote_guarded(
            &mut self.grid,
            player_level,
            config.boss_door_level,
            config.boss_door_search_radius,
            near_spawn(self.spawn, config.spawn_radius),
        )?;
        self.door = promoted;
        Some(promoted)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.grid.canonical_bytes();
        bytes.extend(self.spawn.y.to_le_bytes());
        bytes.extend(self.spawn.x.to_le_bytes());
        bytes.extend(self.door.y.to_le_bytes());
        bytes.extend(self.door.x.to_le_bytes());
        bytes.extend(self.archetype.as_str().as_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BossArena {
    pub grid: Grid,
    pub center: Pos,
    /// Bottom-center tile directly inside the wall ring.
    pub entrance: Pos,
}

impl BossArena {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.grid.canonical_bytes();
        for pos in [self.center, self.entrance] {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
