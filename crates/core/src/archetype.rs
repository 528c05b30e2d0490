//! Static theme table: tile choices and generation parameters per archetype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::rng::GenRng;
use crate::types::Tile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeId {
    Cave,
    Ruins,
    Crypt,
    Forest,
    Tech,
    BossArena,
}

/// Archetypes eligible for random selection; the arena is only built on request.
pub const LEVEL_ARCHETYPES: [ArchetypeId; 5] = [
    ArchetypeId::Cave,
    ArchetypeId::Ruins,
    ArchetypeId::Crypt,
    ArchetypeId::Forest,
    ArchetypeId::Tech,
];

/// How the exit is searched for once the spawn is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSearch {
    /// Farthest path distance from spawn.
    Standard,
    /// Farthest straight-line distance; for open maps with scattered obstacles.
    SparseObstacle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Archetype {
    pub id: ArchetypeId,
    pub wall: Tile,
    pub special_wall: Tile,
    pub decor: &'static [Tile],
    pub floor: Tile,
    pub path: Tile,
    pub min_room: usize,
    pub corridor_width: usize,
    /// Probability of a horizontal cut when a partition is square.
    pub split_bias: f64,
    pub room_count: (usize, usize),
    pub color_shift: u8,
    pub path_chance: f64,
    pub decor_chance: f64,
    pub door_search: DoorSearch,
}

const CAVE: Archetype = Archetype {
    id: ArchetypeId::Cave,
    wall: Tile::Wall,
    special_wall: Tile::Stone,
    decor: &[Tile::Water],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 5,
    corridor_width: 1,
    split_bias: 0.7,
    room_count: (6, 10),
    color_shift: 2,
    path_chance: 0.75,
    decor_chance: 0.04,
    door_search: DoorSearch::Standard,
};

const RUINS: Archetype = Archetype {
    id: ArchetypeId::Ruins,
    wall: Tile::Stone,
    special_wall: Tile::Wall,
    decor: &[Tile::Sand],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 5,
    corridor_width: 1,
    split_bias: 0.5,
    room_count: (5, 8),
    color_shift: 1,
    path_chance: 0.72,
    decor_chance: 0.06,
    door_search: DoorSearch::Standard,
};

const CRYPT: Archetype = Archetype {
    id: ArchetypeId::Crypt,
    wall: Tile::Stone,
    special_wall: Tile::Wall,
    decor: &[Tile::Water],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 4,
    corridor_width: 1,
    split_bias: 0.6,
    room_count: (8, 12),
    color_shift: 0,
    path_chance: 0.78,
    decor_chance: 0.02,
    door_search: DoorSearch::Standard,
};

const FOREST: Archetype = Archetype {
    id: ArchetypeId::Forest,
    wall: Tile::Tree,
    special_wall: Tile::Mountain,
    decor: &[Tile::Water, Tile::Sand],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 7,
    corridor_width: 2,
    split_bias: 0.3,
    room_count: (2, 5),
    color_shift: 3,
    path_chance: 0.8,
    decor_chance: 0.08,
    door_search: DoorSearch::SparseObstacle,
};

const TECH: Archetype = Archetype {
    id: ArchetypeId::Tech,
    wall: Tile::Wall,
    special_wall: Tile::Stone,
    decor: &[Tile::Water],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 6,
    corridor_width: 1,
    split_bias: 0.5,
    room_count: (8, 12),
    color_shift: 4,
    path_chance: 0.7,
    decor_chance: 0.03,
    door_search: DoorSearch::Standard,
};

const BOSS_ARENA: Archetype = Archetype {
    id: ArchetypeId::BossArena,
    wall: Tile::Stone,
    special_wall: Tile::Wall,
    decor: &[Tile::Water],
    floor: Tile::Empty,
    path: Tile::Path,
    min_room: 8,
    corridor_width: 2,
    split_bias: 0.5,
    room_count: (2, 3),
    color_shift: 5,
    path_chance: 0.7,
    decor_chance: 0.02,
    door_search: DoorSearch::Standard,
};

impl ArchetypeId {
    pub fn archetype(self) -> &'static Archetype {
        match self {
            ArchetypeId::Cave => &CAVE,
            ArchetypeId::Ruins => &RUINS,
            ArchetypeId::Crypt => &CRYPT,
            ArchetypeId::Forest => &FOREST,
            ArchetypeId::Tech => &TECH,
            ArchetypeId::BossArena => &BOSS_ARENA,
        }
    }

    pub fn random(rng: &mut GenRng) -> Self {
        let index = rng.range(0, LEVEL_ARCHETYPES.len() - 1);
        LEVEL_ARCHETYPES[index]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArchetypeId::Cave => "cave",
            ArchetypeId::Ruins => "ruins",
            ArchetypeId::Crypt => "crypt",
            ArchetypeId::Forest => "forest",
            ArchetypeId::Tech => "tech",
            ArchetypeId::BossArena => "boss_arena",
        }
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchetypeId {
    type Err = GenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "cave" => Ok(ArchetypeId::Cave),
            "ruins" => Ok(ArchetypeId::Ruins),
            "crypt" => Ok(ArchetypeId::Crypt),
            "forest" => Ok(ArchetypeId::Forest),
            "tech" | "tech_facility" => Ok(ArchetypeId::Tech),
            "boss_arena" => Ok(ArchetypeId::BossArena),
            _ => Err(GenError::UnknownArchetype(raw.to_string())),
        }
    }
}
