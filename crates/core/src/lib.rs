pub mod archetype;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod invariants;
pub mod mapgen;
pub mod query;
pub mod rng;
pub mod types;

pub use archetype::{Archetype, ArchetypeId, DoorSearch, LEVEL_ARCHETYPES};
pub use color::{ColorGrid, colorize};
pub use config::{GeneratorConfig, MIN_DIMENSION};
pub use error::GenError;
pub use export::LevelExport;
pub use grid::Grid;
pub use invariants::{InvariantViolation, check_arena, check_level};
pub use mapgen::{
    BossArena, Descent, GeneratedLevel, LevelGenerator, generate_boss_arena, generate_level,
    promote_boss_door, seal_entrance,
};
pub use rng::{GenRng, generate_runtime_seed};
pub use types::*;
