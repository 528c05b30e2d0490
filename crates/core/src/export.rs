//! JSON interchange for generated levels and arenas.

use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypeId;
use crate::color::colorize;
use crate::error::GenError;
use crate::grid::Grid;
use crate::mapgen::{BossArena, GeneratedLevel};
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelExport {
    pub width: usize,
    pub height: usize,
    pub archetype: ArchetypeId,
    pub color_shift: u8,
    /// Legend codes, one row per line of the grid.
    pub tiles: Vec<Vec<u8>>,
    pub colors: Vec<Vec<u8>>,
    pub spawn: Pos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door: Option<Pos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss: Option<Pos>,
}

impl LevelExport {
    fn from_grid(grid: &Grid, archetype: ArchetypeId, spawn: Pos) -> Self {
        let color_shift = archetype.archetype().color_shift;
        Self {
            width: grid.width(),
            height: grid.height(),
            archetype,
            color_shift,
            tiles: grid.to_rows(),
            colors: colorize(grid, color_shift).to_rows(),
            spawn,
            door: None,
            boss: None,
        }
    }

    pub fn from_level(level: &GeneratedLevel) -> Self {
        let export = Self::from_grid(&level.grid, level.archetype, level.spawn);
        Self { door: Some(level.door), ..export }
    }

    /// The player enters at the arena entrance; the boss waits at its center.
    pub fn from_arena(arena: &BossArena) -> Self {
        Self {
            boss: Some(arena.center),
            ..Self::from_grid(&arena.grid, ArchetypeId::BossArena, arena.entrance)
        }
    }

    pub fn to_json(&self) -> Result<String, GenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, GenError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_grid(&self) -> Result<Grid, GenError> {
        Grid::from_rows(&self.tiles)
    }
}
