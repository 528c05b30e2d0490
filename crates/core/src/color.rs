//! Per-tile color codes for renderers, with per-archetype theme overrides.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{Pos, Tile};

pub fn base_color(tile: Tile) -> u8 {
    match tile {
        Tile::Empty => 0,
        Tile::Wall => 7,
        Tile::Tree => 2,
        Tile::Water => 4,
        Tile::Path => 3,
        Tile::Mountain => 7,
        Tile::Door => 5,
        Tile::Stairs => 6,
        Tile::Stone => 8,
        Tile::Sand => 3,
        Tile::BossDoor => 1,
    }
}

/// Theme override for `tile` under `color_shift`; unknown shifts override nothing.
fn theme_override(tile: Tile, color_shift: u8) -> Option<u8> {
    match (color_shift, tile) {
        (1, Tile::Wall | Tile::Stone | Tile::Path) => Some(3),
        (2, Tile::Wall | Tile::Empty | Tile::Path) => Some(4),
        (2, Tile::Water) => Some(6),
        (3, Tile::Empty | Tile::Path | Tile::Wall) => Some(2),
        (4, Tile::Wall | Tile::Stone | Tile::Path) => Some(6),
        (4, Tile::Empty) => Some(8),
        (4, Tile::Water) => Some(4),
        (5, Tile::Wall | Tile::Stone | Tile::Empty | Tile::Path) => Some(7),
        (5, Tile::Water) => Some(6),
        _ => None,
    }
}

pub fn tile_color(tile: Tile, color_shift: u8) -> u8 {
    theme_override(tile, color_shift).unwrap_or_else(|| base_color(tile))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    colors: Vec<u8>,
}

impl ColorGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, pos: Pos) -> Option<u8> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.colors[y * self.width + x])
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.colors.chunks(self.width.max(1)).map(<[u8]>::to_vec).collect()
    }
}

pub fn colorize(grid: &Grid, color_shift: u8) -> ColorGrid {
    ColorGrid {
        width: grid.width(),
        height: grid.height(),
        colors: grid.tiles().iter().map(|&tile| tile_color(tile, color_shift)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ALL_TILES;

    #[test]
    fn shift_zero_uses_base_palette() {
        for tile in ALL_TILES {
            assert_eq!(tile_color(tile, 0), base_color(tile));
        }
    }

    #[test]
    fn unknown_shift_falls_back_to_base() {
        for tile in ALL_TILES {
            assert_eq!(tile_color(tile, 42), base_color(tile));
        }
    }

    #[test]
    fn themes_override_only_listed_tiles() {
        assert_eq!(tile_color(Tile::Wall, 1), 3);
        assert_eq!(tile_color(Tile::Water, 1), 4);
        assert_eq!(tile_color(Tile::Water, 2), 6);
        assert_eq!(tile_color(Tile::Empty, 4), 8);
        assert_eq!(tile_color(Tile::Door, 5), 5);
        assert_eq!(tile_color(Tile::BossDoor, 3), 1);
    }

    #[test]
    fn colorize_keeps_grid_shape() {
        let mut grid = Grid::new(4, 3, Tile::Wall);
        grid.set(Pos { y: 1, x: 1 }, Tile::Empty);
        let colors = colorize(&grid, 2);
        assert_eq!((colors.width(), colors.height()), (4, 3));
        assert_eq!(colors.get(Pos { y: 1, x: 1 }), Some(4));
        assert_eq!(colors.get(Pos { y: 0, x: 0 }), Some(4));
        assert_eq!(colors.get(Pos { y: 3, x: 0 }), None);
        assert_eq!(colors.to_rows().len(), 3);
    }
}
