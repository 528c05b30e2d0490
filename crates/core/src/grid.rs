//! Fixed-size row-major tile grid handed to the render and entity collaborators.

use xxhash_rust::xxh3::xxh3_64;

use crate::error::GenError;
use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: Tile) -> Self {
        Self { width, height, tiles: vec![fill; width * height] }
    }

    /// Builds a grid from rows of legend codes (the exchange format).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GenError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut tiles = Vec::with_capacity(width * height);
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GenError::RaggedRows {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            for &code in row {
                tiles.push(Tile::try_from(code)?);
            }
        }
        Ok(Self { width, height, tiles })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.tiles
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|tile| tile.code()).collect())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && (pos.x as usize) < self.width.saturating_sub(1)
            && (pos.y as usize) < self.height.saturating_sub(1)
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_interior(pos)
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[self.index(pos)])
    }

    /// Out-of-bounds reads behave like solid wall.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        self.get(pos).unwrap_or(Tile::Wall)
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let index = self.index(pos);
        self.tiles[index] = tile;
        true
    }

    pub fn stamp_border(&mut self, tile: Tile) {
        for pos in self.border_positions() {
            self.set(pos, tile);
        }
    }

    pub fn border_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&pos| !self.is_interior(pos)).collect()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    pub fn walkable_positions(&self) -> Vec<Pos> {
        self.positions().filter(|&pos| self.is_walkable(pos)).collect()
    }

    pub fn find(&self, tile: Tile) -> Option<Pos> {
        self.positions().find(|&pos| self.tile_at(pos) == tile)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&candidate| candidate == tile).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.tiles.iter().map(|tile| tile.code()));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Legend glyph dump, one line per row, with an optional `@` marker.
    pub fn to_ascii(&self, marker: Option<Pos>) -> String {
        let mut lines = Vec::with_capacity(self.height);
        for y in 0..self.height as i32 {
            let line: String = (0..self.width as i32)
                .map(|x| {
                    let pos = Pos { y, x };
                    if marker == Some(pos) { '@' } else { self.tile_at(pos).glyph() }
                })
                .collect();
            lines.push(line);
        }
        lines.join("\n")
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::new(4, 3, Tile::Empty);
        assert_eq!(grid.tile_at(Pos { y: -1, x: 0 }), Tile::Wall);
        assert_eq!(grid.tile_at(Pos { y: 0, x: 4 }), Tile::Wall);
        assert_eq!(grid.tile_at(Pos { y: 2, x: 3 }), Tile::Empty);
        assert_eq!(grid.get(Pos { y: 3, x: 0 }), None);
    }

    #[test]
    fn stamp_border_touches_only_the_outer_ring() {
        let mut grid = Grid::new(5, 4, Tile::Empty);
        grid.stamp_border(Tile::Stone);
        assert_eq!(grid.count(Tile::Stone), 2 * 5 + 2 * 2);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 1 }), Tile::Empty);
        assert!(grid.border_positions().iter().all(|&pos| grid.tile_at(pos) == Tile::Stone));
    }

    #[test]
    fn rows_round_trip_through_exchange_format() {
        let rows = vec![vec![1, 1, 1], vec![1, 0, 6], vec![8, 8, 8]];
        let grid = Grid::from_rows(&rows).expect("valid rows");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.tile_at(Pos { y: 1, x: 2 }), Tile::Door);
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn from_rows_rejects_ragged_and_unknown_codes() {
        let ragged = vec![vec![1, 1], vec![1]];
        assert!(matches!(Grid::from_rows(&ragged), Err(GenError::RaggedRows { row: 1, .. })));
        let unknown = vec![vec![1, 99]];
        assert!(matches!(Grid::from_rows(&unknown), Err(GenError::TileCode(_))));
    }

    #[test]
    fn ascii_dump_marks_requested_position() {
        let rows = vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]];
        let grid = Grid::from_rows(&rows).expect("valid rows");
        assert_eq!(grid.to_ascii(Some(Pos { y: 1, x: 1 })), "###\n#@#\n###");
        assert_eq!(grid.to_ascii(None), "###\n# #\n###");
    }

    #[test]
    fn fingerprint_tracks_tile_changes() {
        let mut grid = Grid::new(6, 6, Tile::Wall);
        let before = grid.fingerprint();
        assert_eq!(before, grid.clone().fingerprint());
        grid.set(Pos { y: 2, x: 2 }, Tile::Empty);
        assert_ne!(before, grid.fingerprint());
    }
}
