use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

/// Tile legend shared with the render and entity collaborators.
///
/// The discriminants are the wire codes of the grid exchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Tile {
    Empty = 0,
    Wall = 1,
    Tree = 2,
    Water = 3,
    Path = 4,
    Mountain = 5,
    Door = 6,
    Stairs = 7,
    Stone = 8,
    Sand = 9,
    BossDoor = 10,
}

pub const ALL_TILES: [Tile; 11] = [
    Tile::Empty,
    Tile::Wall,
    Tile::Tree,
    Tile::Water,
    Tile::Path,
    Tile::Mountain,
    Tile::Door,
    Tile::Stairs,
    Tile::Stone,
    Tile::Sand,
    Tile::BossDoor,
];

impl Tile {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Walkable set used by collision, line of sight and every generator pass.
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Path | Tile::Sand)
    }

    /// Solid tiles that count as "wall" for enclosure and door heuristics.
    pub fn is_wall_class(self) -> bool {
        matches!(self, Tile::Wall | Tile::Tree | Tile::Mountain | Tile::Stone)
    }

    pub fn is_door(self) -> bool {
        matches!(self, Tile::Door | Tile::BossDoor)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tile::Empty => "EMPTY",
            Tile::Wall => "WALL",
            Tile::Tree => "TREE",
            Tile::Water => "WATER",
            Tile::Path => "PATH",
            Tile::Mountain => "MOUNTAIN",
            Tile::Door => "DOOR",
            Tile::Stairs => "STAIRS",
            Tile::Stone => "STONE",
            Tile::Sand => "SAND",
            Tile::BossDoor => "BOSS_DOOR",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Tree => '♣',
            Tile::Water => '~',
            Tile::Path => '·',
            Tile::Mountain => '▲',
            Tile::Door => '+',
            Tile::Stairs => '≡',
            Tile::Stone => '▓',
            Tile::Sand => ':',
            Tile::BossDoor => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tile code {0} is not part of the legend")]
pub struct TileCodeError(pub u8);

impl TryFrom<u8> for Tile {
    type Error = TileCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ALL_TILES.get(usize::from(code)).copied().ok_or(TileCodeError(code))
    }
}

impl From<Tile> for u8 {
    fn from(tile: Tile) -> Self {
        tile.code()
    }
}

/// Walkability predicate on raw legend codes; unknown codes are never walkable.
pub fn is_walkable(code: u8) -> bool {
    Tile::try_from(code).is_ok_and(Tile::is_walkable)
}
