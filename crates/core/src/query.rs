//! Read-only movement, sight and interaction queries for code consuming a finished grid.
//!
//! Continuous coordinates map onto the tile containing them; anything off the grid blocks.

use log::warn;

use crate::grid::Grid;
use crate::types::{Pos, Tile};

pub const PROBE_STEP: f64 = 0.1;
pub const DEFAULT_PROBE_REACH: f64 = 2.0;
const MOVE_SAMPLES: u32 = 3;

fn containing_tile(x: f64, y: f64) -> Pos {
    Pos { y: y.floor() as i32, x: x.floor() as i32 }
}

pub fn is_blocked(grid: &Grid, x: f64, y: f64) -> bool {
    !grid.is_walkable(containing_tile(x, y))
}

/// Checks the destination and evenly spaced points along the way.
pub fn would_collide(grid: &Grid, from: (f64, f64), to: (f64, f64)) -> bool {
    if is_blocked(grid, to.0, to.1) {
        return true;
    }
    (1..MOVE_SAMPLES).any(|step| {
        let t = f64::from(step) / f64::from(MOVE_SAMPLES);
        is_blocked(grid, from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
    })
}

pub fn is_spawn_valid(grid: &Grid, x: f64, y: f64) -> bool {
    !is_blocked(grid, x, y)
}

/// Grid center if walkable, else the first walkable interior tile; as a last resort the
/// center is cleared.
pub fn find_valid_spawn(grid: &mut Grid) -> Pos {
    let center = Pos { y: (grid.height() / 2) as i32, x: (grid.width() / 2) as i32 };
    if grid.is_walkable(center) {
        return center;
    }
    let first_open = grid.positions().find(|&pos| grid.is_interior(pos) && grid.is_walkable(pos));
    if let Some(pos) = first_open {
        return pos;
    }
    warn!("no walkable tile, clearing {center:?} for the spawn");
    grid.set(center, Tile::Empty);
    center
}

/// Supercover walk between tile centers; walls, doors and other blocking tiles in between
/// cut the line, the endpoints themselves do not.
pub fn has_line_of_sight(grid: &Grid, origin: Pos, target: Pos) -> bool {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let sx = dx.signum();
    let sy = dy.signum();
    let total_x = dx.abs();
    let total_y = dy.abs();

    let mut x = origin.x;
    let mut y = origin.y;
    let mut step_x = 0;
    let mut step_y = 0;

    while step_x < total_x || step_y < total_y {
        let lhs = (1 + 2 * step_x) * total_y;
        let rhs = (1 + 2 * step_y) * total_x;

        if lhs == rhs {
            x += sx;
            y += sy;
            step_x += 1;
            step_y += 1;
        } else if lhs < rhs {
            x += sx;
            step_x += 1;
        } else {
            y += sy;
            step_y += 1;
        }

        if x == target.x && y == target.y {
            break;
        }
        if !grid.is_walkable(Pos { y, x }) {
            return false;
        }
    }
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeHit {
    Door,
    BossDoor,
    Stairs,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
    pub hit: ProbeHit,
    pub pos: Pos,
}

/// Marches a ray from (`x`, `y`) along `angle` (radians, 0 = east, clockwise on screen)
/// and reports the first interactable or blocking tile within `reach`.
pub fn probe(grid: &Grid, x: f64, y: f64, angle: f64, reach: f64) -> Option<Probe> {
    let steps = (reach / PROBE_STEP).round() as u32;
    let (sin, cos) = angle.sin_cos();
    for step in 1..=steps {
        let distance = f64::from(step) * PROBE_STEP;
        let pos = containing_tile(x + distance * cos, y + distance * sin);
        let tile = grid.get(pos)?;
        let hit = match tile {
            Tile::Door => ProbeHit::Door,
            Tile::BossDoor => ProbeHit::BossDoor,
            Tile::Stairs => ProbeHit::Stairs,
            tile if tile.is_walkable() => continue,
            _ => ProbeHit::Wall,
        };
        return Some(Probe { hit, pos });
    }
    None
}
