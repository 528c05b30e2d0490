//! Player spawn selection with a widening search and a carve-out fallback.

use log::warn;

use crate::grid::Grid;
use crate::types::{Pos, Tile};

use super::connectivity::ensure_connected_with_limit;

/// True when every tile within `radius` (Chebyshev) of `center` is walkable and interior.
pub fn is_open_area(grid: &Grid, center: Pos, radius: usize) -> bool {
    let radius = radius as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let pos = center.offset(dx, dy);
            if !grid.is_interior(pos) || !grid.is_walkable(pos) {
                return false;
            }
        }
    }
    true
}

/// Scans the top-left quadrant, then the whole grid, for a fully open neighborhood. When
/// neither has one, a safe room is carved and linked into the level.
pub fn place_spawn(grid: &mut Grid, radius: usize, sample_limit: usize) -> Pos {
    let quadrant = (grid.width() / 2, grid.height() / 2);
    if let Some(spawn) = scan_for_open_area(grid, radius, quadrant) {
        return spawn;
    }
    if let Some(spawn) = scan_for_open_area(grid, radius, (grid.width(), grid.height())) {
        return spawn;
    }
    carve_safe_room(grid, radius, sample_limit)
}

fn scan_for_open_area(grid: &Grid, radius: usize, (max_x, max_y): (usize, usize)) -> Option<Pos> {
    for y in 1..max_y.min(grid.height().saturating_sub(1)) {
        for x in 1..max_x.min(grid.width().saturating_sub(1)) {
            let pos = Pos { y: y as i32, x: x as i32 };
            if is_open_area(grid, pos, radius) {
                return Some(pos);
            }
        }
    }
    None
}

fn carve_safe_room(grid: &mut Grid, radius: usize, sample_limit: usize) -> Pos {
    let clamp_axis = |preferred: usize, extent: usize| {
        let low = radius + 1;
        let high = extent.saturating_sub(radius + 2).max(low);
        preferred.clamp(low, high) as i32
    };
    let center = Pos {
        y: clamp_axis(grid.height() / 4, grid.height()),
        x: clamp_axis(grid.width() / 4, grid.width()),
    };
    warn!("no open spawn area found, carving a safe room at {center:?}");

    let radius = radius as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let pos = center.offset(dx, dy);
            if grid.is_interior(pos) {
                grid.set(pos, Tile::Empty);
            }
        }
    }
    ensure_connected_with_limit(grid, sample_limit);
    center
}
