//! Reachability repair: flood-fill walkable regions and tunnel every stray region into the
//! largest one.

use std::cmp::Reverse;

use log::{debug, warn};

use crate::grid::Grid;
use crate::types::{Pos, Tile};

use super::grid::{flood_walkable, manhattan};

pub const DEFAULT_SAMPLE_LIMIT: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub regions_found: usize,
    pub tunnels_carved: usize,
    pub tiles_converted: usize,
}

/// Maximal 4-connected sets of walkable tiles, in scan order of their first tile.
pub fn walkable_regions(grid: &Grid) -> Vec<Vec<Pos>> {
    let mut seen = vec![false; grid.width() * grid.height()];
    let mut regions = Vec::new();
    for pos in grid.positions() {
        let region = flood_walkable(grid, pos, &mut seen);
        if !region.is_empty() {
            regions.push(region);
        }
    }
    regions
}

pub fn ensure_connected(grid: &mut Grid) -> RepairReport {
    ensure_connected_with_limit(grid, DEFAULT_SAMPLE_LIMIT)
}

pub fn ensure_connected_with_limit(grid: &mut Grid, sample_limit: usize) -> RepairReport {
    let mut regions = walkable_regions(grid);
    let mut report = RepairReport { regions_found: regions.len(), ..RepairReport::default() };
    if regions.len() <= 1 {
        return report;
    }

    regions.sort_by_key(|region| Reverse(region.len()));
    let mut regions = regions.into_iter();
    let mut main_region = regions.next().unwrap_or_default();

    for region in regions {
        let Some((from, to)) = closest_pair(&main_region, &region, sample_limit) else {
            continue;
        };
        let tunnel = choose_tunnel(grid, from, to);
        for &cell in &tunnel {
            let tile = grid.tile_at(cell);
            if tile.is_walkable() || tile.is_door() || !grid.is_interior(cell) {
                continue;
            }
            grid.set(cell, Tile::Empty);
            report.tiles_converted += 1;
        }
        report.tunnels_carved += 1;
        main_region.extend(tunnel);
        main_region.extend(region);
    }

    debug!(
        "connectivity repair: {} regions, {} tunnels, {} tiles converted",
        report.regions_found, report.tunnels_carved, report.tiles_converted
    );
    report
}

fn sample(points: &[Pos], limit: usize) -> impl Iterator<Item = Pos> + '_ {
    let stride = points.len().div_ceil(limit.max(1)).max(1);
    points.iter().step_by(stride).copied()
}

fn closest_pair(main_region: &[Pos], region: &[Pos], limit: usize) -> Option<(Pos, Pos)> {
    let mut best: Option<(u32, Pos, Pos)> = None;
    for from in sample(main_region, limit) {
        for to in sample(region, limit) {
            let distance = manhattan(from, to);
            if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, from, to));
            }
        }
    }
    best.map(|(_, from, to)| (from, to))
}

/// Two-segment orthogonal tunnel; the bend side is flipped when the first choice would
/// run through a door.
fn choose_tunnel(grid: &Grid, from: Pos, to: Pos) -> Vec<Pos> {
    let horizontal_first = l_tunnel(from, to, true);
    if !horizontal_first.iter().any(|&cell| grid.tile_at(cell).is_door()) {
        return horizontal_first;
    }
    let vertical_first = l_tunnel(from, to, false);
    if vertical_first.iter().any(|&cell| grid.tile_at(cell).is_door()) {
        warn!("repair tunnel {from:?} -> {to:?} crosses a door on both bends");
    }
    vertical_first
}

fn l_tunnel(from: Pos, to: Pos, horizontal_first: bool) -> Vec<Pos> {
    let corner =
        if horizontal_first { Pos { y: from.y, x: to.x } } else { Pos { y: to.y, x: from.x } };
    let mut cells = straight_line(from, corner);
    cells.extend(straight_line(corner, to));
    cells
}

fn straight_line(from: Pos, to: Pos) -> Vec<Pos> {
    if from.y == to.y {
        (from.x.min(to.x)..=from.x.max(to.x)).map(|x| Pos { y: from.y, x }).collect()
    } else {
        (from.y.min(to.y)..=from.y.max(to.y)).map(|y| Pos { y, x: from.x }).collect()
    }
}
