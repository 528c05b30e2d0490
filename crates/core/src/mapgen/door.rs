//! Exit door search and boss-door promotion.
//!
//! Every candidate is checked against one shared predicate ([`is_good_door_spot`]) plus two
//! placement guards: it stays clear of the spawn neighborhood, and turning it into a door
//! cannot split the walkable area around it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{debug, warn};

use crate::archetype::DoorSearch;
use crate::config::GeneratorConfig;
use crate::grid::Grid;
use crate::rng::GenRng;
use crate::types::{Pos, Tile};

use super::grid::{
    blocking_keeps_neighbors_linked, cell_index, component_size_without, count_ring,
    distance_squared, flood_walkable, manhattan, nearest_matching, orthogonal_neighbors,
};

const MIN_DOOR_WALLS: usize = 1;
const MAX_DOOR_WALLS: usize = 5;
const MIN_DOOR_OPENINGS: usize = 3;
const SPARSE_SAMPLE_ATTEMPTS: usize = 200;

/// Wall-class and walkable tile counts among the eight neighbors of `pos`.
pub fn door_neighbor_counts(grid: &Grid, pos: Pos) -> (usize, usize) {
    let walls = count_ring(grid, pos, |cell| grid.tile_at(cell).is_wall_class());
    let openings = count_ring(grid, pos, |cell| grid.is_walkable(cell));
    (walls, openings)
}

/// A walkable tile sitting against some wall while still open on at least three sides.
pub fn is_good_door_spot(grid: &Grid, pos: Pos) -> bool {
    if !grid.is_interior(pos) || !grid.is_walkable(pos) {
        return false;
    }
    let (walls, openings) = door_neighbor_counts(grid, pos);
    fits_door_counts(walls, openings)
}

pub(crate) fn fits_door_counts(walls: usize, openings: usize) -> bool {
    (MIN_DOOR_WALLS..=MAX_DOOR_WALLS).contains(&walls) && openings >= MIN_DOOR_OPENINGS
}

fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

struct Placement<'a> {
    grid: &'a Grid,
    spawn: Pos,
    spawn_radius: u32,
    reachable: Vec<bool>,
    reachable_count: usize,
}

impl<'a> Placement<'a> {
    fn new(grid: &'a Grid, spawn: Pos, spawn_radius: usize) -> Self {
        let mut reachable = vec![false; grid.width() * grid.height()];
        let reachable_count = flood_walkable(grid, spawn, &mut reachable).len();
        Self { grid, spawn, spawn_radius: spawn_radius as u32, reachable, reachable_count }
    }

    fn is_reachable(&self, pos: Pos) -> bool {
        self.grid.in_bounds(pos) && self.reachable[cell_index(self.grid, pos)]
    }

    fn clear_of_spawn(&self, pos: Pos) -> bool {
        chebyshev(pos, self.spawn) > self.spawn_radius + 1
    }

    fn accepts(&self, pos: Pos) -> bool {
        self.is_reachable(pos)
            && self.clear_of_spawn(pos)
            && is_good_door_spot(self.grid, pos)
            && (blocking_keeps_neighbors_linked(self.grid, pos) || self.keeps_level_whole(pos))
    }

    /// Exact check: every other reachable tile is still reachable with `pos` blocked.
    fn keeps_level_whole(&self, pos: Pos) -> bool {
        component_size_without(self.grid, self.spawn, pos) + 1 == self.reachable_count
    }

    fn in_target_quadrant(&self, pos: Pos) -> bool {
        let mid_x = (self.grid.width() / 2) as i32;
        let mid_y = (self.grid.height() / 2) as i32;
        (pos.x >= mid_x) == (self.spawn.x < mid_x) && (pos.y >= mid_y) == (self.spawn.y < mid_y)
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    pos: Pos,
    distance: u32,
    in_target: bool,
}

impl Candidate {
    fn beats(self, best: Self) -> bool {
        match (self.in_target, best.in_target) {
            (true, false) => true,
            // Outside the target quadrant a candidate must be half again as far away.
            (false, true) => u64::from(self.distance) * 2 > u64::from(best.distance) * 3,
            _ => self.distance > best.distance,
        }
    }
}

/// Picks the exit tile, writes [`Tile::Door`] there and returns its position.
pub fn place_door(
    grid: &mut Grid,
    spawn: Pos,
    search: DoorSearch,
    config: &GeneratorConfig,
    rng: &mut GenRng,
) -> Pos {
    let door = {
        let placement = Placement::new(grid, spawn, config.spawn_radius);
        let (found, farthest) = match search {
            DoorSearch::Standard => standard_search(&placement),
            DoorSearch::SparseObstacle => sparse_search(&placement, rng),
        };
        found.unwrap_or_else(|| fallback(&placement, farthest, config.door_fallback_radius))
    };
    grid.set(door, Tile::Door);
    debug!("door placed at {door:?} ({search:?} search)");
    door
}

/// Greedy frontier that always expands the tile with the longest accumulated walk.
fn standard_search(placement: &Placement<'_>) -> (Option<Pos>, Pos) {
    let grid = placement.grid;
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut frontier = BinaryHeap::from([(0_u32, placement.spawn)]);
    let mut farthest = (0_u32, placement.spawn);
    let mut best: Option<Candidate> = None;

    while let Some((distance, pos)) = frontier.pop() {
        let index = cell_index(grid, pos);
        if visited[index] {
            continue;
        }
        visited[index] = true;
        if distance > farthest.0 {
            farthest = (distance, pos);
        }

        if placement.accepts(pos) {
            let candidate =
                Candidate { pos, distance, in_target: placement.in_target_quadrant(pos) };
            if best.is_none_or(|best| candidate.beats(best)) {
                best = Some(candidate);
            }
        }

        for next in orthogonal_neighbors(pos) {
            if grid.is_walkable(next) && !visited[cell_index(grid, next)] {
                frontier.push((distance + 1, next));
            }
        }
    }
    (best.map(|candidate| candidate.pos), farthest.1)
}

/// Straight-line distance search for open maps where walk length says little about
/// how far apart two points feel.
fn sparse_search(placement: &Placement<'_>, rng: &mut GenRng) -> (Option<Pos>, Pos) {
    let grid = placement.grid;
    let spawn = placement.spawn;
    let separation = (grid.width().max(grid.height()) / 3) as u64;
    let min_distance = separation * separation;

    let mut farthest = (0_u64, spawn);
    let mut best: Option<(u64, Pos)> = None;
    for pos in grid.positions().filter(|&pos| placement.is_reachable(pos)) {
        let distance = distance_squared(pos, spawn);
        if distance > farthest.0 {
            farthest = (distance, pos);
        }
        if distance >= min_distance
            && placement.accepts(pos)
            && best.is_none_or(|(best_distance, _)| distance > best_distance)
        {
            best = Some((distance, pos));
        }
    }
    if let Some((_, pos)) = best {
        return (Some(pos), farthest.1);
    }

    debug!("sparse door search fell short of {separation} tiles, sampling the far half");
    (sample_far_half(placement, rng), farthest.1)
}

fn sample_far_half(placement: &Placement<'_>, rng: &mut GenRng) -> Option<Pos> {
    let grid = placement.grid;
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    let far_half = |spawn: i32, extent: i32| {
        if spawn < extent / 2 { (extent / 2, extent - 2) } else { (1, extent / 2 - 1) }
    };
    let (x_span, y_span) = if width >= height {
        (far_half(placement.spawn.x, width), (1, height - 2))
    } else {
        ((1, width - 2), far_half(placement.spawn.y, height))
    };

    (0..SPARSE_SAMPLE_ATTEMPTS)
        .map(|_| Pos {
            y: rng.range_i32(y_span.0, y_span.1),
            x: rng.range_i32(x_span.0, x_span.1),
        })
        .find(|&pos| placement.accepts(pos))
}

fn fallback(placement: &Placement<'_>, farthest: Pos, radius: usize) -> Pos {
    let nearby = nearest_matching(placement.grid, farthest, radius, |pos| placement.accepts(pos));
    if let Some(pos) = nearby {
        debug!("door found near the farthest tile {farthest:?}");
        return pos;
    }

    let scanned = placement
        .grid
        .positions()
        .filter(|&pos| placement.accepts(pos))
        .max_by_key(|&pos| (manhattan(pos, placement.spawn), pos));
    if let Some(pos) = scanned {
        debug!("door found by full scan at {pos:?}");
        return pos;
    }

    // No good spot anywhere: settle for the farthest tile whose loss strands nothing.
    let mut relaxed: Vec<Pos> = placement
        .grid
        .positions()
        .filter(|&pos| placement.is_reachable(pos) && placement.clear_of_spawn(pos))
        .collect();
    relaxed.sort_by_key(|&pos| Reverse((manhattan(pos, placement.spawn), pos)));
    if let Some(pos) = relaxed.into_iter().find(|&pos| placement.keeps_level_whole(pos)) {
        warn!("no good door spot, using {pos:?}");
        return pos;
    }

    warn!("no door spot keeps the level whole, using farthest reachable tile {farthest:?}");
    farthest
}

/// Moves the exit onto a nearby good door spot as [`Tile::BossDoor`] once `player_level`
/// reaches `threshold`. Orthogonal neighbors of the old door are tried first, then the
/// nearest spot within `search_radius` steps. Positions accepted by `keep_clear` are never
/// used, and neither is a tile whose blocking would cut the walkable area in two.
pub(crate) fn promote_guarded(
    grid: &mut Grid,
    player_level: u32,
    threshold: u32,
    search_radius: usize,
    keep_clear: impl Fn(Pos) -> bool,
) -> Option<Pos> {
    if player_level < threshold {
        return None;
    }
    let door = grid.find(Tile::Door)?;
    grid.set(door, Tile::Empty);

    let site = {
        let grid = &*grid;
        let mut region = vec![false; grid.width() * grid.height()];
        let region_size = flood_walkable(grid, door, &mut region).len();
        let usable = |pos: Pos| {
            pos != door
                && grid.in_bounds(pos)
                && region[cell_index(grid, pos)]
                && !keep_clear(pos)
                && is_good_door_spot(grid, pos)
                && (blocking_keeps_neighbors_linked(grid, pos)
                    || component_size_without(grid, door, pos) + 1 == region_size)
        };
        orthogonal_neighbors(door)
            .into_iter()
            .find(|&pos| usable(pos))
            .or_else(|| nearest_matching(grid, door, search_radius, &usable))
    };

    match site {
        Some(pos) => {
            grid.set(pos, Tile::BossDoor);
            debug!("door at {door:?} promoted to boss door at {pos:?}");
            Some(pos)
        }
        None => {
            grid.set(door, Tile::Door);
            warn!("no boss door site around {door:?}, keeping the regular door");
            None
        }
    }
}

/// Keep-clear guard for promotion: the spawn tile and its `radius` ring.
pub(crate) fn near_spawn(spawn: Pos, radius: usize) -> impl Fn(Pos) -> bool {
    move |pos| chebyshev(pos, spawn) <= radius as u32
}
