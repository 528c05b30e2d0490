//! Tile-space primitives shared by carving, repair and placement passes.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::types::Pos;

pub(super) fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub(super) fn distance_squared(a: Pos, b: Pos) -> u64 {
    let dx = u64::from(a.x.abs_diff(b.x));
    let dy = u64::from(a.y.abs_diff(b.y));
    dx * dx + dy * dy
}

pub(super) fn orthogonal_neighbors(pos: Pos) -> [Pos; 4] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y, x: pos.x - 1 },
    ]
}

/// The eight surrounding cells in ring order, starting north and turning clockwise.
/// Consecutive entries are orthogonally adjacent to each other.
pub(super) fn ring_neighbors(pos: Pos) -> [Pos; 8] {
    [
        Pos { y: pos.y - 1, x: pos.x },
        Pos { y: pos.y - 1, x: pos.x + 1 },
        Pos { y: pos.y, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x + 1 },
        Pos { y: pos.y + 1, x: pos.x },
        Pos { y: pos.y + 1, x: pos.x - 1 },
        Pos { y: pos.y, x: pos.x - 1 },
        Pos { y: pos.y - 1, x: pos.x - 1 },
    ]
}

pub(super) fn cell_index(grid: &Grid, pos: Pos) -> usize {
    (pos.y as usize) * grid.width() + (pos.x as usize)
}

/// Breadth-first walk over walkable tiles from `start`, marking `seen`.
pub(super) fn flood_walkable(grid: &Grid, start: Pos, seen: &mut [bool]) -> Vec<Pos> {
    let mut component = Vec::new();
    if !grid.is_walkable(start) || seen[cell_index(grid, start)] {
        return component;
    }

    let mut open = VecDeque::from([start]);
    seen[cell_index(grid, start)] = true;
    while let Some(pos) = open.pop_front() {
        component.push(pos);
        for next in orthogonal_neighbors(pos) {
            if !grid.is_walkable(next) {
                continue;
            }
            let index = cell_index(grid, next);
            if seen[index] {
                continue;
            }
            seen[index] = true;
            open.push_back(next);
        }
    }
    component
}

/// Size of the walkable component around `start` if `blocked` were impassable.
pub(super) fn component_size_without(grid: &Grid, start: Pos, blocked: Pos) -> usize {
    if start == blocked {
        return 0;
    }
    let mut seen = vec![false; grid.width() * grid.height()];
    if grid.in_bounds(blocked) {
        seen[cell_index(grid, blocked)] = true;
    }
    flood_walkable(grid, start, &mut seen).len()
}

#[cfg(test)]
pub(super) fn reachable_mask(grid: &Grid, start: Pos) -> Vec<bool> {
    let mut seen = vec![false; grid.width() * grid.height()];
    flood_walkable(grid, start, &mut seen);
    seen
}

/// Nearest cell (by steps through interior cells of any kind) satisfying `accept`.
pub(super) fn nearest_matching(
    grid: &Grid,
    start: Pos,
    max_steps: usize,
    accept: impl Fn(Pos) -> bool,
) -> Option<Pos> {
    if !grid.in_bounds(start) {
        return None;
    }
    let mut seen = vec![false; grid.width() * grid.height()];
    let mut open = VecDeque::from([(start, 0_usize)]);
    seen[cell_index(grid, start)] = true;

    while let Some((pos, steps)) = open.pop_front() {
        if accept(pos) {
            return Some(pos);
        }
        if steps == max_steps {
            continue;
        }
        for next in orthogonal_neighbors(pos) {
            if !grid.is_interior(next) {
                continue;
            }
            let index = cell_index(grid, next);
            if seen[index] {
                continue;
            }
            seen[index] = true;
            open.push_back((next, steps + 1));
        }
    }
    None
}

pub(super) fn count_ring(grid: &Grid, pos: Pos, predicate: impl Fn(Pos) -> bool) -> usize {
    ring_neighbors(pos)
        .into_iter()
        .filter(|&neighbor| grid.in_bounds(neighbor) && predicate(neighbor))
        .count()
}

/// True when blocking `pos` cannot split its walkable orthogonal neighbors: they all sit in
/// one unbroken walkable run of the surrounding ring.
pub(super) fn blocking_keeps_neighbors_linked(grid: &Grid, pos: Pos) -> bool {
    let ring = ring_neighbors(pos);
    let walkable: Vec<bool> = ring.iter().map(|&cell| grid.is_walkable(cell)).collect();
    if walkable.iter().all(|&open| open) {
        return true;
    }

    // Rotate so the scan starts on a blocked cell; runs then never wrap around.
    let Some(start) = walkable.iter().position(|&open| !open) else {
        return true;
    };
    let mut runs_with_orthogonal = 0;
    let mut in_run = false;
    let mut run_has_orthogonal = false;
    for step in 1..=ring.len() {
        let slot = (start + step) % ring.len();
        if walkable[slot] {
            in_run = true;
            run_has_orthogonal |= slot % 2 == 0;
        } else if in_run {
            if run_has_orthogonal {
                runs_with_orthogonal += 1;
            }
            in_run = false;
            run_has_orthogonal = false;
        }
    }
    runs_with_orthogonal <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    fn grid_from(rows: &[&str]) -> Grid {
        let rows: Vec<Vec<u8>> = rows
            .iter()
            .map(|row| row.chars().map(|cell| if cell == '.' { 0 } else { 1 }).collect())
            .collect();
        Grid::from_rows(&rows).expect("valid rows")
    }

    #[test]
    fn flood_stays_inside_one_component() {
        let grid = grid_from(&["#####", "#..##", "###.#", "#####"]);
        let mask = reachable_mask(&grid, Pos { y: 1, x: 1 });
        assert!(mask[cell_index(&grid, Pos { y: 1, x: 2 })]);
        assert!(!mask[cell_index(&grid, Pos { y: 2, x: 3 })]);
    }

    #[test]
    fn blocking_a_corridor_halves_the_component() {
        let grid = grid_from(&["#######", "#.....#", "#######"]);
        let start = Pos { y: 1, x: 1 };
        assert_eq!(component_size_without(&grid, start, Pos { y: 1, x: 3 }), 2);
        assert_eq!(component_size_without(&grid, start, Pos { y: 1, x: 5 }), 4);
        assert_eq!(component_size_without(&grid, start, start), 0);
    }

    #[test]
    fn nearest_matching_respects_step_budget() {
        let mut grid = Grid::new(9, 3, Tile::Wall);
        grid.set(Pos { y: 1, x: 7 }, Tile::Empty);
        let start = Pos { y: 1, x: 1 };
        let is_empty = |pos: Pos| grid.tile_at(pos) == Tile::Empty;
        assert_eq!(nearest_matching(&grid, start, 5, is_empty), None);
        assert_eq!(nearest_matching(&grid, start, 6, is_empty), Some(Pos { y: 1, x: 7 }));
    }

    #[test]
    fn corridor_cell_is_a_cut_point() {
        let grid = grid_from(&["#####", "#...#", "#####"]);
        assert!(!blocking_keeps_neighbors_linked(&grid, Pos { y: 1, x: 2 }));
        assert!(blocking_keeps_neighbors_linked(&grid, Pos { y: 1, x: 1 }));
    }

    #[test]
    fn room_edge_cell_is_not_a_cut_point() {
        let grid = grid_from(&["#####", "#...#", "#...#", "#...#", "#####"]);
        assert!(blocking_keeps_neighbors_linked(&grid, Pos { y: 1, x: 2 }));
        assert!(blocking_keeps_neighbors_linked(&grid, Pos { y: 2, x: 2 }));
    }
}
