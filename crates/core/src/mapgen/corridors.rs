//! Spanning-tree corridor network over room centers.
//!
//! Edges of the complete room graph are taken in ascending Manhattan distance and accepted
//! through a union-find, so `n` rooms always get exactly `n - 1` corridors.

use crate::archetype::Archetype;
use crate::grid::Grid;
use crate::rng::GenRng;
use crate::types::Pos;

use super::grid::manhattan;
use super::layout::Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: u32,
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect() }
    }

    fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = index;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return false;
        }
        self.parent[right_root] = left_root;
        true
    }
}

pub fn connect(
    rooms: &[Room],
    grid: &mut Grid,
    archetype: &Archetype,
    rng: &mut GenRng,
) -> Vec<Edge> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let centers: Vec<Pos> = rooms.iter().map(|room| room.center()).collect();
    let mut candidates = Vec::with_capacity(rooms.len() * (rooms.len() - 1) / 2);
    for from in 0..rooms.len() {
        for to in (from + 1)..rooms.len() {
            candidates.push(Edge { from, to, distance: manhattan(centers[from], centers[to]) });
        }
    }
    candidates.sort_by_key(|edge| (edge.distance, edge.from, edge.to));

    let mut groups = DisjointSet::new(rooms.len());
    let mut accepted = Vec::with_capacity(rooms.len() - 1);
    for edge in candidates {
        if !groups.union(edge.from, edge.to) {
            continue;
        }
        carve_corridor(grid, &rooms[edge.from], &rooms[edge.to], archetype, rng);
        accepted.push(edge);
        if accepted.len() == rooms.len() - 1 {
            break;
        }
    }
    accepted
}

fn carve_corridor(
    grid: &mut Grid,
    from: &Room,
    to: &Room,
    archetype: &Archetype,
    rng: &mut GenRng,
) {
    let start = from.center();
    let end = to.center();

    if let Some((left, right)) = from.column_overlap(to) {
        let x = ((left + right) / 2) as i32;
        carve_vertical(grid, x, start.y, end.y, archetype, rng);
        return;
    }
    if let Some((top, bottom)) = from.row_overlap(to) {
        let y = ((top + bottom) / 2) as i32;
        carve_horizontal(grid, y, start.x, end.x, archetype, rng);
        return;
    }

    if rng.chance(0.5) {
        carve_horizontal(grid, start.y, start.x, end.x, archetype, rng);
        carve_vertical(grid, end.x, start.y, end.y, archetype, rng);
    } else {
        carve_vertical(grid, start.x, start.y, end.y, archetype, rng);
        carve_horizontal(grid, end.y, start.x, end.x, archetype, rng);
    }
}

fn carve_horizontal(
    grid: &mut Grid,
    y: i32,
    from_x: i32,
    to_x: i32,
    archetype: &Archetype,
    rng: &mut GenRng,
) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        for band in 0..archetype.corridor_width as i32 {
            carve_cell(grid, Pos { y: y + band, x }, archetype, rng);
        }
    }
}

fn carve_vertical(
    grid: &mut Grid,
    x: i32,
    from_y: i32,
    to_y: i32,
    archetype: &Archetype,
    rng: &mut GenRng,
) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        for band in 0..archetype.corridor_width as i32 {
            carve_cell(grid, Pos { y, x: x + band }, archetype, rng);
        }
    }
}

fn carve_cell(grid: &mut Grid, pos: Pos, archetype: &Archetype, rng: &mut GenRng) {
    if !grid.is_interior(pos) {
        return;
    }
    let tile = if rng.chance(archetype.path_chance) { archetype.path } else { archetype.floor };
    grid.set(pos, tile);
}
