//! Thematic post-pass over interior tiles.

use crate::archetype::Archetype;
use crate::grid::Grid;
use crate::rng::GenRng;

use super::grid::count_ring;

const SPECIAL_WALL_CHANCE: f64 = 0.15;
const EDGE_WALL_NEIGHBORS: usize = 3;

/// Rewrites walls and floors into archetype variants; returns how many tiles changed.
///
/// Neighbor counts read a snapshot taken before the pass, so the result does not depend
/// on scan order. Decor tiles may block movement; connectivity repair runs afterwards.
pub fn decorate(grid: &mut Grid, archetype: &Archetype, rng: &mut GenRng) -> usize {
    let snapshot = grid.clone();
    let mut changed = 0;

    for pos in snapshot.positions() {
        if !snapshot.is_interior(pos) {
            continue;
        }
        let tile = snapshot.tile_at(pos);
        let replacement = if tile == archetype.wall {
            rng.chance(SPECIAL_WALL_CHANCE).then_some(archetype.special_wall)
        } else if tile == archetype.floor {
            if rng.chance(archetype.decor_chance) {
                rng.choose(archetype.decor).copied()
            } else {
                let walls =
                    count_ring(&snapshot, pos, |cell| snapshot.tile_at(cell).is_wall_class());
                (walls >= EDGE_WALL_NEIGHBORS).then_some(archetype.path)
            }
        } else {
            None
        };

        if let Some(replacement) = replacement.filter(|&replacement| replacement != tile) {
            grid.set(pos, replacement);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeId;
    use crate::types::{Pos, Tile};

    fn boxed_room(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height, Tile::Wall);
        for y in 2..(height as i32 - 2) {
            for x in 2..(width as i32 - 2) {
                grid.set(Pos { y, x }, Tile::Empty);
            }
        }
        grid
    }

    #[test]
    fn border_is_never_decorated() {
        let archetype = Archetype { decor_chance: 1.0, ..*ArchetypeId::Cave.archetype() };
        let mut grid = boxed_room(16, 12);
        let mut rng = GenRng::seed_from_u64(9);
        decorate(&mut grid, &archetype, &mut rng);
        assert!(grid.border_positions().into_iter().all(|pos| grid.tile_at(pos) == Tile::Wall));
    }

    #[test]
    fn full_decor_chance_replaces_every_floor_tile() {
        let archetype = Archetype { decor_chance: 1.0, ..*ArchetypeId::Ruins.archetype() };
        let mut grid = boxed_room(12, 10);
        let mut rng = GenRng::seed_from_u64(2);
        decorate(&mut grid, &archetype, &mut rng);
        assert_eq!(grid.count(Tile::Empty), 0);
        assert_eq!(grid.count(Tile::Sand), 8 * 6);
    }

    #[test]
    fn room_edges_become_path_when_decor_is_off() {
        let archetype = Archetype { decor_chance: 0.0, ..*ArchetypeId::Cave.archetype() };
        let mut grid = boxed_room(12, 10);
        let mut rng = GenRng::seed_from_u64(2);
        decorate(&mut grid, &archetype, &mut rng);

        assert_eq!(grid.tile_at(Pos { y: 2, x: 2 }), Tile::Path, "corner has five wall neighbors");
        assert_eq!(grid.tile_at(Pos { y: 2, x: 5 }), Tile::Path, "edge has three wall neighbors");
        assert_eq!(grid.tile_at(Pos { y: 4, x: 5 }), Tile::Empty, "interior stays floor");
        assert!(grid.walkable_positions().len() == 8 * 6);
    }

    #[test]
    fn walls_only_turn_into_special_walls() {
        let archetype = ArchetypeId::Tech.archetype();
        let mut grid = Grid::new(30, 30, Tile::Wall);
        let mut rng = GenRng::seed_from_u64(11);
        let changed = decorate(&mut grid, archetype, &mut rng);
        assert!(changed > 0);
        assert_eq!(grid.count(Tile::Stone), changed);
        assert_eq!(grid.count(Tile::Wall) + changed, 30 * 30);
    }
}
