//! Boss arena shaping on top of a carved layout: open disc, rubble, bottom entrance.

use log::debug;

use crate::archetype::Archetype;
use crate::grid::Grid;
use crate::types::{Pos, Tile};

use super::connectivity::ensure_connected_with_limit;
use super::grid::distance_squared;
use super::model::BossArena;

const ENTRANCE_HALF_WIDTH: i32 = 1;

pub(super) fn build_arena(mut grid: Grid, archetype: &Archetype, sample_limit: usize) -> BossArena {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let center = Pos { y: height / 2, x: width / 2 };
    let entrance = Pos { y: height - 2, x: width / 2 };
    let radius = i64::from(width.min(height) / 3);
    let radius_squared = (radius * radius) as u64;
    let in_disc = |pos: Pos| distance_squared(pos, center) <= radius_squared;
    let in_corridor =
        |pos: Pos| pos.x.abs_diff(center.x) <= ENTRANCE_HALF_WIDTH as u32 && pos.y >= center.y;

    for pos in grid.positions() {
        if grid.is_interior(pos) && in_disc(pos) {
            grid.set(pos, archetype.floor);
        }
    }

    // 2x2 blocks mirrored across both axes.
    let left = width / 4;
    let top = height / 4;
    let anchors = [
        Pos { y: top, x: left },
        Pos { y: top, x: width - 2 - left },
        Pos { y: height - 2 - top, x: left },
        Pos { y: height - 2 - top, x: width - 2 - left },
    ];
    let mut rubble_blocks = 0;
    for anchor in anchors {
        let block = [anchor, anchor.offset(1, 0), anchor.offset(0, 1), anchor.offset(1, 1)];
        if block.iter().any(|&pos| !grid.is_interior(pos) || in_disc(pos) || in_corridor(pos)) {
            continue;
        }
        for pos in block {
            grid.set(pos, archetype.special_wall);
        }
        rubble_blocks += 1;
    }

    for y in center.y..height - 1 {
        for dx in -ENTRANCE_HALF_WIDTH..=ENTRANCE_HALF_WIDTH {
            let pos = Pos { y, x: center.x + dx };
            if grid.is_interior(pos) {
                grid.set(pos, archetype.floor);
            }
        }
    }

    ensure_connected_with_limit(&mut grid, sample_limit);
    grid.stamp_border(archetype.wall);
    debug!("arena shaped: disc radius {radius}, {rubble_blocks} rubble blocks");

    BossArena { grid, center, entrance }
}

/// Closes the arena entrance behind the player. Returns false when `entrance` is off-grid.
pub fn seal_entrance(grid: &mut Grid, entrance: Pos, tile: Tile) -> bool {
    if !grid.is_interior(entrance) {
        return false;
    }
    grid.set(entrance, tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeId;
    use crate::mapgen::connectivity::walkable_regions;
    use crate::mapgen::grid::reachable_mask;

    fn arena_from_blank(width: usize, height: usize) -> BossArena {
        let archetype = ArchetypeId::BossArena.archetype();
        build_arena(Grid::new(width, height, archetype.wall), archetype, 50)
    }

    #[test]
    fn entrance_reaches_center() {
        let arena = arena_from_blank(30, 22);
        assert_eq!(arena.center, Pos { y: 11, x: 15 });
        assert_eq!(arena.entrance, Pos { y: 20, x: 15 });
        assert!(arena.grid.is_walkable(arena.entrance));
        assert!(arena.grid.is_border(arena.entrance.offset(0, 1)));

        let mask = reachable_mask(&arena.grid, arena.entrance);
        let center_index = (arena.center.y as usize) * arena.grid.width() + arena.center.x as usize;
        assert!(mask[center_index]);
        assert_eq!(walkable_regions(&arena.grid).len(), 1);
    }

    #[test]
    fn rubble_is_placed_outside_the_disc() {
        let arena = arena_from_blank(30, 22);
        let special = ArchetypeId::BossArena.archetype().special_wall;
        let rubble: Vec<Pos> =
            arena.grid.positions().filter(|&pos| arena.grid.tile_at(pos) == special).collect();
        assert_eq!(rubble.len(), 16);
        assert!(rubble.iter().all(|&pos| distance_squared(pos, arena.center) > 49));
        assert!(rubble.contains(&Pos { y: 5, x: 7 }));
        assert!(rubble.contains(&Pos { y: 16, x: 22 }));
    }

    #[test]
    fn border_is_restamped_last() {
        let arena = arena_from_blank(16, 12);
        let wall = ArchetypeId::BossArena.archetype().wall;
        let border = arena.grid.border_positions();
        assert!(border.into_iter().all(|pos| arena.grid.tile_at(pos) == wall));
    }

    #[test]
    fn sealing_only_touches_interior_tiles() {
        let mut arena = arena_from_blank(30, 22);
        assert!(seal_entrance(&mut arena.grid, arena.entrance, Tile::Wall));
        assert_eq!(arena.grid.tile_at(arena.entrance), Tile::Wall);
        assert!(!seal_entrance(&mut arena.grid, Pos { y: 21, x: 15 }, Tile::Empty));
        assert!(!seal_entrance(&mut arena.grid, Pos { y: -1, x: 3 }, Tile::Wall));
    }
}
