//! Structural checks every finished level and arena must pass.

use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::grid::Grid;
use crate::mapgen::door::fits_door_counts;
use crate::mapgen::{BossArena, GeneratedLevel, door_neighbor_counts, walkable_regions};
use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("border tile {pos:?} is {tile:?}, not wall-class")]
    OpenBorder { pos: Pos, tile: Tile },

    #[error("walkable tiles split into {regions} regions")]
    Disconnected { regions: usize },

    #[error("tile {pos:?} near spawn {spawn:?} is not walkable")]
    UnsafeSpawn { spawn: Pos, pos: Pos },

    #[error("expected exactly one door, found {found}")]
    DoorCount { found: usize },

    #[error("recorded door position {pos:?} holds no door")]
    DoorMoved { pos: Pos },

    #[error("{pos:?} cannot be reached from {from:?}")]
    Unreachable { from: Pos, pos: Pos },

    #[error("door {pos:?} has {walls} wall and {openings} walkable neighbors")]
    PoorDoorSpot { pos: Pos, walls: usize, openings: usize },
}

fn check_border(grid: &Grid, violations: &mut Vec<InvariantViolation>) {
    for pos in grid.border_positions() {
        let tile = grid.tile_at(pos);
        if !tile.is_wall_class() {
            violations.push(InvariantViolation::OpenBorder { pos, tile });
        }
    }
}

fn check_connected(grid: &Grid, violations: &mut Vec<InvariantViolation>) {
    let regions = walkable_regions(grid).len();
    if regions > 1 {
        violations.push(InvariantViolation::Disconnected { regions });
    }
}

/// True when `pos` is in `region` or orthogonally next to it.
fn touches(region: &[Pos], pos: Pos) -> bool {
    region.iter().any(|&cell| cell.x.abs_diff(pos.x) + cell.y.abs_diff(pos.y) <= 1)
}

fn region_of(grid: &Grid, start: Pos) -> Vec<Pos> {
    walkable_regions(grid).into_iter().find(|region| region.contains(&start)).unwrap_or_default()
}

pub fn check_level(level: &GeneratedLevel, config: &GeneratorConfig) -> Vec<InvariantViolation> {
    let grid = &level.grid;
    let mut violations = Vec::new();
    check_border(grid, &mut violations);
    check_connected(grid, &mut violations);

    let radius = config.spawn_radius as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let pos = level.spawn.offset(dx, dy);
            if !grid.is_interior(pos) || !grid.is_walkable(pos) {
                violations.push(InvariantViolation::UnsafeSpawn { spawn: level.spawn, pos });
            }
        }
    }

    let doors = grid.count(Tile::Door) + grid.count(Tile::BossDoor);
    if doors != 1 {
        violations.push(InvariantViolation::DoorCount { found: doors });
    }
    let door = level.door;
    if !grid.tile_at(door).is_door() {
        violations.push(InvariantViolation::DoorMoved { pos: door });
        return violations;
    }
    if !touches(&region_of(grid, level.spawn), door) {
        violations.push(InvariantViolation::Unreachable { from: level.spawn, pos: door });
    }
    let (walls, openings) = door_neighbor_counts(grid, door);
    if !fits_door_counts(walls, openings) {
        violations.push(InvariantViolation::PoorDoorSpot { pos: door, walls, openings });
    }
    violations
}

pub fn check_arena(arena: &BossArena) -> Vec<InvariantViolation> {
    let grid = &arena.grid;
    let mut violations = Vec::new();
    check_border(grid, &mut violations);
    check_connected(grid, &mut violations);

    let entrance_region = region_of(grid, arena.entrance);
    if entrance_region.is_empty() {
        violations.push(InvariantViolation::UnsafeSpawn {
            spawn: arena.entrance,
            pos: arena.entrance,
        });
    } else if !entrance_region.contains(&arena.center) {
        let (from, pos) = (arena.entrance, arena.center);
        violations.push(InvariantViolation::Unreachable { from, pos });
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypeId;
    use crate::mapgen::{generate_boss_arena, generate_level};
    use crate::rng::GenRng;

    fn level(seed: u64) -> GeneratedLevel {
        generate_level(40, 20, Some(ArchetypeId::Cave), &mut GenRng::seed_from_u64(seed))
            .expect("level")
    }

    #[test]
    fn fresh_levels_pass() {
        for seed in 0..10 {
            assert_eq!(check_level(&level(seed), &GeneratorConfig::default()), Vec::new());
        }
    }

    #[test]
    fn detects_open_border_and_missing_door() {
        let mut broken = level(1);
        broken.grid.set(Pos { y: 0, x: 5 }, Tile::Empty);
        broken.grid.set(broken.door, Tile::Empty);
        let violations = check_level(&broken, &GeneratorConfig::default());
        assert!(violations.contains(&InvariantViolation::OpenBorder {
            pos: Pos { y: 0, x: 5 },
            tile: Tile::Empty
        }));
        assert!(violations.contains(&InvariantViolation::DoorCount { found: 0 }));
        assert!(violations.contains(&InvariantViolation::DoorMoved { pos: broken.door }));
    }

    #[test]
    fn detects_blocked_spawn_neighborhood() {
        let mut broken = level(2);
        let blocked = broken.spawn.offset(1, 1);
        broken.grid.set(blocked, Tile::Water);
        let violations = check_level(&broken, &GeneratorConfig::default());
        assert!(
            violations
                .contains(&InvariantViolation::UnsafeSpawn { spawn: broken.spawn, pos: blocked })
        );
    }

    #[test]
    fn detects_stray_regions() {
        let mut broken = level(3);
        let mut sealed = Grid::new(broken.grid.width(), broken.grid.height(), Tile::Wall);
        for pos in broken.grid.positions() {
            if broken.grid.tile_at(pos).is_door() {
                sealed.set(pos, Tile::Door);
            }
        }
        sealed.set(broken.spawn, Tile::Empty);
        sealed.set(Pos { y: 1, x: 1 }, Tile::Empty);
        broken.grid = sealed;
        let violations = check_level(&broken, &GeneratorConfig::default());
        assert!(violations.iter().any(|v| matches!(v, InvariantViolation::Disconnected { .. })));
    }

    #[test]
    fn boss_door_in_open_floor_is_a_poor_spot() {
        let config = GeneratorConfig::default();
        let mut broken = level(4);
        let (width, height) = (broken.grid.width() as i32, broken.grid.height() as i32);
        let spawn = broken.spawn;
        let open = broken
            .grid
            .positions()
            .find(|&pos| {
                (2..width - 2).contains(&pos.x)
                    && (2..height - 2).contains(&pos.y)
                    && pos.x.abs_diff(spawn.x).max(pos.y.abs_diff(spawn.y)) > 3
            })
            .expect("tile away from spawn");
        for dy in -1..=1 {
            for dx in -1..=1 {
                broken.grid.set(open.offset(dx, dy), Tile::Empty);
            }
        }
        broken.grid.set(broken.door, Tile::Empty);
        broken.grid.set(open, Tile::BossDoor);
        broken.door = open;
        let violations = check_level(&broken, &config);
        assert!(violations.contains(&InvariantViolation::PoorDoorSpot {
            pos: open,
            walls: 0,
            openings: 8
        }));
    }

    #[test]
    fn arenas_pass_and_sealed_entrance_is_reported() {
        let mut rng = GenRng::seed_from_u64(8);
        let mut arena = generate_boss_arena(30, 22, &mut rng).expect("arena");
        assert_eq!(check_arena(&arena), Vec::new());
        arena.grid.set(arena.entrance, Tile::Wall);
        assert!(!check_arena(&arena).is_empty());
    }
}
