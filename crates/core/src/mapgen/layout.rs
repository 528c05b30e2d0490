//! Binary space partitioning of the grid into leaf regions with one room each.

use slotmap::{SlotMap, new_key_type};

use crate::archetype::Archetype;
use crate::grid::Grid;
use crate::rng::GenRng;
use crate::types::{Pos, Tile};

/// Gap kept between a room and the edge of its partition.
const ROOM_MARGIN: usize = 1;

new_key_type! {
    struct NodeId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.y + (self.height / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Shared column span, if the two rooms overlap when projected onto the x axis.
    pub(super) fn column_overlap(self, other: &Self) -> Option<(usize, usize)> {
        let from = self.x.max(other.x);
        let to = self.right().min(other.right());
        (from <= to).then_some((from, to))
    }

    pub(super) fn row_overlap(self, other: &Self) -> Option<(usize, usize)> {
        let from = self.y.max(other.y);
        let to = self.bottom().min(other.bottom());
        (from <= to).then_some((from, to))
    }
}

struct PartitionNode {
    region: Room,
    children: Option<(NodeId, NodeId)>,
}

/// Arena-backed BSP tree; dropped once the leaf rooms are extracted.
struct PartitionTree {
    nodes: SlotMap<NodeId, PartitionNode>,
    root: NodeId,
}

impl PartitionTree {
    fn new(width: usize, height: usize) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(PartitionNode {
            region: Room { x: 0, y: 0, width, height },
            children: None,
        });
        Self { nodes, root }
    }

    fn split(&mut self, id: NodeId, archetype: &Archetype, rng: &mut GenRng) -> bool {
        let region = self.nodes[id].region;
        let horizontal_first = if region.width > region.height {
            false
        } else if region.height > region.width {
            true
        } else {
            rng.chance(archetype.split_bias)
        };

        let leaf_min = archetype.min_room + 2 * ROOM_MARGIN;
        let Some((first, second)) = cut(region, horizontal_first, leaf_min, rng)
            .or_else(|| cut(region, !horizontal_first, leaf_min, rng))
        else {
            return false;
        };

        let first = self.nodes.insert(PartitionNode { region: first, children: None });
        let second = self.nodes.insert(PartitionNode { region: second, children: None });
        self.nodes[id].children = Some((first, second));
        true
    }

    fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes[id].children {
                Some((first, second)) => {
                    stack.push(second);
                    stack.push(first);
                }
                None => leaves.push(id),
            }
        }
        leaves
    }
}

fn cut(region: Room, horizontal: bool, leaf_min: usize, rng: &mut GenRng) -> Option<(Room, Room)> {
    let span = if horizontal { region.height } else { region.width };
    if span < 2 * leaf_min {
        return None;
    }
    let at = rng.range(leaf_min, span - leaf_min);
    Some(if horizontal {
        (
            Room { height: at, ..region },
            Room { y: region.y + at, height: region.height - at, ..region },
        )
    } else {
        (
            Room { width: at, ..region },
            Room { x: region.x + at, width: region.width - at, ..region },
        )
    })
}

fn depth_budget(target_rooms: usize) -> u32 {
    target_rooms.max(1).next_power_of_two().trailing_zeros()
}

/// Splits the `width` x `height` rectangle and returns one room per leaf, in tree order.
pub fn partition(
    width: usize,
    height: usize,
    archetype: &Archetype,
    rng: &mut GenRng,
) -> Vec<Room> {
    let target_rooms = rng.range(archetype.room_count.0, archetype.room_count.1);
    let mut tree = PartitionTree::new(width, height);

    let mut leaf_count = 1_usize;
    let mut frontier = vec![tree.root];
    for _ in 0..depth_budget(target_rooms) {
        let mut next = Vec::new();
        for id in frontier {
            if leaf_count >= target_rooms {
                break;
            }
            if tree.split(id, archetype, rng) {
                leaf_count += 1;
                if let Some((first, second)) = tree.nodes[id].children {
                    next.push(first);
                    next.push(second);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    tree.leaves()
        .into_iter()
        .filter_map(|id| place_room(tree.nodes[id].region, archetype.min_room, rng))
        .collect()
}

fn place_room(region: Room, min_room: usize, rng: &mut GenRng) -> Option<Room> {
    let available_width = region.width.saturating_sub(2 * ROOM_MARGIN);
    let available_height = region.height.saturating_sub(2 * ROOM_MARGIN);
    if available_width == 0 || available_height == 0 {
        return None;
    }

    let width = rng.range(min_room.min(available_width), available_width);
    let height = rng.range(min_room.min(available_height), available_height);
    let x = region.x + ROOM_MARGIN + rng.range(0, available_width - width);
    let y = region.y + ROOM_MARGIN + rng.range(0, available_height - height);
    Some(Room { x, y, width, height })
}

pub(super) fn carve_room(grid: &mut Grid, room: &Room, floor: Tile) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            grid.set(Pos { y: y as i32, x: x as i32 }, floor);
        }
    }
}
