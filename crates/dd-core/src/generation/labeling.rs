//! Connected-component labeling of room tiles
//!
//! Partitions every `Room` tile into 4-connected components, numbered from 1
//! in row-major discovery order.

use std::collections::BTreeSet;

use log::debug;

use crate::error::{GenerationError, Result};
use crate::map::{Grid, Pos, Tile};

/// One connected room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRoom {
    /// 1-based label, in discovery order
    pub id: usize,
    pub cells: BTreeSet<Pos>,
}

impl LabeledRoom {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }
}

/// All rooms of a grid plus a per-cell label lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLabels {
    rooms: Vec<LabeledRoom>,
    // 0 = not a room tile
    labels: Vec<usize>,
    width: usize,
}

impl RoomLabels {
    /// Number of rooms found
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in label order
    pub fn iter(&self) -> impl Iterator<Item = &LabeledRoom> {
        self.rooms.iter()
    }

    /// Room with the given 1-based label
    pub fn get(&self, id: usize) -> Option<&LabeledRoom> {
        id.checked_sub(1).and_then(|i| self.rooms.get(i))
    }

    /// Label of the room containing `pos`, if any
    pub fn label_at(&self, pos: Pos) -> Option<usize> {
        if pos.col >= self.width {
            return None;
        }
        self.labels
            .get(pos.row * self.width + pos.col)
            .copied()
            .filter(|id| *id != 0)
    }

    /// Total number of labeled cells
    pub fn cell_count(&self) -> usize {
        self.rooms.iter().map(LabeledRoom::len).sum()
    }

    /// Partition as a set of cell sets, independent of numbering
    pub fn partition(&self) -> BTreeSet<BTreeSet<Pos>> {
        self.rooms.iter().map(|r| r.cells.clone()).collect()
    }
}

/// Label every room tile of `grid`
///
/// Uses an explicit stack, so a single huge room cannot exhaust the call
/// stack. A cell reached from two components aborts with
/// [`GenerationError::RoomLabelConflict`].
pub fn label_rooms(grid: &Grid) -> Result<RoomLabels> {
    let width = grid.width();
    let index = |pos: Pos| pos.row * width + pos.col;

    let mut labels = vec![0usize; grid.height() * width];
    let mut rooms = Vec::new();
    let mut stack = Vec::new();

    for start in grid.positions() {
        if grid[start] != Tile::Room || labels[index(start)] != 0 {
            continue;
        }

        let id = rooms.len() + 1;
        let mut cells = BTreeSet::new();
        labels[index(start)] = id;
        stack.push(start);

        while let Some(pos) = stack.pop() {
            if !cells.insert(pos) {
                return Err(GenerationError::RoomLabelConflict {
                    pos,
                    first: id,
                    second: id,
                });
            }
            for next in grid.neighbors4(pos) {
                if grid[next] != Tile::Room {
                    continue;
                }
                match labels[index(next)] {
                    0 => {
                        labels[index(next)] = id;
                        stack.push(next);
                    }
                    claimed if claimed != id => {
                        return Err(GenerationError::RoomLabelConflict {
                            pos: next,
                            first: claimed,
                            second: id,
                        });
                    }
                    _ => {}
                }
            }
        }

        rooms.push(LabeledRoom { id, cells });
    }

    debug!(
        "labeled {} rooms covering {} cells",
        rooms.len(),
        rooms.iter().map(LabeledRoom::len).sum::<usize>()
    );
    Ok(RoomLabels {
        rooms,
        labels,
        width,
    })
}
