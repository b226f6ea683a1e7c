//! Door placement
//!
//! For each labeled room, collects the unassigned cells along its flat
//! boundary, decides how many doors the room gets from its size, and opens
//! that many doors at random, never two side by side.

use std::collections::BTreeMap;

use log::{debug, trace};

use super::labeling::{LabeledRoom, RoomLabels};
use crate::map::{Grid, Pos, Tile};
use crate::rng::GenRng;

/// Which labeled rooms receive doors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoorPolicy {
    /// Leave the highest-numbered room without doors, as the first
    /// DungeonDigger releases did
    pub skip_last_room: bool,
}

/// Candidate door cells of one room, scored by how many room cells touch them
pub type Candidates = BTreeMap<Pos, u32>;

/// Score the unassigned cells bordering `room`
///
/// A neighbor scores once per room cell it touches. Neighbors on the outer
/// edge of the grid in the direction of the step are skipped.
pub fn door_candidates(grid: &Grid, room: &LabeledRoom) -> Candidates {
    let last_row = grid.height().saturating_sub(1);
    let last_col = grid.width().saturating_sub(1);
    let mut candidates = Candidates::new();

    for &cell in &room.cells {
        let steps = [
            cell.up().filter(|p| p.row != 0),
            Some(cell.down()).filter(|p| p.row != last_row),
            cell.left().filter(|p| p.col != 0),
            Some(cell.right()).filter(|p| p.col != last_col),
        ];
        for next in steps.into_iter().flatten() {
            if grid.get(next) == Some(Tile::Unassigned) {
                *candidates.entry(next).or_insert(0) += 1;
            }
        }
    }
    candidates
}

/// Drop candidates touched by more than one room cell (inner corners)
pub fn remove_corners(candidates: &mut Candidates) {
    candidates.retain(|_, score| *score <= 1);
}

/// Number of doors to open: `round(candidates / (10 + cells / 10))`
pub fn door_target(candidates: usize, room_cells: usize) -> usize {
    let divisor = 10.0 + room_cells as f64 / 10.0;
    (candidates as f64 / divisor).round() as usize
}

/// Open up to `target` doors chosen from `candidates`
///
/// Each opened door removes itself and its four neighbors from the
/// candidates. Stops early when candidates run out.
pub fn open_doors(
    grid: &mut Grid,
    mut candidates: Candidates,
    target: usize,
    rng: &mut GenRng,
) -> Vec<Pos> {
    let mut opened = Vec::with_capacity(target);
    while opened.len() < target {
        let Some(pick) = rng.index(candidates.len()) else {
            break;
        };
        let Some(&door) = candidates.keys().nth(pick) else {
            break;
        };

        grid.set(door, Tile::DoorOpen);
        trace!("door at {door}");
        candidates.remove(&door);
        for next in door.neighbors4() {
            candidates.remove(&next);
        }
        opened.push(door);
    }
    opened
}

/// Place doors for every labeled room; returns the opened doors per room id
///
/// Doors opened for one room are already in the grid when the next room is
/// scored, so two rooms never claim the same cell.
pub fn place_doors(
    grid: &mut Grid,
    labels: &RoomLabels,
    policy: DoorPolicy,
    rng: &mut GenRng,
) -> BTreeMap<usize, Vec<Pos>> {
    let last = if policy.skip_last_room {
        labels.len().saturating_sub(1)
    } else {
        labels.len()
    };

    let mut doors = BTreeMap::new();
    for room in labels.iter().take(last) {
        let mut candidates = door_candidates(grid, room);
        remove_corners(&mut candidates);
        let target = door_target(candidates.len(), room.len());
        let opened = open_doors(grid, candidates, target, rng);
        trace!(
            "room {}: {} of {target} doors opened",
            room.id,
            opened.len()
        );
        doors.insert(room.id, opened);
    }

    debug!(
        "opened {} doors across {} rooms",
        doors.values().map(Vec::len).sum::<usize>(),
        doors.len()
    );
    doors
}
