//! Room placement
//!
//! Repeatedly draws a room size, samples a center from the probability
//! field, stamps the room into the grid and updates the field, until the
//! field runs out of mass. The two strategies differ only in how the field
//! steers later rooms away from earlier ones.

use std::borrow::Cow;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::field::{Footprint, ProbabilityField, Sample};
use crate::error::{GenerationError, Result};
use crate::map::{Grid, Pos, Tile};
use crate::rng::GenRng;

/// How the probability field reacts to a placed room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Hard exclusion: occupied cells drop to 0 and every sample is taken
    /// from a copy with a footprint-sized margin cleared around each zero.
    /// Rooms never overlap.
    Elimination,
    /// Soft exclusion: a Gaussian bump is subtracted around each room.
    /// Overlap is unlikely but not ruled out.
    Gaussian { width_percent: f64, amplitude: f64 },
}

impl PlacementStrategy {
    /// The field a sample for `footprint` should be drawn from
    fn sampling_view<'f>(
        &self,
        field: &'f ProbabilityField,
        footprint: Footprint,
    ) -> Cow<'f, ProbabilityField> {
        match self {
            PlacementStrategy::Elimination => Cow::Owned(field.with_margin(footprint)),
            PlacementStrategy::Gaussian { .. } => Cow::Borrowed(field),
        }
    }

    fn update(&self, field: &mut ProbabilityField, room: &PlacedRoom) {
        match *self {
            PlacementStrategy::Elimination => field.clear_rect(room.origin, room.footprint()),
            PlacementStrategy::Gaussian {
                width_percent,
                amplitude,
            } => field.subtract_gaussian(room.center, room.footprint(), width_percent, amplitude),
        }
    }
}

/// Checked parameters for one placement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// Nominal room side length
    pub room_size: usize,
    /// Each side is drawn from `room_size + [-variance, variance)`
    pub variance: usize,
    pub strategy: PlacementStrategy,
    /// Stop with an error once this many rooms are placed without exhausting the field
    pub max_placements: usize,
}

/// A room stamped into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    /// Center cell drawn from the field
    pub center: Pos,
    /// Top-left stamped cell
    pub origin: Pos,
    pub height: usize,
    pub width: usize,
    /// Some stamped cell was already a room
    pub overlapped: bool,
}

impl PlacedRoom {
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.height, self.width)
    }

    /// One past the last row
    pub fn bottom(&self) -> usize {
        self.origin.row + self.height
    }

    /// One past the last column
    pub fn right(&self) -> usize {
        self.origin.col + self.width
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (self.origin.row..self.bottom()).contains(&pos.row)
            && (self.origin.col..self.right()).contains(&pos.col)
    }

    /// Check if two rooms share at least one cell
    pub fn intersects(&self, other: &PlacedRoom) -> bool {
        self.origin.row < other.bottom()
            && other.origin.row < self.bottom()
            && self.origin.col < other.right()
            && other.origin.col < self.right()
    }

    /// All cells of the room, row-major
    pub fn cells(&self) -> impl Iterator<Item = Pos> + use<> {
        let (top, bottom) = (self.origin.row, self.bottom());
        let (left, right) = (self.origin.col, self.right());
        (top..bottom).flat_map(move |row| (left..right).map(move |col| Pos::new(row, col)))
    }
}

/// Result of a single placement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Placed(PlacedRoom),
    Exhausted,
}

/// Room placement engine
///
/// Owns the probability field for one run and borrows the grid exclusively.
pub struct RoomPlacer<'g> {
    grid: &'g mut Grid,
    field: ProbabilityField,
    params: PlacementParams,
    placed: Vec<PlacedRoom>,
    exhausted: bool,
}

impl<'g> RoomPlacer<'g> {
    pub fn new(grid: &'g mut Grid, params: PlacementParams) -> Self {
        let field = ProbabilityField::fresh(grid.height(), grid.width());
        Self {
            grid,
            field,
            params,
            placed: Vec::new(),
            exhausted: false,
        }
    }

    pub fn field(&self) -> &ProbabilityField {
        &self.field
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn placed(&self) -> &[PlacedRoom] {
        &self.placed
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Draw a footprint, sample a center and stamp one room
    ///
    /// Once the field is exhausted every further step reports `Exhausted`.
    pub fn step(&mut self, rng: &mut GenRng) -> Result<Step> {
        if self.exhausted {
            return Ok(Step::Exhausted);
        }
        let footprint = self.draw_footprint(rng);
        let sample = self
            .params
            .strategy
            .sampling_view(&self.field, footprint)
            .sample(footprint, rng);

        let Sample::Chosen { center, mass } = sample else {
            trace!("field exhausted for {}x{} room", footprint.height, footprint.width);
            self.exhausted = true;
            return Ok(Step::Exhausted);
        };
        // the field still has room, but the cap is spent
        if self.placed.len() >= self.params.max_placements {
            return Err(GenerationError::PlacementLimitExceeded {
                limit: self.params.max_placements,
            });
        }

        let room = stamp_room(self.grid, center, footprint, rng);
        trace!(
            "room {} at {} ({}x{}, field mass {mass:.3})",
            self.placed.len() + 1,
            room.origin,
            room.height,
            room.width
        );
        if room.overlapped {
            warn!("room at {} overlaps an earlier room", room.origin);
        }

        self.params.strategy.update(&mut self.field, &room);
        debug_assert!(self.field.is_well_formed());
        self.placed.push(room);
        Ok(Step::Placed(room))
    }

    /// Place rooms until the field is exhausted
    pub fn run(mut self, rng: &mut GenRng) -> Result<Vec<PlacedRoom>> {
        while let Step::Placed(_) = self.step(rng)? {}
        debug!(
            "placed {} rooms on {}x{} grid",
            self.placed.len(),
            self.grid.height(),
            self.grid.width()
        );
        Ok(self.placed)
    }

    fn draw_footprint(&self, rng: &mut GenRng) -> Footprint {
        let spread = u32::try_from(self.params.variance).unwrap_or(u32::MAX);
        let mut side = || {
            let size = self.params.room_size as i64 + rng.offset(spread);
            usize::try_from(size).unwrap_or(0).max(1)
        };
        let height = side();
        let width = side();
        Footprint::new(height, width)
    }
}

/// Offset from center to the first row/column of a room side
///
/// Odd sides are centered exactly. Even sides have no center cell, so a
/// coin flip decides whether the extra cell goes before or after it.
fn side_offset(side: usize, rng: &mut GenRng) -> usize {
    if side % 2 == 1 {
        (side - 1) / 2
    } else {
        side / 2 - usize::from(rng.one_in(2))
    }
}

/// Stamp a room of `footprint` around `center`
pub fn stamp_room(
    grid: &mut Grid,
    center: Pos,
    footprint: Footprint,
    rng: &mut GenRng,
) -> PlacedRoom {
    let p = side_offset(footprint.height, rng);
    let q = side_offset(footprint.width, rng);
    let origin = Pos::new(center.row.saturating_sub(p), center.col.saturating_sub(q));

    let room = PlacedRoom {
        center,
        origin,
        height: footprint.height,
        width: footprint.width,
        overlapped: false,
    };
    let overlapped = room.cells().any(|pos| grid.get(pos) == Some(Tile::Room));
    grid.fill_rect(origin, footprint.height, footprint.width, Tile::Room);

    PlacedRoom { overlapped, ..room }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elimination(room_size: usize, variance: usize, cap: usize) -> PlacementParams {
        PlacementParams {
            room_size,
            variance,
            strategy: PlacementStrategy::Elimination,
            max_placements: cap,
        }
    }

    #[test]
    fn test_side_offset() {
        let mut rng = GenRng::new(42);
        assert_eq!(side_offset(1, &mut rng), 0);
        assert_eq!(side_offset(5, &mut rng), 2);
        let mut seen = [false; 2];
        for _ in 0..100 {
            let p = side_offset(4, &mut rng);
            assert!(p == 1 || p == 2);
            seen[p - 1] = true;
        }
        assert!(seen[0] && seen[1], "both alignments should occur");
    }

    #[test]
    fn test_stamp_odd_room_is_centered() {
        let mut grid = Grid::new(12, 12);
        let mut rng = GenRng::new(1);
        let room = stamp_room(&mut grid, Pos::new(5, 6), Footprint::new(3, 5), &mut rng);
        assert_eq!(room.origin, Pos::new(4, 4));
        assert_eq!(grid.count(Tile::Room), 15);
        assert!(room.cells().all(|p| grid[p] == Tile::Room));
        assert!(!room.overlapped);
    }

    #[test]
    fn test_stamp_reports_overlap() {
        let mut grid = Grid::new(12, 12);
        let mut rng = GenRng::new(1);
        stamp_room(&mut grid, Pos::new(5, 5), Footprint::new(3, 3), &mut rng);
        let second = stamp_room(&mut grid, Pos::new(6, 6), Footprint::new(3, 3), &mut rng);
        assert!(second.overlapped);
    }

    #[test]
    fn test_room_geometry() {
        let a = PlacedRoom {
            center: Pos::new(5, 5),
            origin: Pos::new(4, 4),
            height: 3,
            width: 3,
            overlapped: false,
        };
        let touching = PlacedRoom {
            origin: Pos::new(7, 4),
            ..a
        };
        let crossing = PlacedRoom {
            origin: Pos::new(6, 6),
            ..a
        };
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&crossing));
        assert!(crossing.intersects(&a));
        assert!(a.contains(Pos::new(6, 6)));
        assert!(!a.contains(Pos::new(7, 6)));
        assert_eq!(a.cells().count(), a.area());
    }

    #[test]
    fn test_elimination_scenario_30x30() {
        let mut grid = Grid::new(30, 30);
        let mut rng = GenRng::new(2024);
        let rooms = RoomPlacer::new(&mut grid, elimination(5, 2, 900))
            .run(&mut rng)
            .unwrap();

        assert!(!rooms.is_empty());
        for (i, a) in rooms.iter().enumerate() {
            assert!(!a.overlapped);
            for b in &rooms[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
        for pos in grid.positions_of(Tile::Room) {
            assert!((1..=28).contains(&pos.row) && (1..=28).contains(&pos.col));
        }
        let stamped: usize = rooms.iter().map(PlacedRoom::area).sum();
        assert_eq!(grid.count(Tile::Room), stamped);
    }

    #[test]
    fn test_field_invariants_hold_every_step() {
        let mut grid = Grid::new(24, 40);
        let mut rng = GenRng::new(11);
        let params = PlacementParams {
            room_size: 6,
            variance: 3,
            strategy: PlacementStrategy::Gaussian {
                width_percent: 50.0,
                amplitude: 30.0,
            },
            max_placements: 24 * 40,
        };
        let mut placer = RoomPlacer::new(&mut grid, params);
        assert!(placer.field().is_well_formed());
        while let Step::Placed(room) = placer.step(&mut rng).unwrap() {
            assert!(placer.field().is_well_formed());
            assert_eq!(placer.field().weight(room.center), 0.0);
        }
        assert!(placer.is_exhausted());
        assert_eq!(placer.step(&mut rng).unwrap(), Step::Exhausted);
    }

    #[test]
    fn test_elimination_clears_occupied_cells() {
        let mut grid = Grid::new(20, 20);
        let mut rng = GenRng::new(8);
        let mut placer = RoomPlacer::new(&mut grid, elimination(4, 1, 400));
        let Step::Placed(room) = placer.step(&mut rng).unwrap() else {
            panic!("fresh field cannot be exhausted");
        };
        for pos in room.cells() {
            assert_eq!(placer.field().weight(pos), 0.0);
        }
        assert_eq!(placer.placed().len(), 1);
        assert_eq!(placer.grid().count(Tile::Room), room.area());
    }

    #[test]
    fn test_too_small_grid_places_nothing() {
        let mut grid = Grid::new(4, 4);
        let mut rng = GenRng::new(8);
        let rooms = RoomPlacer::new(&mut grid, elimination(5, 0, 16))
            .run(&mut rng)
            .unwrap();
        assert!(rooms.is_empty());
        assert_eq!(grid.count(Tile::Room), 0);
    }

    #[test]
    fn test_placement_cap_is_reported() {
        let mut grid = Grid::new(40, 40);
        let mut rng = GenRng::new(8);
        let err = RoomPlacer::new(&mut grid, elimination(3, 0, 2))
            .run(&mut rng)
            .unwrap_err();
        assert_eq!(err, GenerationError::PlacementLimitExceeded { limit: 2 });
    }

    #[test]
    fn test_cap_reached_by_exhausting_run() {
        // one 1x1 room exhausts a 4x4 field, so a cap of 1 is enough
        let mut grid = Grid::new(4, 4);
        let mut rng = GenRng::new(8);
        let mut placer = RoomPlacer::new(&mut grid, elimination(1, 0, 1));
        assert!(matches!(placer.step(&mut rng), Ok(Step::Placed(_))));
        assert_eq!(placer.step(&mut rng), Ok(Step::Exhausted));

        let mut grid = Grid::new(4, 4);
        let rooms = RoomPlacer::new(&mut grid, elimination(1, 0, 1))
            .run(&mut rng)
            .unwrap();
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_same_seed_same_rooms() {
        let run = |seed| {
            let mut grid = Grid::new(30, 45);
            let mut rng = GenRng::new(seed);
            let rooms = RoomPlacer::new(&mut grid, elimination(5, 2, 30 * 45))
                .run(&mut rng)
                .unwrap();
            (grid, rooms)
        };
        assert_eq!(run(77), run(77));
    }
}
