//! Floor plan generation
//!
//! A run goes through three stages on one grid, all driven by a single
//! [`GenRng`]:
//!
//! 1. room placement: sample room centers from a probability field until
//!    the field is exhausted ([`placement`])
//! 2. labeling: split the room tiles into connected rooms ([`labeling`])
//! 3. doors: open doors along each room's boundary ([`doors`])

mod doors;
mod field;
mod labeling;
mod placement;

use std::collections::BTreeMap;

use log::debug;

pub use doors::{
    Candidates, DoorPolicy, door_candidates, door_target, open_doors, place_doors, remove_corners,
};
pub use field::{Footprint, ProbabilityField, Region, Sample};
pub use labeling::{LabeledRoom, RoomLabels, label_rooms};
pub use placement::{PlacedRoom, PlacementParams, PlacementStrategy, RoomPlacer, Step, stamp_room};

use crate::config::{GeneratorConfig, ValidatedConfig};
use crate::error::Result;
use crate::map::{Grid, Pos};
use crate::rng::GenRng;

/// Everything one generation run produced
#[derive(Debug, Clone)]
pub struct Generation {
    pub grid: Grid,
    /// Rooms in placement order
    pub rooms: Vec<PlacedRoom>,
    /// Connected rooms as found after placement, before doors were opened
    pub labels: RoomLabels,
    /// Opened doors per room label; empty when doors are disabled
    pub doors: BTreeMap<usize, Vec<Pos>>,
    pub seed: u64,
}

impl Generation {
    /// Total number of opened doors
    pub fn door_count(&self) -> usize {
        self.doors.values().map(Vec::len).sum()
    }

    /// Whether any two placed rooms share a cell
    pub fn has_overlap(&self) -> bool {
        self.rooms.iter().any(|room| room.overlapped)
    }
}

/// Runs the placement, labeling and door stages for one validated config
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    config: ValidatedConfig,
}

impl Generator {
    /// Validate `config`; nothing is allocated if it is rejected
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Produce one floor plan
    pub fn generate(&self, rng: &mut GenRng) -> Result<Generation> {
        let ValidatedConfig {
            height,
            width,
            placement,
            doors: door_policy,
        } = self.config;

        debug!(
            "generating {height}x{width} plan with {:?} (seed {})",
            placement.strategy,
            rng.seed()
        );

        let mut grid = Grid::new(height, width);
        let rooms = RoomPlacer::new(&mut grid, placement).run(rng)?;
        let labels = label_rooms(&grid)?;
        let doors = match door_policy {
            Some(policy) => place_doors(&mut grid, &labels, policy, rng),
            None => BTreeMap::new(),
        };

        Ok(Generation {
            grid,
            rooms,
            labels,
            doors,
            seed: rng.seed(),
        })
    }
}

/// Generate a grid from `config` with a fixed seed
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<Grid> {
    let mut rng = GenRng::new(seed);
    Ok(Generator::new(config)?.generate(&mut rng)?.grid)
}
