//! Generator configuration and presets
//!
//! A [`GeneratorConfig`] is what callers hand in (from code, flags or a
//! JSON file). [`GeneratorConfig::validate`] turns it into checked
//! parameters before anything is allocated.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ConfigError;
use crate::generation::{DoorPolicy, PlacementParams, PlacementStrategy};

/// Built-in generator presets
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum GeneratorKind {
    /// Gaussian-decay placement
    #[default]
    Gaussian,
    /// Margin-exclusion placement
    Elimination,
}

impl GeneratorKind {
    /// Default parameters of the preset
    pub fn default_config(self) -> GeneratorConfig {
        match self {
            GeneratorKind::Gaussian => GeneratorConfig {
                height: 50,
                width: 50,
                room_size: 7,
                room_size_variance: 3,
                strategy: PlacementStrategy::Gaussian {
                    width_percent: 50.0,
                    amplitude: 30.0,
                },
                ..GeneratorConfig::base()
            },
            GeneratorKind::Elimination => GeneratorConfig {
                height: 50,
                width: 50,
                room_size: 5,
                room_size_variance: 2,
                strategy: PlacementStrategy::Elimination,
                ..GeneratorConfig::base()
            },
        }
    }
}

/// Largest grid, in cells, a config may ask for
pub const MAX_GRID_CELLS: usize = 1 << 24;

fn default_true() -> bool {
    true
}

/// Unchecked generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub height: i64,
    pub width: i64,
    pub room_size: i64,
    pub room_size_variance: i64,
    pub strategy: PlacementStrategy,
    #[serde(default = "default_true")]
    pub place_doors: bool,
    #[serde(default)]
    pub skip_last_room: bool,
    /// Defaults to one room per grid cell
    #[serde(default)]
    pub max_placements: Option<usize>,
}

impl GeneratorConfig {
    fn base() -> Self {
        Self {
            height: 0,
            width: 0,
            room_size: 0,
            room_size_variance: 0,
            strategy: PlacementStrategy::Elimination,
            place_doors: true,
            skip_last_room: false,
            max_placements: None,
        }
    }

    /// The preset whose placement strategy this config uses
    pub fn kind(&self) -> GeneratorKind {
        match self.strategy {
            PlacementStrategy::Elimination => GeneratorKind::Elimination,
            PlacementStrategy::Gaussian { .. } => GeneratorKind::Gaussian,
        }
    }

    /// Check every parameter and convert to engine parameters
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        if self.height <= 0 || self.width <= 0 {
            return Err(ConfigError::InvalidDimensions {
                height: self.height,
                width: self.width,
            });
        }
        if self.room_size <= 0 {
            return Err(ConfigError::InvalidRoomSize {
                room_size: self.room_size,
            });
        }
        if self.room_size_variance < 0 {
            return Err(ConfigError::NegativeVariance {
                variance: self.room_size_variance,
            });
        }

        // sides are drawn from room_size + [-variance, variance)
        let smallest = self.room_size - self.room_size_variance;
        if smallest <= 0 {
            return Err(ConfigError::DegenerateRooms {
                room_size: self.room_size,
                variance: self.room_size_variance,
                smallest,
            });
        }

        let height = to_usize("height", self.height)?;
        let width = to_usize("width", self.width)?;
        match height.checked_mul(width) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(ConfigError::GridTooLarge {
                    height,
                    width,
                    limit: MAX_GRID_CELLS,
                });
            }
        }

        let smallest = to_usize("smallest room size", smallest)?;
        // centers live in [s/2 + 1, n - s/2 - 1); the margin around the far
        // border also rules out the last of those rows and columns
        let slack = match self.strategy {
            PlacementStrategy::Elimination => 3,
            PlacementStrategy::Gaussian { .. } => 2,
        };
        let fits = |n: usize| 2 * (smallest / 2) + slack < n;
        if !fits(height) || !fits(width) {
            return Err(ConfigError::RoomTooLarge {
                smallest,
                height,
                width,
            });
        }

        if let PlacementStrategy::Gaussian {
            width_percent,
            amplitude,
        } = self.strategy
        {
            if !(width_percent > 0.0 && width_percent.is_finite()) {
                return Err(ConfigError::InvalidGaussianWidth(width_percent));
            }
            if !(amplitude > 0.0 && amplitude.is_finite()) {
                return Err(ConfigError::InvalidAmplitude(amplitude));
            }
        }

        let max_placements = match self.max_placements {
            Some(0) => return Err(ConfigError::ZeroPlacementLimit),
            Some(limit) => limit,
            None => height.saturating_mul(width),
        };

        Ok(ValidatedConfig {
            height,
            width,
            placement: PlacementParams {
                room_size: to_usize("room size", self.room_size)?,
                variance: to_usize("room size variance", self.room_size_variance)?,
                strategy: self.strategy,
                max_placements,
            },
            doors: self.place_doors.then_some(DoorPolicy {
                skip_last_room: self.skip_last_room,
            }),
        })
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorKind::default().default_config()
    }
}

fn to_usize(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::OutOfRange { field, value })
}

/// Parameters that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedConfig {
    pub height: usize,
    pub width: usize,
    pub placement: PlacementParams,
    /// `None` when door placement is disabled
    pub doors: Option<DoorPolicy>,
}
