//! Error types for configuration and generation

use thiserror::Error;

use crate::map::Pos;

/// Rejected generator parameters
///
/// Raised by validation, before any grid or field is allocated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {height}x{width}")]
    InvalidDimensions { height: i64, width: i64 },

    #[error("room size must be positive, got {room_size}")]
    InvalidRoomSize { room_size: i64 },

    #[error("room size variance must not be negative, got {variance}")]
    NegativeVariance { variance: i64 },

    #[error("room size {room_size} with variance {variance} can produce rooms of size {smallest}")]
    DegenerateRooms {
        room_size: i64,
        variance: i64,
        smallest: i64,
    },

    #[error("smallest room ({smallest} tiles) does not fit inside a {height}x{width} grid")]
    RoomTooLarge {
        smallest: usize,
        height: usize,
        width: usize,
    },

    #[error("{height}x{width} grid exceeds the {limit} cell limit")]
    GridTooLarge {
        height: usize,
        width: usize,
        limit: usize,
    },

    #[error("{field} {value} is out of range for this platform")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("gaussian width must be a positive percentage, got {0}")]
    InvalidGaussianWidth(f64),

    #[error("gaussian amplitude must be positive, got {0}")]
    InvalidAmplitude(f64),

    #[error("placement limit must be at least 1")]
    ZeroPlacementLimit,
}

/// Failures during a generation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("room placement did not exhaust the probability field after {limit} rooms")]
    PlacementLimitExceeded { limit: usize },

    #[error("cell {pos} claimed by rooms {first} and {second}")]
    RoomLabelConflict {
        pos: Pos,
        first: usize,
        second: usize,
    },
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
