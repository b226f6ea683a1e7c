//! dd-core: Room and door generation for DungeonDigger floor plans
//!
//! Places rectangular rooms on a grid by sampling a probability field,
//! groups the room tiles into connected rooms and opens doors along their
//! walls. All randomness flows through one seeded [`GenRng`], so a config
//! and a seed always reproduce the same grid.
//!
//! This crate has no I/O; the `dungeon-digger` binary handles that.

pub mod config;
pub mod error;
pub mod generation;
pub mod map;

mod rng;

pub use config::{GeneratorConfig, GeneratorKind, ValidatedConfig};
pub use error::{ConfigError, GenerationError, Result};
pub use generation::{Generation, Generator, generate};
pub use map::{Grid, Pos, Tile};
pub use rng::GenRng;
