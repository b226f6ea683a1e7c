//! Floor plan data model
//!
//! Contains the tile vocabulary and the grid that holds it.

mod grid;
mod tile;

pub use grid::{Grid, Pos};
pub use tile::Tile;
