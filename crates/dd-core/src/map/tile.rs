//! Tile vocabulary

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Semantic value of one grid cell
///
/// Generation only produces `Unassigned`, `Wall`, `Room` and `DoorOpen`;
/// the rest are reserved for editors and importers.
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
#[repr(u8)]
pub enum Tile {
    #[default]
    Unassigned = 0,
    Wall = 1,
    Room = 2,
    Hallway = 3,
    StairUp = 4,
    StairDown = 5,
    StairPartOne = 6, // first half of a two-tile stair
    StairPartTwo = 7,
    DoorClosed = 8,
    DoorOpen = 9,
    DoorSecret = 10,
    Unknown = 11,
}

impl Tile {
    /// Get the display character for this tile
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Unassigned => ' ',
            Tile::Wall => '#',
            Tile::Room => '.',
            Tile::Hallway => ',',
            Tile::StairUp => '<',
            Tile::StairDown => '>',
            Tile::StairPartOne => '[',
            Tile::StairPartTwo => ']',
            Tile::DoorClosed => '+',
            Tile::DoorOpen => '\'',
            Tile::DoorSecret => 'S',
            Tile::Unknown => '?',
        }
    }
}
