//! Tile grid and coordinates

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::Tile;

/// A grid coordinate
///
/// Ordering is row-major, so ordered collections of positions iterate in
/// scan order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The cell above, if any
    pub fn up(self) -> Option<Pos> {
        self.row.checked_sub(1).map(|row| Pos::new(row, self.col))
    }

    /// The cell below (unbounded)
    pub fn down(self) -> Pos {
        Pos::new(self.row + 1, self.col)
    }

    /// The cell to the left, if any
    pub fn left(self) -> Option<Pos> {
        self.col.checked_sub(1).map(|col| Pos::new(self.row, col))
    }

    /// The cell to the right (unbounded)
    pub fn right(self) -> Pos {
        Pos::new(self.row, self.col + 1)
    }

    /// The four orthogonal neighbors that do not underflow
    pub fn neighbors4(self) -> impl Iterator<Item = Pos> {
        [self.up(), Some(self.down()), self.left(), Some(self.right())]
            .into_iter()
            .flatten()
    }

    /// Check whether two positions share an edge
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos::new(row, col)
    }
}

/// Fixed-size two-dimensional tile buffer
///
/// Cells are stored row-major. Every cell starts as [`Tile::Unassigned`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    height: usize,
    width: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid of unassigned tiles
    pub fn new(height: usize, width: usize) -> Self {
        Self::filled(height, width, Tile::Unassigned)
    }

    /// Create a grid with every cell set to `tile`
    pub fn filled(height: usize, width: usize, tile: Tile) -> Self {
        Self {
            height,
            width,
            tiles: vec![tile; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Check whether a position lies inside the grid
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// Check whether a position is on the outermost ring of the grid
    pub fn is_border(&self, pos: Pos) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row + 1 == self.height || pos.col + 1 == self.width
    }

    /// Get the tile at a position, or `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.tiles[self.offset(pos)])
    }

    /// Set the tile at a position; returns the previous tile
    ///
    /// Out-of-bounds writes are ignored and return `None`.
    pub fn set(&mut self, pos: Pos, tile: Tile) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let i = self.offset(pos);
        Some(std::mem::replace(&mut self.tiles[i], tile))
    }

    /// In-bounds orthogonal neighbors of a position
    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbors4().filter(move |p| self.in_bounds(*p))
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Pos::new(row, col)))
    }

    /// Rows of tiles, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        // chunks() rejects a zero chunk size
        self.tiles.chunks(self.width.max(1))
    }

    /// Count cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Positions holding `tile`, row-major
    pub fn positions_of(&self, tile: Tile) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(move |p| self[*p] == tile)
    }

    /// Set every in-bounds cell of a rectangle to `tile`
    pub fn fill_rect(&mut self, origin: Pos, height: usize, width: usize, tile: Tile) {
        let bottom = (origin.row + height).min(self.height);
        let right = (origin.col + width).min(self.width);
        for row in origin.row..bottom {
            for col in origin.col..right {
                let i = self.offset(Pos::new(row, col));
                self.tiles[i] = tile;
            }
        }
    }

    fn offset(&self, pos: Pos) -> usize {
        pos.row * self.width + pos.col
    }
}

impl Index<Pos> for Grid {
    type Output = Tile;

    fn index(&self, pos: Pos) -> &Tile {
        assert!(self.in_bounds(pos), "{pos:?} outside {}x{} grid", self.height, self.width);
        &self.tiles[self.offset(pos)]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Tile {
        assert!(self.in_bounds(pos), "{pos:?} outside {}x{} grid", self.height, self.width);
        let i = self.offset(pos);
        &mut self.tiles[i]
    }
}

/// One symbol per tile, one line per row
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        for row in self.rows() {
            for tile in row {
                write!(f, "{}", tile.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
