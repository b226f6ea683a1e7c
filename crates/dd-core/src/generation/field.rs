//! Probability field for room center selection
//!
//! The field holds one non-negative weight per grid cell. Room centers are
//! drawn from it by weighted sampling over the interior sub-region where a
//! room of the requested footprint fits without touching the grid border.

use std::ops::Range;

use crate::map::Pos;
use crate::rng::GenRng;

/// Room size in tiles: `height` rows tall, `width` columns wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub height: usize,
    pub width: usize,
}

impl Footprint {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub const fn area(&self) -> usize {
        self.height * self.width
    }
}

/// Rectangular block of field cells, half-open on both axes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Region {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.rows.contains(&pos.row) && self.cols.contains(&pos.col)
    }

    /// Positions of the region in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let cols = self.cols.clone();
        self.rows
            .clone()
            .flat_map(move |row| cols.clone().map(move |col| Pos::new(row, col)))
    }
}

/// Outcome of one weighted draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// The eligible region carries no mass; no more rooms can be placed
    Exhausted,
    /// A center was drawn from a region of total mass `mass`
    Chosen { center: Pos, mass: f64 },
}

impl Sample {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Sample::Exhausted)
    }

    pub fn center(&self) -> Option<Pos> {
        match self {
            Sample::Exhausted => None,
            Sample::Chosen { center, .. } => Some(*center),
        }
    }
}

/// Per-cell placement weights, same shape as the grid
///
/// Every weight is non-negative and the outermost ring is always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityField {
    height: usize,
    width: usize,
    weights: Vec<f64>,
}

impl ProbabilityField {
    /// Create a field with 0 on the border and 1 everywhere else
    pub fn fresh(height: usize, width: usize) -> Self {
        let mut field = Self {
            height,
            width,
            weights: vec![0.0; height * width],
        };
        for row in 1..height.saturating_sub(1) {
            for col in 1..width.saturating_sub(1) {
                field.weights[row * width + col] = 1.0;
            }
        }
        field
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Weight at a position; 0 outside the field
    pub fn weight(&self, pos: Pos) -> f64 {
        if pos.row < self.height && pos.col < self.width {
            self.weights[pos.row * self.width + pos.col]
        } else {
            0.0
        }
    }

    /// Set a weight, clamped to be non-negative
    ///
    /// Border cells and out-of-field positions are left untouched.
    pub fn set_weight(&mut self, pos: Pos, weight: f64) {
        if self.is_interior(pos) {
            self.weights[pos.row * self.width + pos.col] = clamp_weight(weight);
        }
    }

    fn is_interior(&self, pos: Pos) -> bool {
        pos.row >= 1 && pos.col >= 1 && pos.row + 1 < self.height && pos.col + 1 < self.width
    }

    /// Check the field invariants: no negative or NaN weight, zero border
    pub fn is_well_formed(&self) -> bool {
        (0..self.height).all(|row| {
            (0..self.width).all(|col| {
                let pos = Pos::new(row, col);
                let w = self.weight(pos);
                w >= 0.0 && (self.is_interior(pos) || w == 0.0)
            })
        })
    }

    /// Region of centers where a room of `footprint` fits inside the border
    ///
    /// Rows `[h/2 + 1, H - h/2 - 1)` and columns `[w/2 + 1, W - w/2 - 1)`.
    pub fn eligible_region(&self, footprint: Footprint) -> Region {
        let half_h = footprint.height / 2;
        let half_w = footprint.width / 2;
        Region {
            rows: half_h + 1..self.height.saturating_sub(half_h + 1),
            cols: half_w + 1..self.width.saturating_sub(half_w + 1),
        }
    }

    /// Sum of the weights inside a region
    pub fn mass(&self, region: &Region) -> f64 {
        region.positions().map(|p| self.weight(p)).sum()
    }

    /// Draw a room center for `footprint`, weighted by the field
    ///
    /// Draws `r` uniformly from `[0, M)` and returns the first cell, in
    /// row-major order, whose interval `[running, running + weight)`
    /// contains it. Zero-weight cells are never chosen.
    pub fn sample(&self, footprint: Footprint, rng: &mut GenRng) -> Sample {
        let region = self.eligible_region(footprint);
        let mass = self.mass(&region);
        if !(mass > 0.0) {
            return Sample::Exhausted;
        }

        let r = rng.below(mass);
        let mut running = 0.0;
        let mut last_positive = None;
        for pos in region.positions() {
            let weight = self.weight(pos);
            if weight <= 0.0 {
                continue;
            }
            if r < running + weight {
                return Sample::Chosen { center: pos, mass };
            }
            running += weight;
            last_positive = Some(pos);
        }

        // r fell past the final interval through rounding
        match last_positive {
            Some(center) => Sample::Chosen { center, mass },
            None => Sample::Exhausted,
        }
    }

    /// Force every cell of a rectangle to 0
    pub fn clear_rect(&mut self, origin: Pos, footprint: Footprint) {
        let bottom = (origin.row + footprint.height).min(self.height);
        let right = (origin.col + footprint.width).min(self.width);
        for row in origin.row..bottom {
            for col in origin.col..right {
                self.weights[row * self.width + col] = 0.0;
            }
        }
    }

    /// Copy of the field with a no-build margin around every zero cell
    ///
    /// Each zero cell at `(r, c)` zeroes the cells `(r + i, c + k)` for
    /// `i` in `[-(h/2 + 1), h/2 + 1)` and `k` in `[-(w/2 + 1), w/2 + 1)`,
    /// so no center drawn from the copy puts a room of `footprint` on top
    /// of a zero cell of `self`.
    pub fn with_margin(&self, footprint: Footprint) -> ProbabilityField {
        let (height, width) = (self.height, self.width);
        let reach_h = footprint.height / 2 + 1;
        let reach_w = footprint.width / 2 + 1;

        // zeros[(r + 1) * (width + 1) + (c + 1)] counts zero cells in [0, r] x [0, c]
        let stride = width + 1;
        let mut zeros = vec![0usize; (height + 1) * stride];
        for row in 0..height {
            for col in 0..width {
                let is_zero = usize::from(self.weights[row * width + col] <= 0.0);
                zeros[(row + 1) * stride + col + 1] = is_zero
                    + zeros[row * stride + col + 1]
                    + zeros[(row + 1) * stride + col]
                    - zeros[row * stride + col];
            }
        }

        let mut out = self.clone();
        for row in 0..height {
            // zeros in rows [row + 1 - reach_h, row + reach_h] reach this row
            let top = (row + 1).saturating_sub(reach_h);
            let bottom = (row + reach_h).min(height - 1);
            for col in 0..width {
                let left = (col + 1).saturating_sub(reach_w);
                let right = (col + reach_w).min(width - 1);
                let count = zeros[(bottom + 1) * stride + right + 1]
                    + zeros[top * stride + left]
                    - zeros[top * stride + right + 1]
                    - zeros[(bottom + 1) * stride + left];
                if count > 0 {
                    out.weights[row * width + col] = 0.0;
                }
            }
        }
        out
    }

    /// Subtract a 2D Gaussian bump centered on a placed room
    ///
    /// `amplitude * exp(-((h - i)^2 / (2 sx^2) + (w - k)^2 / (2 sy^2)))`
    /// with `sx = height * pct / 100` and `sy = width * pct / 100`;
    /// results are clamped at 0.
    pub fn subtract_gaussian(
        &mut self,
        center: Pos,
        footprint: Footprint,
        width_percent: f64,
        amplitude: f64,
    ) {
        let sigma_x = footprint.height as f64 * width_percent / 100.0;
        let sigma_y = footprint.width as f64 * width_percent / 100.0;
        let denom_x = 2.0 * sigma_x * sigma_x;
        let denom_y = 2.0 * sigma_y * sigma_y;

        for row in 0..self.height {
            let dr = center.row as f64 - row as f64;
            for col in 0..self.width {
                let dc = center.col as f64 - col as f64;
                let bump = amplitude * (-(dr * dr / denom_x + dc * dc / denom_y)).exp();
                let w = &mut self.weights[row * self.width + col];
                *w = clamp_weight(*w - bump);
            }
        }
    }
}

/// Clamp to `[0, inf)`, mapping NaN to 0
fn clamp_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_field_border_is_zero() {
        let field = ProbabilityField::fresh(6, 8);
        assert!(field.is_well_formed());
        assert_eq!(field.weight(Pos::new(0, 3)), 0.0);
        assert_eq!(field.weight(Pos::new(5, 3)), 0.0);
        assert_eq!(field.weight(Pos::new(3, 0)), 0.0);
        assert_eq!(field.weight(Pos::new(3, 7)), 0.0);
        assert_eq!(field.weight(Pos::new(1, 1)), 1.0);
        // interior is 4 x 6
        let all = Region {
            rows: 0..6,
            cols: 0..8,
        };
        assert_eq!(field.mass(&all), 24.0);
    }

    #[test]
    fn test_eligible_region_bounds() {
        let field = ProbabilityField::fresh(30, 20);

        // odd and even footprints share the floor: 5/2 == 2, 4/2 == 2
        let region = field.eligible_region(Footprint::new(5, 4));
        assert_eq!(region.rows, 3..27);
        assert_eq!(region.cols, 3..17);

        let region = field.eligible_region(Footprint::new(1, 2));
        assert_eq!(region.rows, 1..29);
        assert_eq!(region.cols, 2..18);
    }

    #[test]
    fn test_eligible_region_empty_when_too_large() {
        let field = ProbabilityField::fresh(6, 6);
        assert!(field.eligible_region(Footprint::new(5, 3)).is_empty());
        assert!(field.eligible_region(Footprint::new(40, 40)).is_empty());
    }

    #[test]
    fn test_zero_mass_is_exhausted() {
        let mut field = ProbabilityField::fresh(10, 10);
        field.clear_rect(Pos::new(0, 0), Footprint::new(10, 10));
        let mut rng = GenRng::new(1);
        let sample = field.sample(Footprint::new(3, 3), &mut rng);
        assert_eq!(sample, Sample::Exhausted);
        assert_eq!(sample.center(), None);
    }

    #[test]
    fn test_sample_picks_only_positive_cell() {
        let mut field = ProbabilityField::fresh(12, 12);
        field.clear_rect(Pos::new(0, 0), Footprint::new(12, 12));
        field.set_weight(Pos::new(6, 4), 0.25);

        let mut rng = GenRng::new(99);
        for _ in 0..50 {
            match field.sample(Footprint::new(3, 3), &mut rng) {
                Sample::Chosen { center, mass } => {
                    assert_eq!(center, Pos::new(6, 4));
                    assert_eq!(mass, 0.25);
                }
                Sample::Exhausted => panic!("field has mass"),
            }
        }
    }

    #[test]
    fn test_sample_ignores_mass_outside_region() {
        let mut field = ProbabilityField::fresh(10, 10);
        field.clear_rect(Pos::new(0, 0), Footprint::new(10, 10));
        // (1, 1) is interior but outside the region for a 4x4 footprint
        field.set_weight(Pos::new(1, 1), 1.0);
        let mut rng = GenRng::new(3);
        assert!(field.sample(Footprint::new(4, 4), &mut rng).is_exhausted());
        assert!(!field.sample(Footprint::new(1, 1), &mut rng).is_exhausted());
    }

    #[test]
    fn test_sample_stays_in_region() {
        let field = ProbabilityField::fresh(20, 15);
        let footprint = Footprint::new(6, 3);
        let region = field.eligible_region(footprint);
        let mut rng = GenRng::new(5);
        for _ in 0..500 {
            let center = field.sample(footprint, &mut rng).center().unwrap();
            assert!(region.contains(center), "{center:?} outside {region:?}");
        }
    }

    #[test]
    fn test_set_weight_clamps_and_protects_border() {
        let mut field = ProbabilityField::fresh(5, 5);
        field.set_weight(Pos::new(2, 2), -3.0);
        assert_eq!(field.weight(Pos::new(2, 2)), 0.0);
        field.set_weight(Pos::new(0, 2), 4.0);
        assert_eq!(field.weight(Pos::new(0, 2)), 0.0);
        field.set_weight(Pos::new(2, 2), f64::NAN);
        assert_eq!(field.weight(Pos::new(2, 2)), 0.0);
        assert!(field.is_well_formed());
    }

    #[test]
    fn test_margin_zeroes_neighborhood() {
        let mut field = ProbabilityField::fresh(21, 21);
        field.set_weight(Pos::new(10, 10), 0.0);
        // footprint 3x4: rows reach [-2, 2), cols reach [-3, 3)
        let view = field.with_margin(Footprint::new(3, 4));

        for row in 8..=11 {
            for col in 7..=12 {
                assert_eq!(view.weight(Pos::new(row, col)), 0.0, "({row}, {col})");
            }
        }
        assert_eq!(view.weight(Pos::new(12, 10)), 1.0);
        assert_eq!(view.weight(Pos::new(7, 10)), 1.0);
        assert_eq!(view.weight(Pos::new(10, 13)), 1.0);
        assert_eq!(view.weight(Pos::new(10, 6)), 1.0);
        // the source field is untouched
        assert_eq!(field.weight(Pos::new(9, 9)), 1.0);
    }

    #[test]
    fn test_margin_grows_from_border() {
        let field = ProbabilityField::fresh(15, 15);
        let view = field.with_margin(Footprint::new(2, 2));
        // border zeros at row 0 reach rows 0..=1 below them
        assert_eq!(view.weight(Pos::new(1, 7)), 0.0);
        assert_eq!(view.weight(Pos::new(2, 7)), 1.0);
        // border zeros at row 14 reach rows 12..=14 above them
        assert_eq!(view.weight(Pos::new(12, 7)), 0.0);
        assert_eq!(view.weight(Pos::new(11, 7)), 1.0);
        assert!(view.is_well_formed());
    }

    #[test]
    fn test_gaussian_clamps_and_keeps_border() {
        let mut field = ProbabilityField::fresh(25, 25);
        field.subtract_gaussian(Pos::new(12, 12), Footprint::new(7, 7), 50.0, 30.0);
        assert!(field.is_well_formed());
        assert_eq!(field.weight(Pos::new(12, 12)), 0.0);

        // the bump decays with distance
        let near = field.weight(Pos::new(12, 17));
        let far = field.weight(Pos::new(12, 22));
        assert!(near < far, "{near} >= {far}");
        assert!(far <= 1.0);
    }

    #[test]
    fn test_gaussian_small_amplitude_is_partial() {
        let mut field = ProbabilityField::fresh(11, 11);
        field.subtract_gaussian(Pos::new(5, 5), Footprint::new(3, 3), 100.0, 0.5);
        assert!((field.weight(Pos::new(5, 5)) - 0.5).abs() < 1e-12);
    }
}
