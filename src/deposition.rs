//! Dirtball deposition: radial impacts that pile elevation onto the grid.

use std::ops::Range;

use rand::Rng;
use tracing::trace;

use crate::tilemap::Tilemap;

/// A single dirtball landing on the grid.
///
/// Consumed immediately by [`drop_dirtball`]; never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Center column (may be fractional)
    pub x: f64,
    /// Center row (may be fractional)
    pub y: f64,
    /// Cells at distance <= radius are affected
    pub radius: f64,
    /// Elevation added at the center, falling by one per whole cell of distance
    pub power: i32,
}

impl Impact {
    pub fn new(x: f64, y: f64, radius: f64, power: i32) -> Self {
        Self { x, y, radius, power }
    }

    /// Draw a center uniformly over a `width` x `height` grid.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: usize,
        height: usize,
        radius: f64,
        power: i32,
    ) -> Self {
        let x = rng.gen::<f64>() * width as f64;
        let y = rng.gen::<f64>() * height as f64;
        Self { x, y, radius, power }
    }

    /// Elevation this impact adds to cell `(col, row)`. Zero outside the radius
    /// and wherever `power - floor(distance)` is not strictly positive.
    pub fn contribution(&self, col: usize, row: usize) -> i32 {
        let dx = col as f64 - self.x;
        let dy = row as f64 - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > self.radius {
            return 0;
        }
        let falloff = distance.floor().min(i32::MAX as f64) as i32;
        self.power.saturating_sub(falloff).max(0)
    }

    /// Columns and rows of the impact's bounding box clipped to the grid.
    /// `None` when the impact misses the grid entirely.
    fn footprint(&self, width: usize, height: usize) -> Option<(Range<usize>, Range<usize>)> {
        let cols = clip_span(self.x, self.radius, width)?;
        let rows = clip_span(self.y, self.radius, height)?;
        Some((cols, rows))
    }
}

/// Clip `[center - radius, center + radius]` to the index range `0..len`.
fn clip_span(center: f64, radius: f64, len: usize) -> Option<Range<usize>> {
    if !center.is_finite() || radius.is_nan() || radius < 0.0 || len == 0 {
        return None;
    }
    let lo = (center - radius).ceil().max(0.0);
    let hi = (center + radius).floor().min(len as f64 - 1.0);
    if lo > hi {
        return None;
    }
    Some(lo as usize..hi as usize + 1)
}

/// Apply one impact to the grid in place. Contributions are never negative,
/// so elevations only grow; cells off the grid are skipped.
pub fn drop_dirtball(grid: &mut Tilemap<i32>, impact: &Impact) {
    let Some((cols, rows)) = impact.footprint(grid.width, grid.height) else {
        trace!(x = impact.x, y = impact.y, "impact missed the grid");
        return;
    };

    for row in rows {
        for col in cols.clone() {
            let amount = impact.contribution(col, row);
            if amount > 0 {
                let cell = grid.get_mut(col, row);
                *cell = cell.saturating_add(amount);
            }
        }
    }
}

/// Apply a sequence of impacts. Order does not affect the result.
pub fn deposit_all<I>(grid: &mut Tilemap<i32>, impacts: I) -> usize
where
    I: IntoIterator<Item = Impact>,
{
    let mut count = 0;
    for impact in impacts {
        drop_dirtball(grid, &impact);
        count += 1;
    }
    count
}
