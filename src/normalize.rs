//! Rescale accumulated elevation into the 0-255 range.

use serde::Serialize;
use tracing::warn;

use crate::error::{Result, TerraformError};
use crate::tilemap::Tilemap;

/// Value the highest cell maps to after normalization.
pub const NORMALIZED_MAX: i32 = 255;

/// What normalization did to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Normalization {
    /// Every cell was scaled by `255 / max`.
    Scaled { max: i32 },
    /// The grid held no elevation at all and was left as is.
    AllZero,
}

/// Largest cell value. Full scan; fails only on an empty grid.
pub fn find_max(map: &Tilemap<i32>) -> Result<i32> {
    map.values().copied().max().ok_or(TerraformError::EmptyGrid)
}

/// Rescale every cell to `floor(cell / max * 255)`.
///
/// `max` must be the grid's positive maximum; zero is rejected with
/// [`TerraformError::DivideByZero`] and the grid is left untouched.
pub fn normalize_map(map: &mut Tilemap<i32>, max: i32) -> Result<()> {
    if max <= 0 {
        return Err(TerraformError::DivideByZero);
    }
    let max = f64::from(max);
    for (_, _, cell) in map.iter_mut() {
        *cell = ((f64::from(*cell) / max) * f64::from(NORMALIZED_MAX)).floor() as i32;
    }
    Ok(())
}

/// Normalize in place, treating an all-zero grid as already normalized.
pub fn normalize(map: &mut Tilemap<i32>) -> Result<Normalization> {
    let max = find_max(map)?;
    if max == 0 {
        warn!("grid has no elevation; leaving it all zero");
        return Ok(Normalization::AllZero);
    }
    normalize_map(map, max)?;
    Ok(Normalization::Scaled { max })
}
