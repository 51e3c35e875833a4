//! Terraformer parameters: raw user input and its validated form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerraformError};

pub const MIN_WATERLINE: i64 = 40;
pub const MAX_WATERLINE: i64 = 200;
pub const MIN_RADIUS: i64 = 2;
/// Upper bound on `width * height`, so three i32 grids stay well under a few GiB.
pub const MAX_CELLS: u64 = 1 << 26;

/// Parameters as supplied by the command line, a config file or prompts.
///
/// Fields are signed so that nonsense input survives parsing and is
/// rejected by [`TerraformParams::validate`] with a precise error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformParams {
    /// Grid width in cells
    pub width: i64,
    /// Grid height in cells
    pub height: i64,
    /// Normalized elevation separating water from land (40-200)
    pub waterline: i64,
    /// Dirtball radius in cells (minimum 2)
    pub radius: i64,
    /// Elevation added at a dirtball's center (minimum = radius)
    pub power: i64,
    /// Number of dirtballs to drop
    pub dirtballs: i64,
    /// Random seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for TerraformParams {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            waterline: 100,
            radius: 6,
            power: 8,
            dirtballs: 200,
            seed: None,
        }
    }
}

impl TerraformParams {
    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Check every parameter once, before anything is allocated.
    pub fn validate(&self) -> Result<ValidParams> {
        if self.width <= 0 {
            return Err(TerraformError::InvalidDimension { axis: "width", value: self.width });
        }
        if self.height <= 0 {
            return Err(TerraformError::InvalidDimension { axis: "height", value: self.height });
        }
        let cells = (self.width as u64).checked_mul(self.height as u64);
        if cells.map_or(true, |c| c > MAX_CELLS) {
            return Err(TerraformError::GridTooLarge {
                width: self.width,
                height: self.height,
                max_cells: MAX_CELLS,
            });
        }
        if !(MIN_WATERLINE..=MAX_WATERLINE).contains(&self.waterline) {
            return Err(TerraformError::InvalidWaterline(self.waterline));
        }
        let radius = i32::try_from(self.radius)
            .ok()
            .filter(|&r| i64::from(r) >= MIN_RADIUS)
            .ok_or(TerraformError::InvalidRadius(self.radius))?;
        let power = i32::try_from(self.power)
            .ok()
            .filter(|&p| p >= radius)
            .ok_or(TerraformError::InvalidPower { power: self.power, radius: self.radius })?;
        let dirtballs = usize::try_from(self.dirtballs)
            .map_err(|_| TerraformError::InvalidDirtballCount(self.dirtballs))?;
        let width = usize::try_from(self.width)
            .map_err(|_| TerraformError::InvalidDimension { axis: "width", value: self.width })?;
        let height = usize::try_from(self.height)
            .map_err(|_| TerraformError::InvalidDimension { axis: "height", value: self.height })?;

        Ok(ValidParams {
            width,
            height,
            waterline: self.waterline as i32,
            radius,
            power,
            dirtballs,
            seed: self.seed,
        })
    }
}

/// Individually supplied parameters, e.g. from command-line flags.
/// `None` fields are taken from a base set of parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub waterline: Option<i64>,
    pub radius: Option<i64>,
    pub power: Option<i64>,
    pub dirtballs: Option<i64>,
    pub seed: Option<u64>,
}

impl ParamOverrides {
    pub fn apply(&self, base: TerraformParams) -> TerraformParams {
        TerraformParams {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            waterline: self.waterline.unwrap_or(base.waterline),
            radius: self.radius.unwrap_or(base.radius),
            power: self.power.unwrap_or(base.power),
            dirtballs: self.dirtballs.unwrap_or(base.dirtballs),
            seed: self.seed.or(base.seed),
        }
    }

    /// True when every grid parameter is present (the seed stays optional).
    pub fn is_complete(&self) -> bool {
        self.width.is_some()
            && self.height.is_some()
            && self.waterline.is_some()
            && self.radius.is_some()
            && self.power.is_some()
            && self.dirtballs.is_some()
    }
}

/// Parameters that passed validation. The pipeline only accepts this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValidParams {
    pub width: usize,
    pub height: usize,
    pub waterline: i32,
    pub radius: i32,
    pub power: i32,
    pub dirtballs: usize,
    pub seed: Option<u64>,
}

impl ValidParams {
    /// Same parameters with the seed pinned, as recorded for a finished run.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed: Some(seed), ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TerraformParams {
        TerraformParams {
            width: 5,
            height: 5,
            waterline: 100,
            radius: 2,
            power: 3,
            dirtballs: 1,
            seed: Some(7),
        }
    }

    #[test]
    fn test_valid_params_convert() {
        let valid = params().validate().unwrap();
        assert_eq!(valid.width, 5);
        assert_eq!(valid.height, 5);
        assert_eq!(valid.waterline, 100);
        assert_eq!(valid.radius, 2);
        assert_eq!(valid.power, 3);
        assert_eq!(valid.dirtballs, 1);
        assert_eq!(valid.seed, Some(7));
    }

    #[test]
    fn test_dimensions_must_be_positive() {
        let p = TerraformParams { width: 0, ..params() };
        assert!(matches!(
            p.validate(),
            Err(TerraformError::InvalidDimension { axis: "width", value: 0 })
        ));

        let p = TerraformParams { height: -3, ..params() };
        assert!(matches!(
            p.validate(),
            Err(TerraformError::InvalidDimension { axis: "height", value: -3 })
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected_before_allocation() {
        // the cell count overflows a 64-bit usize
        let p = TerraformParams { width: 1 << 33, height: 1 << 31, ..params() };
        assert!(matches!(
            p.validate(),
            Err(TerraformError::GridTooLarge { width, height, .. })
                if width == 1 << 33 && height == 1 << 31
        ));

        // fits in usize but exceeds the cell cap
        let p = TerraformParams { width: 1 << 14, height: 1 << 13, ..params() };
        let err = p.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, TerraformError::GridTooLarge { .. }));

        let p = TerraformParams { width: 1 << 13, height: 1 << 13, ..params() };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_waterline_range_is_inclusive() {
        for ok in [40, 120, 200] {
            assert!(TerraformParams { waterline: ok, ..params() }.validate().is_ok());
        }
        for bad in [39, 201, -100] {
            assert!(matches!(
                TerraformParams { waterline: bad, ..params() }.validate(),
                Err(TerraformError::InvalidWaterline(w)) if w == bad
            ));
        }
    }

    #[test]
    fn test_radius_and_power_minimums() {
        let p = TerraformParams { radius: 1, power: 5, ..params() };
        assert!(matches!(p.validate(), Err(TerraformError::InvalidRadius(1))));

        let p = TerraformParams { radius: 4, power: 3, ..params() };
        assert!(matches!(
            p.validate(),
            Err(TerraformError::InvalidPower { power: 3, radius: 4 })
        ));

        // power == radius is the minimum allowed
        assert!(TerraformParams { radius: 4, power: 4, ..params() }.validate().is_ok());
    }

    #[test]
    fn test_dirtball_count() {
        assert!(TerraformParams { dirtballs: 0, ..params() }.validate().is_ok());
        assert!(matches!(
            TerraformParams { dirtballs: -1, ..params() }.validate(),
            Err(TerraformError::InvalidDirtballCount(-1))
        ));
    }

    #[test]
    fn test_first_failure_wins() {
        let p = TerraformParams { width: 0, waterline: 10, ..params() };
        let err = p.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, TerraformError::InvalidDimension { .. }));
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let p = TerraformParams::from_json_str(r#"{ "width": 10, "seed": 99 }"#).unwrap();
        assert_eq!(p.width, 10);
        assert_eq!(p.seed, Some(99));
        assert_eq!(p.height, TerraformParams::default().height);
        assert_eq!(p.waterline, 100);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, serde_json::to_string(&params()).unwrap()).unwrap();

        let loaded = TerraformParams::from_json_file(&path).unwrap();
        assert_eq!(loaded, params());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = ParamOverrides {
            width: Some(9),
            seed: Some(1),
            ..Default::default()
        };
        assert!(!overrides.is_complete());

        let merged = overrides.apply(params());
        assert_eq!(merged.width, 9);
        assert_eq!(merged.height, 5);
        assert_eq!(merged.seed, Some(1));

        let keep_seed = ParamOverrides::default().apply(params());
        assert_eq!(keep_seed, params());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            TerraformParams::from_json_str("{ width: }"),
            Err(TerraformError::Config(_))
        ));
    }
}
