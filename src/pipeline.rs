//! Terraforming pipeline: deposition, normalization, classification.
//!
//! Stages run strictly in order on one grid owned by [`Terraformer::run`].
//! The raw grid is copied out before normalization overwrites it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

use crate::classify::{classify_map, Terrain};
use crate::deposition::{deposit_all, Impact};
use crate::error::Result;
use crate::normalize::{normalize, Normalization};
use crate::params::ValidParams;
use crate::tilemap::Tilemap;

/// Seeded generator for a run. A missing seed is drawn at random and
/// returned so the run can be repeated.
pub fn rng_from_seed(seed: Option<u64>) -> (u64, ChaCha8Rng) {
    let seed = seed.unwrap_or_else(rand::random);
    (seed, ChaCha8Rng::seed_from_u64(seed))
}

/// Everything a finished run produced.
#[derive(Clone, Debug)]
pub struct TerraformOutput {
    /// Accumulated elevation before normalization
    pub raw: Tilemap<i32>,
    /// Elevation rescaled to 0-255
    pub normalized: Tilemap<i32>,
    /// Terrain band of each cell
    pub terrain: Tilemap<Terrain>,
    /// Highest raw elevation
    pub max_elevation: i32,
    pub normalization: Normalization,
}

/// Drives the three stages for one set of validated parameters.
pub struct Terraformer {
    params: ValidParams,
}

impl Terraformer {
    pub fn new(params: ValidParams) -> Self {
        Self { params }
    }

    /// Run the whole pipeline, drawing impact centers from `rng`.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TerraformOutput> {
        let raw = self.deposit(rng);
        let mut normalized = raw.clone();
        let normalization = self.normalize(&mut normalized)?;
        let terrain = self.classify(&normalized);

        let max_elevation = match normalization {
            Normalization::Scaled { max } => max,
            Normalization::AllZero => 0,
        };

        Ok(TerraformOutput {
            raw,
            normalized,
            terrain,
            max_elevation,
            normalization,
        })
    }

    /// Drop every dirtball onto a fresh zero grid.
    #[instrument(
        skip_all,
        fields(width = self.params.width, height = self.params.height, dirtballs = self.params.dirtballs)
    )]
    pub fn deposit<R: Rng + ?Sized>(&self, rng: &mut R) -> Tilemap<i32> {
        let ValidParams { width, height, radius, power, dirtballs, .. } = self.params;
        let mut grid = Tilemap::new(width, height);

        let impacts = (0..dirtballs)
            .map(|_| Impact::random(&mut *rng, width, height, f64::from(radius), power));
        let dropped = deposit_all(&mut grid, impacts);

        info!(dropped, "dirtballs deposited");
        grid
    }

    #[instrument(skip_all)]
    fn normalize(&self, grid: &mut Tilemap<i32>) -> Result<Normalization> {
        let outcome = normalize(grid)?;
        debug!(?outcome, "grid normalized");
        Ok(outcome)
    }

    #[instrument(skip_all, fields(waterline = self.params.waterline))]
    fn classify(&self, normalized: &Tilemap<i32>) -> Tilemap<Terrain> {
        let terrain = classify_map(normalized, self.params.waterline);
        debug!("terrain classified");
        terrain
    }
}
