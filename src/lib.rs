//! Terraformer library
//!
//! Builds heightmaps from dirtball impacts, normalizes them and sorts every
//! cell into a terrain band. Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod classify;
pub mod deposition;
pub mod error;
pub mod export;
pub mod normalize;
pub mod params;
pub mod pipeline;
pub mod prompt;
pub mod tilemap;

pub use error::{Result, TerraformError};
pub use params::{TerraformParams, ValidParams};
pub use pipeline::{TerraformOutput, Terraformer};
