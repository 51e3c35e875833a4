//! Error type shared by parameter validation, the pipeline and the writers.

use thiserror::Error;

/// Errors that can occur while configuring or running the terraformer.
#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("Invalid grid {axis}: {value} (must be a positive integer)")]
    InvalidDimension { axis: &'static str, value: i64 },
    #[error("Grid {width}x{height} is too large (at most {max_cells} cells)")]
    GridTooLarge { width: i64, height: i64, max_cells: u64 },
    #[error("Invalid waterline: {0} (must be between 40 and 200)")]
    InvalidWaterline(i64),
    #[error("Invalid dirtball radius: {0} (minimum 2)")]
    InvalidRadius(i64),
    #[error("Invalid dirtball power: {power} (minimum = radius {radius})")]
    InvalidPower { power: i64, radius: i64 },
    #[error("Invalid number of dirtballs: {0} (must not be negative)")]
    InvalidDirtballCount(i64),
    #[error("Cannot normalize by a maximum elevation of 0")]
    DivideByZero,
    #[error("Cannot take the maximum of an empty grid")]
    EmptyGrid,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Image of {width}x{height} cells at scale {scale} is too large")]
    ImageTooLarge { width: usize, height: usize, scale: u32 },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Input error: {0}")]
    Prompt(String),
}

impl TerraformError {
    /// True for errors raised by parameter validation, before any grid exists.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TerraformError::InvalidDimension { .. }
                | TerraformError::GridTooLarge { .. }
                | TerraformError::InvalidWaterline(_)
                | TerraformError::InvalidRadius(_)
                | TerraformError::InvalidPower { .. }
                | TerraformError::InvalidDirtballCount(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TerraformError>;
