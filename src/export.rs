//! Writers for the grids a run produces
//!
//! Text files carry exactly the rendered grids, with no header, so they can
//! be read back or diffed directly. Run metadata goes to a separate JSON
//! manifest.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::ascii::{render_elevation, render_terrain};
use crate::classify::{BandCount, BandThresholds, Terrain, TerrainStats};
use crate::error::{Result, TerraformError};
use crate::normalize::Normalization;
use crate::params::ValidParams;
use crate::pipeline::TerraformOutput;
use crate::tilemap::Tilemap;

pub const RAW_FILE: &str = "raw_landmass.txt";
pub const NORMALIZED_FILE: &str = "normalized_landmass.txt";
pub const TERRAIN_FILE: &str = "final_landmass.txt";
pub const MANIFEST_FILE: &str = "terraform_run.json";

fn write_text(path: &Path, contents: &str) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Save an elevation grid as width-4 right-aligned integers.
pub fn save_elevation_file(map: &Tilemap<i32>, path: impl AsRef<Path>) -> Result<()> {
    write_text(path.as_ref(), &render_elevation(map))
}

/// Save a terrain grid as raw symbols, one row per line.
pub fn save_terrain_file(map: &Tilemap<Terrain>, path: impl AsRef<Path>) -> Result<()> {
    write_text(path.as_ref(), &render_terrain(map))
}

/// Metadata describing a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct RunManifest {
    pub generated: String,
    pub seed: u64,
    pub params: ValidParams,
    pub thresholds: BandThresholds,
    pub max_elevation: i32,
    pub normalization: Normalization,
    pub bands: Vec<BandCount>,
}

impl RunManifest {
    pub fn new(params: &ValidParams, seed: u64, output: &TerraformOutput) -> Self {
        Self {
            generated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            seed,
            params: params.with_seed(seed),
            thresholds: BandThresholds::from_waterline(params.waterline),
            max_elevation: output.max_elevation,
            normalization: output.normalization,
            bands: TerrainStats::from_map(&output.terrain).bands(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_text(path.as_ref(), &json)
    }
}

/// RGB colour of a terrain band in image exports.
pub fn terrain_rgb(terrain: Terrain) -> [u8; 3] {
    match terrain {
        Terrain::DeepWater => [20, 50, 130],
        Terrain::ShallowWater => [60, 120, 200],
        Terrain::Beach => [230, 210, 140],
        Terrain::Plains => [120, 190, 80],
        Terrain::Forest => [40, 120, 50],
        Terrain::Mountain => [130, 120, 110],
    }
}

/// Largest image the exporter will allocate, in pixels.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 28;

/// Pixel dimensions of a `width` x `height` grid at `scale` pixels per cell,
/// or `None` when they overflow `u32` or exceed [`MAX_IMAGE_PIXELS`].
fn image_dimensions(width: usize, height: usize, scale: u32) -> Option<(u32, u32)> {
    let img_width = u32::try_from(width).ok()?.checked_mul(scale)?;
    let img_height = u32::try_from(height).ok()?.checked_mul(scale)?;
    let pixels = u64::from(img_width) * u64::from(img_height);
    (pixels <= MAX_IMAGE_PIXELS).then_some((img_width, img_height))
}

/// Render a terrain grid to an image, `scale` pixels per cell.
pub fn render_terrain_image(map: &Tilemap<Terrain>, scale: u32) -> Result<RgbImage> {
    let scale = scale.max(1);
    let (img_width, img_height) = image_dimensions(map.width, map.height, scale).ok_or(
        TerraformError::ImageTooLarge { width: map.width, height: map.height, scale },
    )?;
    let mut img: RgbImage = ImageBuffer::new(img_width, img_height);

    // x * scale < img_width and y * scale < img_height, so no cast truncates
    for (x, y, &terrain) in map.iter() {
        let color = Rgb(terrain_rgb(terrain));
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x as u32 * scale + dx, y as u32 * scale + dy, color);
            }
        }
    }

    Ok(img)
}

/// Export a terrain grid as a PNG (format follows the file extension).
pub fn export_terrain_png(map: &Tilemap<Terrain>, scale: u32, path: impl AsRef<Path>) -> Result<()> {
    render_terrain_image(map, scale)?.save(path.as_ref())?;
    Ok(())
}

/// Paths of the three grid files under an output directory.
#[derive(Clone, Debug)]
pub struct OutputPaths {
    pub raw: PathBuf,
    pub normalized: PathBuf,
    pub terrain: PathBuf,
    pub manifest: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            raw: dir.join(RAW_FILE),
            normalized: dir.join(NORMALIZED_FILE),
            terrain: dir.join(TERRAIN_FILE),
            manifest: dir.join(MANIFEST_FILE),
        }
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.raw.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Outcome of writing one artifact.
#[derive(Debug)]
pub struct SaveReport {
    pub path: PathBuf,
    pub result: Result<()>,
}

/// Write every text artifact of a run. Each write is attempted even when an
/// earlier one failed; the caller decides how to report failures.
pub fn save_run(
    paths: &OutputPaths,
    output: &TerraformOutput,
    manifest: &RunManifest,
) -> Vec<SaveReport> {
    vec![
        SaveReport {
            path: paths.raw.clone(),
            result: save_elevation_file(&output.raw, &paths.raw),
        },
        SaveReport {
            path: paths.normalized.clone(),
            result: save_elevation_file(&output.normalized, &paths.normalized),
        },
        SaveReport {
            path: paths.terrain.clone(),
            result: save_terrain_file(&output.terrain, &paths.terrain),
        },
        SaveReport {
            path: paths.manifest.clone(),
            result: manifest.save(&paths.manifest),
        },
    ]
}
