//! ASCII rendering of elevation and terrain grids
//!
//! Provides the text forms shared by the terminal output and the saved
//! files, plus colour rendering for terminals.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::classify::{Terrain, TerrainCategory, TerrainStats};
use crate::pipeline::TerraformOutput;
use crate::tilemap::Tilemap;

/// Width of one elevation column, including padding.
pub const ELEVATION_FIELD_WIDTH: usize = 4;

/// Terminal colour for a display category
pub fn category_color(category: TerrainCategory) -> Color {
    match category {
        TerrainCategory::Water => Color::Blue,
        TerrainCategory::Sand => Color::Yellow,
        TerrainCategory::Land => Color::Green,
    }
}

/// Render an elevation grid: every value right-aligned in a 4-wide field,
/// one row per line.
pub fn render_elevation(map: &Tilemap<i32>) -> String {
    let mut result = String::with_capacity((map.width * ELEVATION_FIELD_WIDTH + 1) * map.height);
    for row in map.rows() {
        for value in row {
            result.push_str(&format!("{:>width$}", value, width = ELEVATION_FIELD_WIDTH));
        }
        result.push('\n');
    }
    result
}

/// Render a terrain grid as raw symbols, one row per line.
pub fn render_terrain(map: &Tilemap<Terrain>) -> String {
    let mut result = String::with_capacity((map.width + 1) * map.height);
    for row in map.rows() {
        result.extend(row.iter().map(|t| t.symbol()));
        result.push('\n');
    }
    result
}

/// Write a terrain grid with each symbol coloured by its category.
pub fn write_terrain_colored<W: Write>(out: &mut W, map: &Tilemap<Terrain>) -> io::Result<()> {
    let mut current: Option<TerrainCategory> = None;
    for row in map.rows() {
        for terrain in row {
            let category = terrain.category();
            if current != Some(category) {
                queue!(out, SetForegroundColor(category_color(category)))?;
                current = Some(category);
            }
            queue!(out, Print(terrain.symbol()))?;
        }
        queue!(out, Print('\n'))?;
    }
    queue!(out, ResetColor)?;
    out.flush()
}

/// Write a terrain grid, with or without colour.
pub fn write_terrain<W: Write>(out: &mut W, map: &Tilemap<Terrain>, color: bool) -> io::Result<()> {
    if color {
        write_terrain_colored(out, map)
    } else {
        out.write_all(render_terrain(map).as_bytes())?;
        out.flush()
    }
}

/// Legend of terrain symbols
pub fn terrain_legend() -> String {
    let mut legend = String::from("=== TERRAIN LEGEND ===\n");
    for &terrain in Terrain::all() {
        let category = match terrain.category() {
            TerrainCategory::Water => "water",
            TerrainCategory::Sand => "sand",
            TerrainCategory::Land => "land",
        };
        legend.push_str(&format!("  {} {:14} ({})\n", terrain.symbol(), terrain.name(), category));
    }
    legend
}

/// Band distribution table
pub fn stats_table(stats: &TerrainStats) -> String {
    let mut table = String::new();
    for band in stats.bands() {
        table.push_str(&format!(
            "  {} {:14} {:>7} ({:>5.1}%)\n",
            band.symbol,
            band.terrain.name(),
            band.count,
            band.percent
        ));
    }
    table
}

/// Write the console report for a finished run: the three grids and the
/// legend when `show_grids` is set, then the band distribution.
pub fn write_report<W: Write>(
    out: &mut W,
    output: &TerraformOutput,
    show_grids: bool,
    color: bool,
) -> io::Result<()> {
    if show_grids {
        writeln!(out, "Raw 2D array:")?;
        write!(out, "{}", render_elevation(&output.raw))?;
        writeln!(out)?;

        writeln!(out, "Normalized 2D array:")?;
        write!(out, "{}", render_elevation(&output.normalized))?;
        writeln!(out)?;

        writeln!(out, "Polished ASCII character array:")?;
        write_terrain(out, &output.terrain, color)?;
        writeln!(out)?;
        write!(out, "{}", terrain_legend())?;
    }

    let stats = TerrainStats::from_map(&output.terrain);
    writeln!(out, "Band distribution:")?;
    write!(out, "{}", stats_table(&stats))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalization;

    fn output() -> TerraformOutput {
        let raw = Tilemap::from_rows(&[vec![0, 1], vec![2, 4]]).unwrap();
        let normalized = Tilemap::from_rows(&[vec![0, 63], vec![127, 255]]).unwrap();
        let terrain = Tilemap::from_rows(&[
            vec![Terrain::DeepWater, Terrain::ShallowWater],
            vec![Terrain::Plains, Terrain::Mountain],
        ])
        .unwrap();
        TerraformOutput {
            raw,
            normalized,
            terrain,
            max_elevation: 4,
            normalization: Normalization::Scaled { max: 4 },
        }
    }

    /// Accepts `budget` bytes, then fails like a closed pipe.
    struct BrokenPipe {
        budget: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_elevation_fixed_width() {
        let map = Tilemap::from_rows(&[vec![0, 5, 255], vec![12, 1000, 7]]).unwrap();
        assert_eq!(render_elevation(&map), "   0   5 255\n  121000   7\n");
    }

    #[test]
    fn test_render_terrain() {
        let map = Tilemap::from_rows(&[
            vec![Terrain::DeepWater, Terrain::ShallowWater, Terrain::Beach],
            vec![Terrain::Plains, Terrain::Forest, Terrain::Mountain],
        ])
        .unwrap();
        assert_eq!(render_terrain(&map), "#~.\n-*^\n");
    }

    #[test]
    fn test_colored_output_switches_only_on_category_change() {
        let map = Tilemap::from_rows(&[vec![
            Terrain::DeepWater,
            Terrain::ShallowWater,
            Terrain::Beach,
            Terrain::Forest,
        ]])
        .unwrap();
        let mut out = Vec::new();
        write_terrain_colored(&mut out, &map).unwrap();
        let text = String::from_utf8(out).unwrap();

        // One colour change per run of categories: water, sand, land
        assert_eq!(text.matches("\u{1b}[38;").count(), 3);
        assert!(text.contains("#~"));
        assert!(text.ends_with("\u{1b}[0m"));
    }

    #[test]
    fn test_plain_write_matches_render() {
        let map = Tilemap::new_with(3, 2, Terrain::Plains);
        let mut out = Vec::new();
        write_terrain(&mut out, &map, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), render_terrain(&map));
    }

    #[test]
    fn test_report_sections() {
        let mut out = Vec::new();
        write_report(&mut out, &output(), true, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Raw 2D array:\n   0   1\n   2   4\n"));
        assert!(text.contains("Normalized 2D array:\n   0  63\n 127 255\n"));
        assert!(text.contains("Polished ASCII character array:\n#~\n-^\n"));
        assert!(text.contains("=== TERRAIN LEGEND ==="));
        assert!(text.contains("Band distribution:"));

        let mut quiet = Vec::new();
        write_report(&mut quiet, &output(), false, false).unwrap();
        let text = String::from_utf8(quiet).unwrap();
        assert!(text.starts_with("Band distribution:"));
        assert!(!text.contains("Raw 2D array:"));
    }

    #[test]
    fn test_report_returns_write_errors() {
        for budget in [0, 10, 60] {
            let mut out = BrokenPipe { budget };
            let err = write_report(&mut out, &output(), true, false).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }
    }

    #[test]
    fn test_legend_lists_every_band() {
        let legend = terrain_legend();
        for &t in Terrain::all() {
            assert!(legend.contains(t.symbol()));
            assert!(legend.contains(t.name()));
        }
    }
}
