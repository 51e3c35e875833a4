//! Terrain banding: map normalized elevation onto five terrain bands.
//!
//! Water splits into deep and shallow at half the waterline. The land zone
//! above the waterline is cut at 15%, 40% and 80% of its extent into beach,
//! plains, forest and mountain.

use serde::Serialize;

use crate::tilemap::Tilemap;

/// Terrain band of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    DeepWater,
    ShallowWater,
    Beach,
    Plains,
    Forest,
    Mountain,
}

impl Terrain {
    pub fn all() -> &'static [Terrain] {
        &[
            Terrain::DeepWater,
            Terrain::ShallowWater,
            Terrain::Beach,
            Terrain::Plains,
            Terrain::Forest,
            Terrain::Mountain,
        ]
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::DeepWater => '#',
            Terrain::ShallowWater => '~',
            Terrain::Beach => '.',
            Terrain::Plains => '-',
            Terrain::Forest => '*',
            Terrain::Mountain => '^',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Terrain> {
        Terrain::all().iter().copied().find(|t| t.symbol() == symbol)
    }

    pub fn name(self) -> &'static str {
        match self {
            Terrain::DeepWater => "Deep water",
            Terrain::ShallowWater => "Shallow water",
            Terrain::Beach => "Beach",
            Terrain::Plains => "Plains",
            Terrain::Forest => "Forest",
            Terrain::Mountain => "Mountain",
        }
    }

    pub fn category(self) -> TerrainCategory {
        match self {
            Terrain::DeepWater | Terrain::ShallowWater => TerrainCategory::Water,
            Terrain::Beach => TerrainCategory::Sand,
            Terrain::Plains | Terrain::Forest | Terrain::Mountain => TerrainCategory::Land,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Display class of a terrain symbol. Renderers pick colours from this alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    Water,
    Sand,
    Land,
}

/// Category of a raw map symbol. Anything that is not water or sand draws as land.
pub fn category_for_symbol(symbol: char) -> TerrainCategory {
    match symbol {
        '#' | '~' => TerrainCategory::Water,
        '.' => TerrainCategory::Sand,
        _ => TerrainCategory::Land,
    }
}

/// Band boundaries derived once from the waterline.
///
/// Each `*_top` is the first value that no longer belongs to that band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BandThresholds {
    pub waterline: i32,
    pub half_water: i32,
    pub beach_top: i32,
    pub plains_top: i32,
    pub forest_top: i32,
}

impl BandThresholds {
    pub fn from_waterline(waterline: i32) -> Self {
        let land_zone = f64::from(255 - waterline);
        // Integer truncation of each percentage, computed in floating point.
        let pct = |fraction: f64| (land_zone * fraction) as i32;

        Self {
            waterline,
            half_water: (f64::from(waterline) * 0.5) as i32,
            beach_top: waterline + pct(0.15),
            plains_top: waterline + pct(0.40),
            forest_top: waterline + pct(0.80),
        }
    }

    pub fn classify(&self, value: i32) -> Terrain {
        if value <= self.waterline {
            if value < self.half_water {
                Terrain::DeepWater
            } else {
                Terrain::ShallowWater
            }
        } else if value < self.beach_top {
            Terrain::Beach
        } else if value < self.plains_top {
            Terrain::Plains
        } else if value < self.forest_top {
            Terrain::Forest
        } else {
            Terrain::Mountain
        }
    }
}

/// Classify a single normalized value.
pub fn classify_value(value: i32, thresholds: &BandThresholds) -> Terrain {
    thresholds.classify(value)
}

/// Classify a normalized elevation grid. The thresholds are derived once.
pub fn classify_map(normalized: &Tilemap<i32>, waterline: i32) -> Tilemap<Terrain> {
    let thresholds = BandThresholds::from_waterline(waterline);
    normalized.map(|&v| thresholds.classify(v))
}

/// Per-band cell counts of a terrain map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainStats {
    counts: [usize; 6],
    total: usize,
}

/// One row of [`TerrainStats`] in serialized form.
#[derive(Clone, Debug, Serialize)]
pub struct BandCount {
    pub terrain: Terrain,
    pub symbol: char,
    pub count: usize,
    pub percent: f64,
}

impl TerrainStats {
    pub fn from_map(terrain: &Tilemap<Terrain>) -> Self {
        let mut stats = Self::default();
        for t in terrain.values() {
            stats.counts[t.index()] += 1;
            stats.total += 1;
        }
        stats
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.counts[terrain.index()]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self, terrain: Terrain) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.count(terrain) as f64 / self.total as f64
        }
    }

    pub fn category_count(&self, category: TerrainCategory) -> usize {
        Terrain::all()
            .iter()
            .filter(|t| t.category() == category)
            .map(|&t| self.count(t))
            .sum()
    }

    pub fn bands(&self) -> Vec<BandCount> {
        Terrain::all()
            .iter()
            .map(|&terrain| BandCount {
                terrain,
                symbol: terrain.symbol(),
                count: self.count(terrain),
                percent: self.percent(terrain),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_for_waterline_100() {
        let t = BandThresholds::from_waterline(100);
        // land zone 155: 23.25, 62, 124
        assert_eq!(t.half_water, 50);
        assert_eq!(t.beach_top, 123);
        assert_eq!(t.plains_top, 162);
        assert_eq!(t.forest_top, 224);
    }

    #[test]
    fn test_deep_shallow_boundary() {
        let t = BandThresholds::from_waterline(100);
        assert_eq!(classify_value(49, &t), Terrain::DeepWater);
        assert_eq!(classify_value(50, &t), Terrain::ShallowWater);
        assert_eq!(classify_value(0, &t), Terrain::DeepWater);
    }

    #[test]
    fn test_band_edges_resolve_upward() {
        let t = BandThresholds::from_waterline(100);
        assert_eq!(classify_value(100, &t), Terrain::ShallowWater);
        assert_eq!(classify_value(101, &t), Terrain::Beach);
        assert_eq!(classify_value(122, &t), Terrain::Beach);
        assert_eq!(classify_value(123, &t), Terrain::Plains);
        assert_eq!(classify_value(161, &t), Terrain::Plains);
        assert_eq!(classify_value(162, &t), Terrain::Forest);
        assert_eq!(classify_value(223, &t), Terrain::Forest);
        assert_eq!(classify_value(224, &t), Terrain::Mountain);
        assert_eq!(classify_value(255, &t), Terrain::Mountain);
    }

    #[test]
    fn test_odd_waterline_truncates_half() {
        let t = BandThresholds::from_waterline(41);
        assert_eq!(t.half_water, 20);
        assert_eq!(classify_value(19, &t), Terrain::DeepWater);
        assert_eq!(classify_value(20, &t), Terrain::ShallowWater);
    }

    #[test]
    fn test_classification_is_total_and_ordered() {
        // Every value maps to a band, and bands never go back down as the
        // value rises, for every accepted waterline.
        for waterline in 40..=200 {
            let t = BandThresholds::from_waterline(waterline);
            let mut previous = Terrain::DeepWater;
            for v in 0..=255 {
                let band = classify_value(v, &t);
                assert!(band >= previous, "waterline {} value {}", waterline, v);
                assert_eq!(band.category() == TerrainCategory::Water, v <= waterline);
                previous = band;
            }
            assert_eq!(previous, Terrain::Mountain);
        }
    }

    #[test]
    fn test_classify_map_is_idempotent() {
        let normalized = Tilemap::from_rows(&[
            vec![0, 49, 50, 100],
            vec![101, 123, 162, 255],
        ])
        .unwrap();
        let first = classify_map(&normalized, 100);
        let second = classify_map(&normalized, 100);
        assert_eq!(first, second);

        let symbols: String = first.values().map(|t| t.symbol()).collect();
        assert_eq!(symbols, "#~~~.-*^");
    }

    #[test]
    fn test_symbol_round_trip_and_categories() {
        for &t in Terrain::all() {
            assert_eq!(Terrain::from_symbol(t.symbol()), Some(t));
            assert_eq!(category_for_symbol(t.symbol()), t.category());
        }
        assert_eq!(Terrain::from_symbol('x'), None);
        assert_eq!(category_for_symbol('x'), TerrainCategory::Land);
    }

    #[test]
    fn test_stats() {
        let terrain = Tilemap::from_rows(&[
            vec![Terrain::DeepWater, Terrain::DeepWater],
            vec![Terrain::Beach, Terrain::Mountain],
        ])
        .unwrap();
        let stats = TerrainStats::from_map(&terrain);
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.count(Terrain::DeepWater), 2);
        assert_eq!(stats.count(Terrain::Forest), 0);
        assert_eq!(stats.percent(Terrain::Beach), 25.0);
        assert_eq!(stats.category_count(TerrainCategory::Water), 2);
        assert_eq!(stats.category_count(TerrainCategory::Land), 1);
        assert_eq!(stats.bands().len(), 6);
    }
}
