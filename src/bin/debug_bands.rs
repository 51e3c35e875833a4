//! Debug tool for comparing waterlines visually
//! Deposits one landmass, then bands the same normalized grid at several waterlines

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use terraformer::ascii::{render_terrain, stats_table};
use terraformer::classify::{classify_map, BandThresholds, TerrainStats};
use terraformer::deposition::{deposit_all, Impact};
use terraformer::normalize::normalize;
use terraformer::params::{MAX_WATERLINE, MIN_WATERLINE};
use terraformer::tilemap::Tilemap;

const WIDTH: usize = 60;
const HEIGHT: usize = 24;
const RADIUS: f64 = 6.0;
const POWER: i32 = 8;
const DIRTBALLS: usize = 150;
const SEED: u64 = 42;

fn main() {
    println!("Generating waterline comparison...");

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut grid = Tilemap::new(WIDTH, HEIGHT);
    let impacts: Vec<Impact> = (0..DIRTBALLS)
        .map(|_| Impact::random(&mut rng, WIDTH, HEIGHT, RADIUS, POWER))
        .collect();
    deposit_all(&mut grid, impacts);

    if let Err(e) = normalize(&mut grid) {
        eprintln!("Normalization failed: {}", e);
        return;
    }

    for waterline in (MIN_WATERLINE..=MAX_WATERLINE).step_by(40) {
        let waterline = waterline as i32;
        let t = BandThresholds::from_waterline(waterline);
        let terrain = classify_map(&grid, waterline);

        println!(
            "\n=== Waterline {} (deep < {}, beach < {}, plains < {}, forest < {}) ===",
            waterline, t.half_water, t.beach_top, t.plains_top, t.forest_top
        );
        print!("{}", render_terrain(&terrain));
        print!("{}", stats_table(&TerrainStats::from_map(&terrain)));
    }
}
