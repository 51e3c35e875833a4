use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use terraformer::ascii::write_report;
use terraformer::export::{self, OutputPaths, RunManifest};
use terraformer::params::{ParamOverrides, TerraformParams};
use terraformer::pipeline::{rng_from_seed, Terraformer};
use terraformer::prompt::Prompter;
use terraformer::{Result, TerraformError};

#[derive(Parser, Debug)]
#[command(name = "terraformer")]
#[command(about = "Generate ASCII terrain by dropping dirtballs on a grid")]
struct Args {
    /// Grid width in cells
    #[arg(short = 'W', long)]
    width: Option<i64>,

    /// Grid height in cells
    #[arg(short = 'H', long)]
    height: Option<i64>,

    /// Waterline (40-200) on the normalized 0-255 scale
    #[arg(short, long, allow_negative_numbers = true)]
    waterline: Option<i64>,

    /// Dirtball radius (minimum 2)
    #[arg(short, long, allow_negative_numbers = true)]
    radius: Option<i64>,

    /// Dirtball power rating (minimum = radius)
    #[arg(short, long, allow_negative_numbers = true)]
    power: Option<i64>,

    /// Number of dirtballs to drop
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    dirtballs: Option<i64>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the landmass files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also export the terrain as an image (e.g. "terrain.png")
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per cell in the image export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Print the terrain without colours
    #[arg(long)]
    no_color: bool,

    /// Never ask for missing values; use defaults instead
    #[arg(long)]
    no_prompt: bool,

    /// Do not print the grids
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            width: self.width,
            height: self.height,
            waterline: self.waterline,
            radius: self.radius,
            power: self.power,
            dirtballs: self.dirtballs,
            seed: self.seed,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Flags win over the config file. Without a config file, missing values
/// are asked for on the console unless prompting is disabled.
fn gather_params(args: &Args) -> Result<TerraformParams> {
    let mut overrides = args.overrides();

    if let Some(path) = &args.config {
        info!(path = %path.display(), "loading parameters");
        let base = TerraformParams::from_json_file(path)?;
        return Ok(overrides.apply(base));
    }

    if !args.no_prompt && !overrides.is_complete() {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        prompter.fill(&mut overrides)?;
    }

    Ok(overrides.apply(TerraformParams::default()))
}

fn run(args: &Args) -> Result<()> {
    println!("Welcome to the Terraformer!");

    let params = gather_params(args)?.validate()?;
    let (seed, mut rng) = rng_from_seed(params.seed);
    println!("Terraforming with seed: {}", seed);
    println!(
        "Map size: {}x{}, waterline {}, {} dirtballs (radius {}, power {})",
        params.width, params.height, params.waterline, params.dirtballs, params.radius, params.power
    );

    let output = Terraformer::new(params).run(&mut rng)?;

    // A broken terminal must not stop the landmass from being saved.
    let color = !args.no_color && io::stdout().is_terminal();
    if let Err(e) = write_report(&mut io::stdout().lock(), &output, !args.quiet, color) {
        error!("cannot display the terrain: {}", e);
    }

    // Write failures are reported but never discard the finished grids.
    let paths = OutputPaths::in_dir(&args.output_dir);
    if let Err(e) = paths.ensure_dir() {
        error!(dir = %args.output_dir.display(), "cannot create output directory: {}", e);
    }
    let manifest = RunManifest::new(&params, seed, &output);
    for report in export::save_run(&paths, &output, &manifest) {
        match report.result {
            Ok(()) => println!("Map saved to {}", report.path.display()),
            Err(e) => {
                error!(path = %report.path.display(), "{}", e);
                println!("Failed to save the map to {}", report.path.display());
            }
        }
    }

    if let Some(png) = &args.png {
        match export::export_terrain_png(&output.terrain, args.png_scale, png) {
            Ok(()) => println!("Image saved to {}", png.display()),
            Err(e) => error!(path = %png.display(), "image export failed: {}", e),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_invalid_input() {
                ExitCode::from(2)
            } else if matches!(e, TerraformError::Prompt(_)) {
                ExitCode::from(3)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
