//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use rand::Rng;

use crate::Config;
use crate::config::DrawMode;
use crate::seed::parse_seed;

/// Island terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "isle", about = "Seeded island terrain generator")]
pub struct CliArgs {
    /// Seed. Integers are used verbatim; anything else picks a random seed.
    #[arg(long)]
    pub seed: Option<String>,

    /// Field width in cells.
    #[arg(long)]
    pub width: Option<u32>,

    /// Field height in cells.
    #[arg(long)]
    pub height: Option<u32>,

    /// Which intermediate result to present.
    #[arg(long, value_enum)]
    pub draw_mode: Option<DrawMode>,

    /// Output directory for exported files.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip vegetation scattering.
    #[arg(long)]
    pub no_vegetation: bool,

    /// Minimum distance between start and destination.
    #[arg(long)]
    pub min_distance: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config, drawing random seeds from the thread RNG.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        self.apply_cli_overrides_with(args, &mut rand::rng());
    }

    /// Apply CLI overrides, drawing any random seed from `rng`.
    pub fn apply_cli_overrides_with<R: Rng + ?Sized>(&mut self, args: &CliArgs, rng: &mut R) {
        if let Some(ref seed) = args.seed {
            self.terrain.seed = parse_seed(seed, rng);
        }
        if let Some(w) = args.width {
            self.terrain.width = w;
        }
        if let Some(h) = args.height {
            self.terrain.height = h;
        }
        if let Some(mode) = args.draw_mode {
            self.terrain.draw_mode = mode;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if args.no_vegetation {
            self.terrain.vegetation.enabled = false;
        }
        if let Some(d) = args.min_distance {
            self.terrain.waypoints.min_distance = d;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
