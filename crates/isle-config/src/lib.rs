//! Configuration system for island terrain generation.
//!
//! Provides the [`TerrainConfig`] input bundle and the surrounding runtime
//! settings, persisted to disk as RON. Supports CLI overrides via clap,
//! forward/backward compatible serialization, and sanitizing of
//! user-tunable parameters.

mod cli;
mod config;
mod error;
mod seed;

pub use cli::CliArgs;
pub use config::{
    APP_DIR_NAME, CONFIG_FILE, ClassifyFallback, Config, ConfigOrigin, DebugConfig, DrawMode,
    FalloffConfig, FilterMode, NoiseConfig, OutputConfig, SurfaceConfig, TerrainBandConfig,
    TerrainConfig, VegetationConfig, WaypointConfig,
};
pub use error::ConfigError;
pub use seed::{MAX_RANDOM_SEED, parse_seed};
