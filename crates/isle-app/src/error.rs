//! Top-level error type for the `isle` binary.

use std::path::PathBuf;

use isle_config::ConfigError;
use isle_physics::PhysicsError;
use isle_terrain::TerrainError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("terrain generation failed: {0}")]
    Terrain(#[from] TerrainError),

    #[error("terrain collider rejected: {0}")]
    Physics(#[from] PhysicsError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to serialize placements: {0}")]
    Serialize(#[from] ron::Error),

    #[error("pixel buffer does not fit a {width}x{height} image")]
    PixelBuffer { width: u32, height: u32 },
}
