//! Headless island generator: one pass from config to exported files.

pub mod error;
pub mod export;
pub mod platform;
pub mod scene;

use std::path::PathBuf;

use isle_config::Config;
use isle_physics::{CollisionLayer, PhysicsScene};
use isle_terrain::{TerrainError, TerrainGenerator, VEGETATION_TAG, Waypoints};
use tracing::{info, warn};

pub use error::AppError;
pub use export::Placements;
pub use platform::{PlatformDirs, PlatformError};
pub use scene::{CaptureSink, InstanceRegistry};

/// What a run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Seed the terrain was generated from.
    pub seed: u64,
    /// Vegetation instances spawned.
    pub vegetation: usize,
    /// Start and destination, or `None` when the search ran out of attempts.
    pub waypoints: Option<Waypoints>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

/// Generate, populate, and export one island.
///
/// A waypoint search that runs out of attempts is logged and the run carries
/// on without waypoints; every other failure aborts.
pub fn run(config: &Config) -> Result<RunSummary, AppError> {
    let mut generator = TerrainGenerator::new(&config.terrain);
    let mut sink = CaptureSink::default();
    let mut terrain = generator.generate(&mut sink)?;

    let mut physics = PhysicsScene::new();
    let ground = physics.insert_mesh(&terrain.mesh, CollisionLayer::GROUND)?;

    let mut instances = InstanceRegistry::new();
    let vegetation =
        generator.populate_vegetation(&mut terrain, &physics, ground, &mut instances)?;

    let waypoints = match generator.select_waypoints(&mut terrain, &physics, &mut sink) {
        Ok(waypoints) => Some(waypoints),
        Err(err @ TerrainError::NoValidSurfaceFound { .. }) => {
            warn!(%err, "continuing without waypoints");
            None
        }
        Err(err) => return Err(err.into()),
    };

    let output = &config.output;
    let dir = &output.directory;
    let mut written = Vec::new();

    if output.write_textures {
        if let Some(texture) = &sink.texture {
            let path = export::output_path(dir, export::TEXTURE_FILE)?;
            export::write_png(&path, texture)?;
            written.push(path);
        }
        if let Some(map) = &sink.map {
            let path = export::output_path(dir, export::MAP_FILE)?;
            export::write_png(&path, map)?;
            written.push(path);
        }
    }
    if output.write_mesh
        && let Some(mesh) = &sink.mesh
    {
        let path = export::output_path(dir, export::MESH_FILE)?;
        export::write_obj(&path, mesh)?;
        written.push(path);
    }
    if output.write_placements {
        let placements = Placements::new(
            terrain.config.seed,
            terrain.draw_mode(),
            waypoints.as_ref(),
            instances.positions(VEGETATION_TAG),
        );
        let path = export::output_path(dir, export::PLACEMENTS_FILE)?;
        export::write_placements(&path, &placements)?;
        written.push(path);
    }

    info!(
        seed = terrain.config.seed,
        vegetation,
        waypoints = waypoints.is_some(),
        files = written.len(),
        dir = %dir.display(),
        "run complete"
    );

    Ok(RunSummary {
        seed: terrain.config.seed,
        vegetation,
        waypoints,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_config::DrawMode;

    fn config_in(dir: &std::path::Path, draw_mode: DrawMode) -> Config {
        let mut config = Config::default();
        config.terrain.seed = 17;
        config.terrain.width = 60;
        config.terrain.height = 60;
        config.terrain.draw_mode = draw_mode;
        config.terrain.waypoints.min_distance = 10.0;
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_run_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&config_in(dir.path(), DrawMode::Mesh)).unwrap();

        for file in [
            export::TEXTURE_FILE,
            export::MAP_FILE,
            export::MESH_FILE,
            export::PLACEMENTS_FILE,
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
        assert_eq!(summary.written.len(), 4);

        let text = std::fs::read_to_string(dir.path().join(export::PLACEMENTS_FILE)).unwrap();
        let placements: Placements = ron::from_str(&text).unwrap();
        assert_eq!(placements.seed, 17);
        assert_eq!(placements.vegetation.len(), summary.vegetation);
        assert_eq!(placements.start.is_some(), summary.waypoints.is_some());
    }

    #[test]
    fn test_debug_mode_skips_vegetation() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run(&config_in(dir.path(), DrawMode::Falloff)).unwrap();
        assert_eq!(summary.vegetation, 0);
    }

    #[test]
    fn test_output_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), DrawMode::Color);
        config.output.write_textures = false;
        config.output.write_mesh = false;
        let summary = run(&config).unwrap();
        assert_eq!(summary.written, vec![dir.path().join(export::PLACEMENTS_FILE)]);
        assert!(!dir.path().join(export::TEXTURE_FILE).exists());
    }
}
