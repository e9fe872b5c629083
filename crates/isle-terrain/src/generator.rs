//! The terrain generation pipeline.
//!
//! [`TerrainGenerator::generate`] runs noise, falloff, combination and
//! classification, then builds the mesh and texture for the configured
//! [`DrawMode`] and hands them to a [`MeshSink`]. Every call returns a fresh
//! [`GeneratedTerrain`]; vegetation and waypoints run against that pass.

use std::time::Instant;

use isle_config::{DrawMode, TerrainConfig};
use isle_field::{ColorField, HeightField};
use isle_mesh::{KeyframeCurve, TerrainMesh, build_preview_mesh, build_terrain_mesh};
use isle_physics::{ColliderHandle, RayCaster};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, info_span};

use crate::classify::TerrainClassifier;
use crate::combine::multiply;
use crate::error::TerrainError;
use crate::falloff::generate_falloff_map;
use crate::noise_field::{NoiseParams, generate_noise_map};
use crate::texture::TerrainImage;
use crate::vegetation::{InstanceHost, VegetationLayer, VegetationScatterer};
use crate::waypoint::{WaypointSelector, Waypoints};

/// Receives the results of a generation pass for display.
pub trait MeshSink {
    /// Present the terrain mesh with its main texture.
    fn draw_mesh(&mut self, mesh: &TerrainMesh, texture: &TerrainImage);
    /// Present the overview map.
    fn draw_map(&mut self, map: &TerrainImage);
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MeshSink for NullSink {
    fn draw_mesh(&mut self, _mesh: &TerrainMesh, _texture: &TerrainImage) {}
    fn draw_map(&mut self, _map: &TerrainImage) {}
}

/// Everything one generation pass produced.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    /// The sanitized config the pass ran with.
    pub config: TerrainConfig,
    pub noise: HeightField,
    pub falloff: HeightField,
    /// `noise * falloff`.
    pub combined: HeightField,
    pub colors: ColorField,
    pub mesh: TerrainMesh,
    /// Main texture for the configured draw mode.
    pub texture: TerrainImage,
    /// Overview map, the main texture mirrored left to right until waypoints mark it.
    pub map: TerrainImage,
    /// Random stream for this pass, continued by vegetation and waypoint sampling.
    pub rng: ChaCha8Rng,
}

impl GeneratedTerrain {
    pub fn draw_mode(&self) -> DrawMode {
        self.config.draw_mode
    }

    /// The field the draw mode presents.
    pub fn presented_field(&self) -> &HeightField {
        match self.config.draw_mode {
            DrawMode::Noise => &self.noise,
            DrawMode::Falloff => &self.falloff,
            DrawMode::Combined | DrawMode::Color | DrawMode::Mesh => &self.combined,
        }
    }

    /// Coarse debug mesh of the presented field, scaled by the height multiplier.
    pub fn preview_mesh(&self) -> TerrainMesh {
        build_preview_mesh(self.presented_field(), self.config.surface.height_multiplier)
    }
}

/// Runs generation passes for one configuration.
pub struct TerrainGenerator {
    config: TerrainConfig,
    classifier: TerrainClassifier,
    curve: KeyframeCurve,
    vegetation: VegetationLayer,
}

impl TerrainGenerator {
    /// Create a generator. The config is sanitized first.
    pub fn new(config: &TerrainConfig) -> Self {
        let config = config.sanitized();
        Self {
            classifier: TerrainClassifier::from_config(&config.surface),
            curve: KeyframeCurve::new(config.surface.height_curve.iter().copied()),
            vegetation: VegetationLayer::new(),
            config,
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn classifier(&self) -> &TerrainClassifier {
        &self.classifier
    }

    /// Instances spawned by the last vegetation pass.
    pub fn vegetation(&self) -> &VegetationLayer {
        &self.vegetation
    }

    /// Run one full generation pass and present it to `sink`.
    pub fn generate(&self, sink: &mut dyn MeshSink) -> Result<GeneratedTerrain, TerrainError> {
        let config = &self.config;
        let _span = info_span!("generate", seed = config.seed, draw_mode = ?config.draw_mode).entered();
        let start = Instant::now();

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let noise = generate_noise_map(&NoiseParams::from(config), &mut rng);
        let falloff =
            generate_falloff_map(config.width, config.height, config.falloff.start, config.falloff.end);
        let combined = multiply(&noise, &falloff)?;
        let colors = self.classifier.classify(&combined);
        debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "fields ready");

        let filter = config.surface.filter_mode;
        let (mesh, texture) = match config.draw_mode {
            DrawMode::Noise => (
                build_terrain_mesh(&noise, &self.curve, 0.0),
                TerrainImage::from_height_field(&noise, filter),
            ),
            DrawMode::Falloff => (
                build_terrain_mesh(&falloff, &self.curve, 0.0),
                TerrainImage::from_height_field(&falloff, filter),
            ),
            DrawMode::Combined => (
                build_terrain_mesh(&combined, &self.curve, 0.0),
                TerrainImage::from_height_field(&combined, filter),
            ),
            DrawMode::Color => (
                build_terrain_mesh(&combined, &self.curve, 0.0),
                TerrainImage::from_color_field(&colors, filter),
            ),
            DrawMode::Mesh => (
                build_terrain_mesh(&combined, &self.curve, config.surface.height_multiplier),
                TerrainImage::from_color_field(&colors, filter),
            ),
        };
        let map = texture.flip_horizontal();

        sink.draw_mesh(&mesh, &texture);
        sink.draw_map(&map);

        info!(
            width = config.width,
            height = config.height,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "terrain generated"
        );

        Ok(GeneratedTerrain {
            config: config.clone(),
            noise,
            falloff,
            combined,
            colors,
            mesh,
            texture,
            map,
            rng,
        })
    }

    /// Replace the vegetation of the previous pass.
    ///
    /// The old instances are always cleared. New ones are scattered only in
    /// [`DrawMode::Mesh`] with vegetation enabled. Returns the number spawned.
    pub fn populate_vegetation(
        &mut self,
        terrain: &mut GeneratedTerrain,
        rays: &dyn RayCaster,
        collider: ColliderHandle,
        host: &mut dyn InstanceHost,
    ) -> Result<usize, TerrainError> {
        let removed = self.vegetation.clear(host);
        if removed > 0 {
            debug!(removed, "previous vegetation cleared");
        }
        if terrain.config.draw_mode != DrawMode::Mesh || !terrain.config.vegetation.enabled {
            return Ok(0);
        }

        let scatterer = VegetationScatterer::from_config(&terrain.config.vegetation);
        let points = scatterer.scatter(
            &terrain.combined,
            &terrain.mesh,
            rays,
            collider,
            &mut terrain.rng,
        )?;
        let spawned = self.vegetation.populate(host, &points);
        info!(spawned, attempts = scatterer.density, "vegetation populated");
        Ok(spawned)
    }

    /// Despawn all vegetation. Returns the number of instances removed.
    pub fn clear_vegetation(&mut self, host: &mut dyn InstanceHost) -> usize {
        self.vegetation.clear(host)
    }

    /// Pick start and destination, mark the destination on the map, and
    /// present the new map to `sink`.
    pub fn select_waypoints(
        &self,
        terrain: &mut GeneratedTerrain,
        rays: &dyn RayCaster,
        sink: &mut dyn MeshSink,
    ) -> Result<Waypoints, TerrainError> {
        let selector = WaypointSelector::from_config(&terrain.config.waypoints);
        let waypoints =
            selector.select_start_and_end(&terrain.combined, &terrain.mesh, rays, &mut terrain.rng)?;
        terrain.map = selector.mark_destination(
            &terrain.colors,
            terrain.config.surface.filter_mode,
            waypoints.end,
        );
        sink.draw_map(&terrain.map);
        Ok(waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaypointStage;
    use crate::vegetation::VEGETATION_TAG;
    use crate::vegetation::tests::RecordingHost;
    use isle_field::Rgba;
    use isle_physics::{CollisionLayer, PhysicsScene};

    #[derive(Default)]
    struct CountingSink {
        meshes: usize,
        maps: usize,
        last_map: Option<TerrainImage>,
    }

    impl MeshSink for CountingSink {
        fn draw_mesh(&mut self, _mesh: &TerrainMesh, _texture: &TerrainImage) {
            self.meshes += 1;
        }

        fn draw_map(&mut self, map: &TerrainImage) {
            self.maps += 1;
            self.last_map = Some(map.clone());
        }
    }

    fn small_config(seed: u64, draw_mode: DrawMode) -> TerrainConfig {
        TerrainConfig {
            seed,
            width: 48,
            height: 48,
            draw_mode,
            ..Default::default()
        }
    }

    fn collidable(terrain: &GeneratedTerrain) -> (PhysicsScene, ColliderHandle) {
        let mut scene = PhysicsScene::new();
        let handle = scene.insert_mesh(&terrain.mesh, CollisionLayer::GROUND).unwrap();
        (scene, handle)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = TerrainGenerator::new(&small_config(1234, DrawMode::Mesh));
        let a = generator.generate(&mut NullSink).unwrap();
        let b = generator.generate(&mut NullSink).unwrap();
        assert_eq!(a.noise, b.noise);
        assert_eq!(a.combined, b.combined);
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.texture, b.texture);
    }

    #[test]
    fn test_small_scenario() {
        let mut config = small_config(42, DrawMode::Mesh);
        config.width = 4;
        config.height = 4;
        config.noise.scale = 10.0;
        config.noise.octaves = 1;
        config.noise.persistence = 0.5;
        config.noise.lacunarity = 2.0;
        config.noise.offset = (0.0, 0.0);

        let generator = TerrainGenerator::new(&config);
        let pass = generator.generate(&mut NullSink).unwrap();
        assert!(pass.noise.is_normalized());
        assert!(pass.combined.is_normalized());
        assert_eq!(pass.mesh.vertex_count(), 16);
        assert_eq!(pass.mesh.triangle_count(), 18);
        assert_eq!(pass.noise, generator.generate(&mut NullSink).unwrap().noise);
    }

    #[test]
    fn test_sink_receives_mesh_and_mirrored_map() {
        let generator = TerrainGenerator::new(&small_config(5, DrawMode::Color));
        let mut sink = CountingSink::default();
        let pass = generator.generate(&mut sink).unwrap();
        assert_eq!((sink.meshes, sink.maps), (1, 1));
        assert_eq!(sink.last_map.as_ref(), Some(&pass.map));
        assert_eq!(pass.map.flip_horizontal(), pass.texture);
    }

    #[test]
    fn test_debug_modes_are_flat() {
        for mode in [DrawMode::Noise, DrawMode::Falloff, DrawMode::Combined, DrawMode::Color] {
            let pass = TerrainGenerator::new(&small_config(9, mode))
                .generate(&mut NullSink)
                .unwrap();
            assert!(
                pass.mesh.vertices.iter().all(|v| v.position.y == 0.0),
                "{mode:?} mesh should be flat"
            );
        }
    }

    #[test]
    fn test_texture_follows_draw_mode() {
        let noise = TerrainGenerator::new(&small_config(9, DrawMode::Noise))
            .generate(&mut NullSink)
            .unwrap();
        // Grayscale: red, green and blue agree on every pixel.
        assert!(
            noise
                .texture
                .pixels()
                .chunks_exact(4)
                .all(|p| p[0] == p[1] && p[1] == p[2] && p[3] == 255)
        );

        let color = TerrainGenerator::new(&small_config(9, DrawMode::Color))
            .generate(&mut NullSink)
            .unwrap();
        let corner = color.texture.get_pixel(0, 0).unwrap();
        assert_eq!(corner, Rgba(color.config.surface.bands[0].color));
    }

    #[test]
    fn test_mesh_mode_applies_height_multiplier() {
        let pass = TerrainGenerator::new(&small_config(11, DrawMode::Mesh))
            .generate(&mut NullSink)
            .unwrap();
        let top = pass
            .mesh
            .vertices
            .iter()
            .map(|v| v.position.y)
            .fold(f32::MIN, f32::max);
        assert!(top > 0.0);
        assert!(top <= pass.config.surface.height_multiplier + 1e-4);
    }

    #[test]
    fn test_falloff_monotonic_along_diagonal() {
        let pass = TerrainGenerator::new(&small_config(3, DrawMode::Falloff))
            .generate(&mut NullSink)
            .unwrap();
        let mut prev = f32::INFINITY;
        for i in (0..=24).rev() {
            // Moving from the center to the corner.
            let v = *pass.falloff.get(i, i).unwrap();
            assert!(v <= prev + f32::EPSILON, "falloff rose at ({i}, {i})");
            prev = v;
        }
    }

    #[test]
    fn test_preview_mesh_of_presented_field() {
        let pass = TerrainGenerator::new(&small_config(2, DrawMode::Noise))
            .generate(&mut NullSink)
            .unwrap();
        let preview = pass.preview_mesh();
        assert_eq!(preview.vertex_count(), 49 * 49);
        assert_eq!(preview.triangle_count(), 2 * 48 * 48);
        assert_eq!(pass.presented_field(), &pass.noise);
    }

    #[test]
    fn test_vegetation_only_in_mesh_mode() {
        let mut host = RecordingHost::default();

        let mut generator = TerrainGenerator::new(&small_config(21, DrawMode::Mesh));
        let mut pass = generator.generate(&mut NullSink).unwrap();
        let (scene, handle) = collidable(&pass);
        let spawned = generator
            .populate_vegetation(&mut pass, &scene, handle, &mut host)
            .unwrap();
        assert_eq!(spawned, generator.vegetation().len());
        assert_eq!(host.tagged(VEGETATION_TAG).len(), spawned);

        // Switching to a debug mode clears what the mesh pass spawned.
        let mut debug_gen = TerrainGenerator::new(&small_config(21, DrawMode::Color));
        let mut debug_pass = debug_gen.generate(&mut NullSink).unwrap();
        let (scene, handle) = collidable(&debug_pass);
        let spawned = debug_gen
            .populate_vegetation(&mut debug_pass, &scene, handle, &mut host)
            .unwrap();
        assert_eq!(spawned, 0);
        assert!(host.tagged(VEGETATION_TAG).is_empty());
    }

    #[test]
    fn test_disabled_vegetation_spawns_nothing() {
        let mut config = small_config(21, DrawMode::Mesh);
        config.vegetation.enabled = false;
        let mut generator = TerrainGenerator::new(&config);
        let mut pass = generator.generate(&mut NullSink).unwrap();
        let (scene, handle) = collidable(&pass);
        let mut host = RecordingHost::default();
        assert_eq!(
            generator
                .populate_vegetation(&mut pass, &scene, handle, &mut host)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_vegetation_stays_on_dry_gentle_ground() {
        let mut generator = TerrainGenerator::new(&small_config(77, DrawMode::Mesh));
        let mut pass = generator.generate(&mut NullSink).unwrap();
        let (scene, handle) = collidable(&pass);
        let mut host = RecordingHost::default();
        generator
            .populate_vegetation(&mut pass, &scene, handle, &mut host)
            .unwrap();
        for (position, _) in host.live.values() {
            let (col, row) = pass.mesh.world_to_cell(position.x, position.z);
            assert!(*pass.combined.get(col, row).unwrap() >= 0.3);
        }
        let live = host.live.len();
        assert_eq!(generator.clear_vegetation(&mut host), live);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_waypoints_on_generated_island() {
        let mut config = small_config(7, DrawMode::Mesh);
        config.width = 100;
        config.height = 100;
        let generator = TerrainGenerator::new(&config);
        let mut pass = generator.generate(&mut NullSink).unwrap();
        let (scene, _) = collidable(&pass);
        let mut sink = CountingSink::default();

        let waypoints = generator.select_waypoints(&mut pass, &scene, &mut sink).unwrap();
        assert!(waypoints.distance() >= config.waypoints.min_distance);
        assert_eq!(sink.maps, 1);
        assert_eq!(sink.last_map.as_ref(), Some(&pass.map));
        assert_ne!(pass.map, pass.texture.flip_horizontal(), "destination marker missing");
    }

    #[test]
    fn test_waypoints_fail_without_ground() {
        let generator = TerrainGenerator::new(&small_config(7, DrawMode::Mesh));
        let mut pass = generator.generate(&mut NullSink).unwrap();
        pass.config.waypoints.max_attempts = 25;
        let empty = PhysicsScene::new();
        let err = generator
            .select_waypoints(&mut pass, &empty, &mut NullSink)
            .unwrap_err();
        assert_eq!(
            err,
            TerrainError::NoValidSurfaceFound {
                stage: WaypointStage::Start,
                attempts: 25,
            }
        );
    }

    #[test]
    fn test_config_is_sanitized() {
        let mut config = small_config(0, DrawMode::Mesh);
        config.width = 0;
        config.noise.lacunarity = 0.0;
        let generator = TerrainGenerator::new(&config);
        assert_eq!(generator.config().width, 1);
        let pass = generator.generate(&mut NullSink).unwrap();
        assert_eq!(pass.noise.dimensions(), (1, 48));
    }
}
