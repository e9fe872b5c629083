//! Start and destination selection for the navigation task.

use glam::Vec3;
use isle_config::{FilterMode, WaypointConfig};
use isle_field::{ColorField, HeightField, Rgba};
use isle_mesh::TerrainMesh;
use isle_physics::{CollisionLayer, LayerMask, RayCaster};
use rand::Rng;
use tracing::{debug, info};

use crate::error::{TerrainError, WaypointStage};
use crate::placement::{probe_down, random_footprint};
use crate::texture::TerrainImage;

/// How the destination is drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Radius in pixels of the outline circle.
    pub outline_radius: i32,
    /// Radius in pixels of the fill circle drawn over the outline.
    pub fill_radius: i32,
    /// Outline color.
    pub outline: Rgba,
    /// Fill color.
    pub fill: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            outline_radius: 6,
            fill_radius: 5,
            outline: Rgba::BLACK,
            fill: Rgba::RED,
        }
    }
}

/// A selected start/destination pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoints {
    /// Where the player starts, on the terrain surface.
    pub start: Vec3,
    /// The destination, at least `min_distance` from `start`.
    pub end: Vec3,
    /// Draws spent finding the start.
    pub start_attempts: u32,
    /// Draws spent finding the destination.
    pub end_attempts: u32,
}

impl Waypoints {
    pub fn distance(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Bounded rejection sampler for walkable start and destination points.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointSelector {
    /// Smallest allowed start-to-destination distance.
    pub min_distance: f32,
    /// Height the downward probe rays start from.
    pub probe_altitude: f32,
    /// Draws allowed per point before giving up.
    pub max_attempts: u32,
    /// Field values must be strictly above this to be walkable.
    pub walkable_threshold: f32,
    /// How [`WaypointSelector::mark_destination`] draws the destination.
    pub markers: MarkerStyle,
    /// Layers the probe rays collide with.
    pub mask: LayerMask,
}

impl WaypointSelector {
    pub fn from_config(config: &WaypointConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            probe_altitude: config.probe_altitude,
            max_attempts: config.max_attempts,
            walkable_threshold: config.walkable_threshold,
            markers: MarkerStyle {
                outline_radius: config.marker_outline_radius,
                fill_radius: config.marker_fill_radius,
                outline: Rgba(config.marker_outline_color),
                fill: Rgba(config.marker_fill_color),
            },
            mask: LayerMask::only(CollisionLayer::GROUND),
        }
    }

    /// Pick a walkable start, then a walkable destination at least
    /// `min_distance` away from it.
    ///
    /// Each point gets `max_attempts` draws. Points keep the drawn `x`/`z`
    /// and take `y` from the surface hit.
    pub fn select_start_and_end<R: Rng + ?Sized>(
        &self,
        field: &HeightField,
        mesh: &TerrainMesh,
        rays: &dyn RayCaster,
        rng: &mut R,
    ) -> Result<Waypoints, TerrainError> {
        let (start, start_attempts) =
            self.search(field, mesh, rays, rng, WaypointStage::Start, |_| true)?;
        debug!(?start, attempts = start_attempts, "start selected");

        let (end, end_attempts) =
            self.search(field, mesh, rays, rng, WaypointStage::Destination, |p| {
                p.distance(start) >= self.min_distance
            })?;
        info!(
            ?start,
            ?end,
            distance = start.distance(end),
            "waypoints selected"
        );

        Ok(Waypoints {
            start,
            end,
            start_attempts,
            end_attempts,
        })
    }

    fn search<R: Rng + ?Sized>(
        &self,
        field: &HeightField,
        mesh: &TerrainMesh,
        rays: &dyn RayCaster,
        rng: &mut R,
        stage: WaypointStage,
        accept: impl Fn(Vec3) -> bool,
    ) -> Result<(Vec3, u32), TerrainError> {
        let (width, height) = field.dimensions();
        for attempt in 1..=self.max_attempts {
            let (x, z) = random_footprint(rng, width, height);
            let Some(probe) = probe_down(field, mesh, rays, self.mask, x, z, self.probe_altitude)
            else {
                continue;
            };
            if probe.field_value <= self.walkable_threshold {
                continue;
            }
            let point = Vec3::new(x, probe.hit.point.y, z);
            if accept(point) {
                return Ok((point, attempt));
            }
        }
        Err(TerrainError::NoValidSurfaceFound {
            stage,
            attempts: self.max_attempts,
        })
    }

    /// Render the map texture with the destination marked.
    ///
    /// The map is the classified texture mirrored left to right, with an
    /// outline circle and then a fill circle stamped at the destination.
    pub fn mark_destination(&self, colors: &ColorField, filter: FilterMode, end: Vec3) -> TerrainImage {
        let (px, py) = map_coordinates(colors.width(), colors.height(), end);
        let m = self.markers;
        TerrainImage::from_color_field(colors, filter)
            .flip_horizontal()
            .stamp_circle(px, py, m.outline_radius, m.outline)
            .stamp_circle(px, py, m.fill_radius, m.fill)
    }
}

/// Map pixel for a world point on the horizontally mirrored map.
pub fn map_coordinates(width: u32, height: u32, point: Vec3) -> (i64, i64) {
    let (w, h) = (width as f32, height as f32);
    (
        width as i64 - (point.x + w / 2.0).floor() as i64,
        height as i64 - (point.z + h / 2.0).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_mesh::build_terrain_mesh;
    use isle_physics::PhysicsScene;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plateau(width: u32, height: u32, value: f32) -> (HeightField, TerrainMesh, PhysicsScene) {
        let field = HeightField::filled(width, height, value);
        let mesh = build_terrain_mesh(&field, &|t: f32| t, 5.0);
        let mut scene = PhysicsScene::new();
        scene.insert_mesh(&mesh, CollisionLayer::GROUND).unwrap();
        (field, mesh, scene)
    }

    fn selector(min_distance: f32, max_attempts: u32) -> WaypointSelector {
        WaypointSelector {
            min_distance,
            max_attempts,
            ..WaypointSelector::from_config(&WaypointConfig::default())
        }
    }

    #[test]
    fn test_destination_is_far_enough() {
        let (field, mesh, scene) = plateau(40, 40, 0.8);
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let waypoints = selector(15.0, 10_000)
                .select_start_and_end(&field, &mesh, &scene, &mut rng)
                .unwrap();
            assert!(
                waypoints.distance() >= 15.0,
                "seed {seed}: distance {} below minimum",
                waypoints.distance()
            );
            assert!((waypoints.start.y - 4.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_points_are_walkable() {
        // Left half submerged, right half dry.
        let field = HeightField::from_fn(30, 30, |x, _| if x < 15 { 0.1 } else { 0.9 });
        let mesh = build_terrain_mesh(&field, &|t: f32| t, 1.0);
        let mut scene = PhysicsScene::new();
        scene.insert_mesh(&mesh, CollisionLayer::GROUND).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let waypoints = selector(5.0, 10_000)
            .select_start_and_end(&field, &mesh, &scene, &mut rng)
            .unwrap();
        for p in [waypoints.start, waypoints.end] {
            let (col, row) = mesh.world_to_cell(p.x, p.z);
            assert!(*field.get(col, row).unwrap() > 0.3, "point {p:?} is underwater");
        }
    }

    #[test]
    fn test_budget_exhaustion_on_submerged_island() {
        let (field, mesh, scene) = plateau(10, 10, 0.2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = selector(0.0, 50)
            .select_start_and_end(&field, &mesh, &scene, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            TerrainError::NoValidSurfaceFound {
                stage: WaypointStage::Start,
                attempts: 50,
            }
        );
    }

    #[test]
    fn test_budget_exhaustion_on_large_submerged_map_is_fast() {
        let (field, mesh, scene) = plateau(200, 200, 0.2);
        assert_eq!(mesh.triangle_count(), 79_202);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let started = std::time::Instant::now();
        let err = selector(0.0, 1_000)
            .select_start_and_end(&field, &mesh, &scene, &mut rng)
            .unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(
            err,
            TerrainError::NoValidSurfaceFound {
                stage: WaypointStage::Start,
                attempts: 1_000,
            }
        );
        assert!(
            elapsed < std::time::Duration::from_secs(1),
            "1000 rejected draws took {elapsed:?}"
        );
    }

    #[test]
    fn test_unreachable_distance_fails_on_destination() {
        let (field, mesh, scene) = plateau(10, 10, 0.9);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let err = selector(1_000.0, 100)
            .select_start_and_end(&field, &mesh, &scene, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            TerrainError::NoValidSurfaceFound {
                stage: WaypointStage::Destination,
                ..
            }
        ));
    }

    #[test]
    fn test_threshold_is_strict() {
        let (field, mesh, scene) = plateau(10, 10, 0.3);
        let err = selector(0.0, 20)
            .select_start_and_end(&field, &mesh, &scene, &mut ChaCha8Rng::seed_from_u64(4))
            .unwrap_err();
        assert!(matches!(err, TerrainError::NoValidSurfaceFound { .. }));
    }

    #[test]
    fn test_map_coordinates() {
        assert_eq!(map_coordinates(100, 100, Vec3::ZERO), (50, 50));
        assert_eq!(map_coordinates(100, 80, Vec3::new(-49.5, 3.0, 39.2)), (100, 1));
    }

    #[test]
    fn test_mark_destination_stamps_outline_then_fill() {
        let colors = ColorField::filled(40, 40, Rgba::rgb(0, 128, 0));
        let map = selector(0.0, 1).mark_destination(&colors, FilterMode::Point, Vec3::ZERO);
        // Center is filled red, the ring between radius 5 and 6 stays black.
        assert_eq!(map.get_pixel(20, 20), Some(Rgba::RED));
        assert_eq!(map.get_pixel(25, 20), Some(Rgba::BLACK));
        assert_eq!(map.get_pixel(27, 20), Some(Rgba::rgb(0, 128, 0)));
    }

    #[test]
    fn test_mark_destination_near_border_does_not_panic() {
        let colors = ColorField::filled(8, 8, Rgba::WHITE);
        let map = selector(0.0, 1).mark_destination(&colors, FilterMode::Point, Vec3::new(-4.0, 0.0, 3.9));
        assert_eq!(map.dimensions(), (8, 8));
        assert_eq!(map.get_pixel(7, 0), Some(Rgba::RED));
    }
}
