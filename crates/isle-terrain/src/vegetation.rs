//! Vegetation scattering and instance bookkeeping.
//!
//! [`VegetationScatterer`] makes a fixed number of random placement attempts
//! and keeps the ones that land on dry, gentle terrain. [`VegetationLayer`]
//! owns the spawned instances so a new pass can remove the previous one.

use glam::Vec3;
use isle_config::VegetationConfig;
use isle_field::HeightField;
use isle_mesh::TerrainMesh;
use isle_physics::{ColliderHandle, CollisionLayer, LayerMask, RayCaster};
use rand::Rng;
use tracing::{debug, trace};

use crate::error::TerrainError;
use crate::placement::{PlacementPoint, probe_down, random_footprint};

/// Tag attached to every spawned vegetation instance.
pub const VEGETATION_TAG: &str = "Vegetation";

/// Identifier of an instance living in an [`InstanceHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// The scene that owns spawned instances.
pub trait InstanceHost {
    /// Spawn an instance at `position` carrying `tag`.
    fn spawn(&mut self, position: Vec3, tag: &str) -> InstanceId;
    /// Remove an instance. Returns `false` if it no longer exists.
    fn despawn(&mut self, id: InstanceId) -> bool;
    /// Every live instance carrying `tag`.
    fn tagged(&self, tag: &str) -> Vec<InstanceId>;
}

/// Rejection sampler for vegetation placements.
#[derive(Clone, Debug, PartialEq)]
pub struct VegetationScatterer {
    /// Placement attempts per pass, not the number of instances.
    pub density: u32,
    /// Lowest accepted surface height in world units.
    pub min_height: f32,
    /// Highest accepted surface height; rays start here.
    pub max_height: f32,
    /// Steepest accepted surface, in degrees from horizontal.
    pub max_slope_degrees: f32,
    /// Field values at or below this are under water.
    pub submersion_threshold: f32,
    /// Layers the placement rays collide with.
    pub mask: LayerMask,
}

impl VegetationScatterer {
    pub fn from_config(config: &VegetationConfig) -> Self {
        Self {
            density: config.density,
            min_height: config.min_height,
            max_height: config.max_height,
            max_slope_degrees: config.max_slope_degrees,
            submersion_threshold: config.submersion_threshold,
            mask: LayerMask::only(CollisionLayer::GROUND),
        }
    }

    /// Make `density` placement attempts and return the accepted points.
    ///
    /// Each attempt casts down from `max_height` at a uniform `(x, z)` inside
    /// the field footprint. An attempt is dropped when the ray misses, the
    /// cell below is submerged, the hit belongs to another collider, the
    /// slope is too steep, or the hit is below `min_height`. Failed attempts
    /// are not retried.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        field: &HeightField,
        mesh: &TerrainMesh,
        rays: &dyn RayCaster,
        terrain: ColliderHandle,
        rng: &mut R,
    ) -> Result<Vec<PlacementPoint>, TerrainError> {
        let (width, height) = field.dimensions();
        if mesh.grid != (width, height) {
            return Err(isle_field::FieldError::DimensionMismatch {
                expected: (width, height),
                found: mesh.grid,
            }
            .into());
        }

        let max_slope = self.max_slope_degrees.to_radians();
        let mut points = Vec::new();
        let mut rejected = Rejections::default();

        for _ in 0..self.density {
            let (x, z) = random_footprint(rng, width, height);
            let Some(probe) = probe_down(field, mesh, rays, self.mask, x, z, self.max_height)
            else {
                rejected.miss += 1;
                continue;
            };
            if probe.field_value < self.submersion_threshold {
                rejected.submerged += 1;
                continue;
            }
            if probe.hit.collider != terrain {
                rejected.foreign += 1;
                continue;
            }
            if probe.hit.normal.angle_between(Vec3::Y) > max_slope {
                rejected.steep += 1;
                continue;
            }
            if probe.hit.point.y < self.min_height {
                rejected.low += 1;
                continue;
            }
            points.push(PlacementPoint {
                position: probe.hit.point,
                normal: probe.hit.normal,
                field_value: probe.field_value,
                cell: probe.cell,
            });
        }

        debug!(
            attempts = self.density,
            placed = points.len(),
            miss = rejected.miss,
            submerged = rejected.submerged,
            foreign = rejected.foreign,
            steep = rejected.steep,
            low = rejected.low,
            "vegetation scattered"
        );
        Ok(points)
    }
}

#[derive(Default)]
struct Rejections {
    miss: u32,
    submerged: u32,
    foreign: u32,
    steep: u32,
    low: u32,
}

/// The set of vegetation instances spawned by the current pass.
#[derive(Debug, Default)]
pub struct VegetationLayer {
    instances: Vec<InstanceId>,
}

impl VegetationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked instances, in spawn order.
    pub fn instances(&self) -> &[InstanceId] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Despawn every tracked instance, then any tagged instance left behind.
    ///
    /// Returns the number of instances removed.
    pub fn clear(&mut self, host: &mut dyn InstanceHost) -> usize {
        let mut removed = 0;
        for id in self.instances.drain(..) {
            if host.despawn(id) {
                removed += 1;
            }
        }
        let stragglers = host.tagged(VEGETATION_TAG);
        if !stragglers.is_empty() {
            trace!(count = stragglers.len(), "sweeping untracked vegetation");
        }
        for id in stragglers {
            if host.despawn(id) {
                removed += 1;
            }
        }
        removed
    }

    /// Replace the current instances with one per point.
    pub fn populate(&mut self, host: &mut dyn InstanceHost, points: &[PlacementPoint]) -> usize {
        self.clear(host);
        self.instances
            .extend(points.iter().map(|p| host.spawn(p.position, VEGETATION_TAG)));
        self.instances.len()
    }
}
