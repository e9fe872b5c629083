//! Vertical surface probes shared by vegetation and waypoint sampling.

use glam::Vec3;
use isle_field::HeightField;
use isle_mesh::TerrainMesh;
use isle_physics::{LayerMask, RayCaster, RayHit};
use rand::Rng;

/// A validated point on the terrain surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPoint {
    /// World-space position on the surface.
    pub position: Vec3,
    /// Surface normal at `position`.
    pub normal: Vec3,
    /// Field value of the cell under the point.
    pub field_value: f32,
    /// Field cell under the point.
    pub cell: (u32, u32),
}

/// Result of one straight-down probe.
pub(crate) struct Probe {
    pub hit: RayHit,
    pub cell: (u32, u32),
    pub field_value: f32,
}

/// Draw `(x, z)` uniformly from `[-w/2, w/2) x [-h/2, h/2)`.
pub(crate) fn random_footprint<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> (f32, f32) {
    (
        half_open(rng, width as f32 / 2.0),
        half_open(rng, height as f32 / 2.0),
    )
}

fn half_open<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    if half > 0.0 {
        rng.random_range(-half..half)
    } else {
        0.0
    }
}

/// Cast straight down from `(x, altitude, z)` and look up the cell under the hit.
pub(crate) fn probe_down(
    field: &HeightField,
    mesh: &TerrainMesh,
    rays: &dyn RayCaster,
    mask: LayerMask,
    x: f32,
    z: f32,
    altitude: f32,
) -> Option<Probe> {
    let hit = rays.cast(Vec3::new(x, altitude, z), Vec3::NEG_Y, f32::INFINITY, mask)?;
    let cell = mesh.world_to_cell(hit.point.x, hit.point.z);
    let field_value = *field.get(cell.0, cell.1)?;
    Some(Probe {
        hit,
        cell,
        field_value,
    })
}
