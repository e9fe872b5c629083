//! A Rapier-backed collision scene implementing [`RayCaster`].
//!
//! Every collider is a static triangle mesh with no parent body. Rapier's
//! broad phase keeps them in a BVH, so a ray cast touches only the triangles
//! near its path.

use glam::Vec3;
use isle_mesh::TerrainMesh;
use rapier3d::prelude::*;
use tracing::debug;

use crate::error::PhysicsError;
use crate::raycast::{self, CollisionLayer, LayerMask, RayCaster, RayHit};

/// Indexed triangle geometry waiting to become a Rapier trimesh.
#[derive(Clone, Debug, Default)]
pub struct TriangleCollider {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl TriangleCollider {
    /// Build a collider from explicit triangles.
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let mut vertices = Vec::with_capacity(triangles.len() * 3);
        let mut indices = Vec::with_capacity(triangles.len());
        for tri in triangles {
            let base = vertices.len() as u32;
            vertices.extend(tri);
            indices.push([base, base + 1, base + 2]);
        }
        Self { vertices, indices }
    }

    /// Build a collider from a terrain mesh, sharing its vertices.
    /// Triangles with out-of-range indices are skipped.
    pub fn from_mesh(mesh: &TerrainMesh) -> Self {
        let vertices: Vec<Vec3> = mesh.vertices.iter().map(|v| v.position).collect();
        let count = vertices.len() as u32;
        let indices = mesh
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .filter(|tri| tri.iter().all(|&i| i < count))
            .collect();
        Self { vertices, indices }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    fn into_builder(self) -> Result<ColliderBuilder, PhysicsError> {
        let triangles = self.indices.len();
        let points = self
            .vertices
            .iter()
            .map(|p| Vector::new(p.x, p.y, p.z))
            .collect();
        ColliderBuilder::trimesh(points, self.indices).map_err(|e| PhysicsError::InvalidMesh {
            triangles,
            reason: format!("{e:?}"),
        })
    }
}

/// Static colliders on collision layers, queried through Rapier.
pub struct PhysicsScene {
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    next_handle: u32,
}

impl PhysicsScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            next_handle: 0,
        }
    }

    /// Register a collider on `layer` and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::EmptyCollider`] for geometry without triangles
    /// and [`PhysicsError::InvalidMesh`] if Rapier rejects it.
    pub fn insert(
        &mut self,
        collider: TriangleCollider,
        layer: CollisionLayer,
    ) -> Result<raycast::ColliderHandle, PhysicsError> {
        let triangles = collider.triangle_count();
        if triangles == 0 {
            return Err(PhysicsError::EmptyCollider {
                layer: layer.index(),
            });
        }

        let handle = raycast::ColliderHandle(self.next_handle);
        let built = collider
            .into_builder()?
            .collision_groups(InteractionGroups::all().with_memberships(layer_group(layer)))
            .user_data(u128::from(handle.0))
            .build();
        self.collider_set.insert(built);
        self.next_handle += 1;
        self.refresh();

        debug!(
            handle = handle.0,
            layer = layer.index(),
            triangles,
            "collider inserted"
        );
        Ok(handle)
    }

    /// Register a terrain mesh as a collider on `layer`.
    ///
    /// # Errors
    ///
    /// See [`PhysicsScene::insert`].
    pub fn insert_mesh(
        &mut self,
        mesh: &TerrainMesh,
        layer: CollisionLayer,
    ) -> Result<raycast::ColliderHandle, PhysicsError> {
        self.insert(TriangleCollider::from_mesh(mesh), layer)
    }

    /// Number of registered colliders.
    pub fn len(&self) -> usize {
        self.collider_set.len()
    }

    /// Returns `true` if no colliders are registered.
    pub fn is_empty(&self) -> bool {
        self.collider_set.len() == 0
    }

    // One zero-gravity step brings the broad-phase BVH up to date.
    fn refresh(&mut self) {
        self.physics_pipeline.step(
            Vector::new(0.0, 0.0, 0.0),
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::new()
    }
}

fn layer_group(layer: CollisionLayer) -> Group {
    Group::from_bits_truncate(1 << layer.index())
}

impl RayCaster for PhysicsScene {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let filter = QueryFilter::default()
            .groups(InteractionGroups::all().with_filter(Group::from_bits_truncate(mask.0)));
        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.rigid_body_set,
            &self.collider_set,
            filter,
        );

        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );
        let (hit, intersection) =
            query.cast_ray_and_get_normal(&ray, max_distance.min(f32::MAX), true)?;
        let collider = self.collider_set.get(hit)?;

        let distance = intersection.time_of_impact;
        let n = intersection.normal;
        Some(RayHit {
            point: origin + dir * distance,
            normal: Vec3::new(n.x, n.y, n.z),
            distance,
            collider: raycast::ColliderHandle(collider.user_data as u32),
        })
    }
}
