//! Collider construction errors.

/// Errors raised while registering collision geometry.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// The geometry has no triangles to collide with.
    #[error("collider on layer {layer} has no triangles")]
    EmptyCollider {
        /// Layer index the collider was meant for.
        layer: u8,
    },
    /// Rapier refused to build a triangle mesh from the geometry.
    #[error("invalid collision mesh with {triangles} triangles: {reason}")]
    InvalidMesh {
        /// Triangle count of the rejected geometry.
        triangles: usize,
        /// Rapier's description of the problem.
        reason: String,
    },
}
