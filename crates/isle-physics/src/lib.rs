//! Ray intersection against collidable terrain.
//!
//! The placement stages only talk to the [`RayCaster`] trait, so any physics
//! host can stand in. [`PhysicsScene`] answers it with Rapier triangle-mesh
//! colliders and is used by the CLI and by tests.

mod error;
mod raycast;
mod scene;

pub use error::PhysicsError;
pub use raycast::{ColliderHandle, CollisionLayer, LayerMask, RayCaster, RayHit};
pub use scene::{PhysicsScene, TriangleCollider};
