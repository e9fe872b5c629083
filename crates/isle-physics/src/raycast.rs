//! Ray casting seam: layers, collider handles, and the [`RayCaster`] trait.

use glam::Vec3;

/// Opaque identifier of a collider registered with a ray caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub u32);

/// A single collision layer, `0..32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionLayer(u8);

impl CollisionLayer {
    /// Layer used by everything that is not explicitly assigned.
    pub const DEFAULT: Self = Self(0);
    /// Layer carrying walkable terrain.
    pub const GROUND: Self = Self(3);

    /// Create a layer. Values above 31 wrap into range.
    pub const fn new(index: u8) -> Self {
        Self(index % 32)
    }

    /// The layer index.
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// A set of collision layers, one bit per layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Matches nothing.
    pub const NONE: Self = Self(0);

    /// Mask containing only `layer`.
    pub const fn only(layer: CollisionLayer) -> Self {
        Self(1 << layer.0)
    }

    /// Returns `true` if `layer` is part of the mask.
    pub const fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    /// Union of two masks.
    pub const fn with(self, layer: CollisionLayer) -> Self {
        Self(self.0 | (1 << layer.0))
    }
}

/// Result of a successful ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Surface normal at the hit point (unit length).
    pub normal: Vec3,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderHandle,
}

/// Anything that can answer "what does this ray hit first?".
pub trait RayCaster {
    /// Cast a ray and return the nearest hit on a collider whose layer is in `mask`.
    ///
    /// `direction` need not be normalized; implementations normalize it.
    /// Returns `None` if the direction is degenerate or nothing is hit within
    /// `max_distance`.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask)
    -> Option<RayHit>;
}
