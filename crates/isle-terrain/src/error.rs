//! Terrain pipeline error types.

use std::fmt;

use isle_field::FieldError;

/// Which point a waypoint search was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaypointStage {
    /// The start point.
    Start,
    /// The destination, which must also be far enough from the start.
    Destination,
}

impl fmt::Display for WaypointStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Errors surfaced by the terrain pipeline.
///
/// Numeric edge cases (degenerate fields, inverted bounds, off-image pixels)
/// are normalized silently and never show up here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// Fields (or a field and its mesh) with different dimensions were combined.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A bounded placement search ran out of attempts.
    #[error("no valid {stage} point found after {attempts} attempts")]
    NoValidSurfaceFound {
        /// The point being searched for.
        stage: WaypointStage,
        /// Number of draws spent.
        attempts: u32,
    },
}
