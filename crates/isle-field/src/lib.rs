//! 2D scalar and color grids shared by every stage of island generation.
//!
//! A [`HeightField`] is the common currency between the noise, falloff,
//! combination, meshing, and placement stages. A [`ColorField`] is the
//! classified counterpart used for textures and the map display.

mod color;
mod error;
mod grid;

pub use color::Rgba;
pub use error::FieldError;
pub use grid::{ColorField, Grid, HeightField};
