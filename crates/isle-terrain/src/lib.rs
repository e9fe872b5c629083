//! Island terrain synthesis and placement: layered noise, radial falloff,
//! band classification, textures, vegetation scattering, and waypoint selection.

mod classify;
mod combine;
mod error;
mod falloff;
mod generator;
mod noise_field;
mod placement;
mod texture;
mod vegetation;
mod waypoint;

pub use classify::{TerrainBand, TerrainClassifier, classify};
pub use combine::{multiply, scale};
pub use error::{TerrainError, WaypointStage};
pub use falloff::{falloff_value, generate_falloff_map};
pub use generator::{GeneratedTerrain, MeshSink, NullSink, TerrainGenerator};
pub use noise_field::{NoiseField, NoiseParams, OCTAVE_OFFSET_RANGE, generate_noise_map};
pub use placement::PlacementPoint;
pub use texture::TerrainImage;
pub use vegetation::{
    InstanceHost, InstanceId, VEGETATION_TAG, VegetationLayer, VegetationScatterer,
};
pub use waypoint::{MarkerStyle, WaypointSelector, Waypoints, map_coordinates};

pub use isle_config::{ClassifyFallback, DrawMode, FilterMode, TerrainConfig};
pub use isle_field::{ColorField, FieldError, HeightField, Rgba};
