//! Terrain meshing: height fields to vertex/index meshes, height curves, and normals.

pub mod builder;
pub mod height_curve;
pub mod terrain_mesh;

pub use builder::{build_preview_mesh, build_terrain_mesh};
pub use height_curve::{HeightCurve, KeyframeCurve};
pub use terrain_mesh::{MeshVertex, TerrainMesh};
