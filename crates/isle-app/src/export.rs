//! File export: PNG textures, Wavefront OBJ mesh, RON placements.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use isle_config::DrawMode;
use isle_mesh::TerrainMesh;
use isle_terrain::{TerrainImage, Waypoints};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

pub const TEXTURE_FILE: &str = "texture.png";
pub const MAP_FILE: &str = "map.png";
pub const MESH_FILE: &str = "terrain.obj";
pub const PLACEMENTS_FILE: &str = "placements.ron";

/// Everything placed on the terrain by one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placements {
    pub seed: u64,
    pub draw_mode: DrawMode,
    pub start: Option<[f32; 3]>,
    pub destination: Option<[f32; 3]>,
    pub vegetation: Vec<[f32; 3]>,
}

impl Placements {
    pub fn new(
        seed: u64,
        draw_mode: DrawMode,
        waypoints: Option<&Waypoints>,
        vegetation: impl IntoIterator<Item = glam::Vec3>,
    ) -> Self {
        Self {
            seed,
            draw_mode,
            start: waypoints.map(|w| w.start.to_array()),
            destination: waypoints.map(|w| w.end.to_array()),
            vegetation: vegetation.into_iter().map(|p| p.to_array()).collect(),
        }
    }
}

/// Encode `image` as an RGBA PNG at `path`.
pub fn write_png(path: &Path, image: &TerrainImage) -> Result<(), AppError> {
    let (width, height) = image.dimensions();
    let buffer = image::RgbaImage::from_raw(width, height, image.pixels().to_vec())
        .ok_or(AppError::PixelBuffer { width, height })?;
    buffer.save(path).map_err(|source| AppError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), width, height, "png written");
    Ok(())
}

/// Render `mesh` as Wavefront OBJ text with positions, UVs, and normals.
pub fn mesh_to_obj(mesh: &TerrainMesh) -> String {
    let mut out = String::with_capacity(mesh.vertex_count() * 64 + mesh.triangle_count() * 24);
    let _ = writeln!(out, "# isle terrain {}x{}", mesh.grid.0, mesh.grid.1);
    for v in &mesh.vertices {
        let _ = writeln!(out, "v {} {} {}", v.position.x, v.position.y, v.position.z);
    }
    for v in &mesh.vertices {
        let _ = writeln!(out, "vt {} {}", v.uv.x, v.uv.y);
    }
    for v in &mesh.vertices {
        let _ = writeln!(out, "vn {} {} {}", v.normal.x, v.normal.y, v.normal.z);
    }
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        let _ = writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
    }
    out
}

pub fn write_obj(path: &Path, mesh: &TerrainMesh) -> Result<(), AppError> {
    write_text(path, &mesh_to_obj(mesh))
}

pub fn write_placements(path: &Path, placements: &Placements) -> Result<(), AppError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .separate_tuple_members(false)
        .enumerate_arrays(false);
    let text = ron::ser::to_string_pretty(placements, pretty)?;
    write_text(path, &text)
}

/// Create `dir` if needed and return the path of `file` inside it.
pub fn output_path(dir: &Path, file: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|source| AppError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.join(file))
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    std::fs::write(path, text).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use isle_field::{HeightField, Rgba};
    use isle_mesh::build_terrain_mesh;
    use isle_terrain::FilterMode;

    #[test]
    fn test_obj_has_one_based_faces() {
        let field = HeightField::filled(2, 2, 0.5);
        let mesh = build_terrain_mesh(&field, &|t: f32| t, 2.0);
        let obj = mesh_to_obj(&mesh);
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 2);
        assert!(obj.contains("f 1/1/1 4/4/4 3/3/3"));
        assert!(!obj.contains(" 0/0/0"));
    }

    #[test]
    fn test_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), TEXTURE_FILE).unwrap();
        let mut image = TerrainImage::new(3, 2, FilterMode::Point);
        image.set_pixel(2, 1, Rgba::RED);
        write_png(&path, &image).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, Rgba::RED.0);
    }

    #[test]
    fn test_placements_ron_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(&dir.path().join("nested"), PLACEMENTS_FILE).unwrap();
        let waypoints = Waypoints {
            start: Vec3::new(1.0, 2.0, 3.0),
            end: Vec3::new(-4.0, 5.0, 6.0),
            start_attempts: 1,
            end_attempts: 3,
        };
        let placements = Placements::new(9, DrawMode::Mesh, Some(&waypoints), [Vec3::ONE]);
        write_placements(&path, &placements).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Placements = ron::from_str(&text).unwrap();
        assert_eq!(back, placements);
        assert_eq!(back.destination, Some([-4.0, 5.0, 6.0]));
    }
}
