//! Height field to mesh conversion.
//!
//! [`build_terrain_mesh`] is the production path: one vertex per field cell,
//! centered on the origin, with two triangles per interior cell.
//! [`build_preview_mesh`] is a coarser debug layout with an extra row and
//! column of clamped samples.

use glam::{Vec2, Vec3};
use isle_field::HeightField;

use crate::height_curve::HeightCurve;
use crate::terrain_mesh::{MeshVertex, TerrainMesh};

/// Build the production terrain mesh for `field`.
///
/// Vertex `(col, row)` sits at `(top_left_x + col, curve(h) * height_multiplier,
/// top_left_z - row)` where the top-left corner is chosen so the grid is
/// centered on the origin. UVs are `(col / width, row / height)`.
pub fn build_terrain_mesh(
    field: &HeightField,
    curve: &impl HeightCurve,
    height_multiplier: f32,
) -> TerrainMesh {
    let (width, height) = field.dimensions();
    let top_left_x = (width as f32 - 1.0) / -2.0;
    let top_left_z = (height as f32 - 1.0) / 2.0;

    let mut mesh = TerrainMesh::with_grid(width, height, Vec2::new(top_left_x, top_left_z), -1.0);
    mesh.vertices.reserve(field.len());
    let interior = width.saturating_sub(1) as usize * height.saturating_sub(1) as usize;
    mesh.indices.reserve(interior * 6);

    let mut vertex_index = 0u32;
    for (i, &value) in field.cells().iter().enumerate() {
        let col = (i % width as usize) as u32;
        let row = (i / width as usize) as u32;

        mesh.vertices.push(MeshVertex {
            position: Vec3::new(
                top_left_x + col as f32,
                curve.evaluate(value) * height_multiplier,
                top_left_z - row as f32,
            ),
            normal: Vec3::Y,
            uv: Vec2::new(col as f32 / width as f32, row as f32 / height as f32),
        });

        if col + 1 < width && row + 1 < height {
            mesh.add_triangle(vertex_index, vertex_index + width + 1, vertex_index + width);
            mesh.add_triangle(vertex_index + width + 1, vertex_index, vertex_index + 1);
        }
        vertex_index += 1;
    }

    mesh.recalculate_normals();
    mesh
}

/// Build a `(width + 1) × (height + 1)` preview mesh for debug draw modes.
///
/// The extra row and column repeat the last field sample. Vertices are laid
/// out from the origin in +X/+Z and the raw field value is scaled directly,
/// with no height curve.
pub fn build_preview_mesh(field: &HeightField, height_multiplier: f32) -> TerrainMesh {
    let (width, height) = field.dimensions();
    let mut mesh = TerrainMesh::with_grid(width, height, Vec2::ZERO, 1.0);
    if field.is_empty() {
        return mesh;
    }

    for z in 0..=height {
        for x in 0..=width {
            let y = *field.get_clamped(i64::from(x), i64::from(z)) * height_multiplier;
            mesh.vertices.push(MeshVertex {
                position: Vec3::new(x as f32, y, z as f32),
                normal: Vec3::Y,
                uv: Vec2::new(x as f32 / width as f32, z as f32 / height as f32),
            });
        }
    }

    let stride = width + 1;
    for z in 0..height {
        for x in 0..width {
            let v = z * stride + x;
            mesh.add_triangle(v, v + stride, v + 1);
            mesh.add_triangle(v + 1, v + stride, v + stride + 1);
        }
    }

    mesh.recalculate_normals();
    mesh
}
