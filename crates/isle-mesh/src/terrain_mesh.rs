//! Terrain mesh data structure holding vertices and triangle indices.

use glam::{Vec2, Vec3};

/// A single vertex in a terrain mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    /// World-space position.
    pub position: Vec3,
    /// Smoothed vertex normal, recomputed from the triangle set.
    pub normal: Vec3,
    /// Texture coordinates in `[0, 1)`.
    pub uv: Vec2,
}

/// The output of a meshing pass over a height field.
///
/// Contains vertex data and triangle indices ready for a render or collision host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// `(width, height)` of the field this mesh was built from.
    pub grid: (u32, u32),
    /// World position of the vertex for cell `(0, 0)`.
    pub origin: Vec2,
    /// World-space Z step per field row (`-1` for production meshes, `+1` for previews).
    pub row_step: f32,
}

impl TerrainMesh {
    /// Creates an empty mesh for a `width × height` grid.
    pub fn with_grid(width: u32, height: u32, origin: Vec2, row_step: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            grid: (width, height),
            origin,
            row_step,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `i`.
    pub fn triangle(&self, i: usize) -> Option<[u32; 3]> {
        let tri = self.indices.get(i * 3..i * 3 + 3)?;
        Some([tri[0], tri[1], tri[2]])
    }

    /// Positions of every vertex, in vertex order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Returns `true` if every index addresses an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len() as u64;
        self.indices.iter().all(|&i| u64::from(i) < count)
    }

    /// Push a triangle by vertex indices.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Map a world-space point to the nearest field cell, clamped into the grid.
    ///
    /// This is the inverse of vertex placement, so a hit anywhere on the
    /// surface resolves to the cell whose vertex is closest in X/Z.
    pub fn world_to_cell(&self, x: f32, z: f32) -> (u32, u32) {
        let (width, height) = self.grid;
        let col = (x - self.origin.x).round();
        let row = ((z - self.origin.y) / self.row_step).round();
        let clamp = |v: f32, len: u32| -> u32 {
            if !v.is_finite() || v <= 0.0 || len == 0 {
                0
            } else {
                (v as u32).min(len - 1)
            }
        };
        (clamp(col, width), clamp(row, height))
    }

    /// Recompute vertex normals as the area-weighted sum of adjacent face normals.
    ///
    /// Vertices that belong to no triangle, or whose faces cancel out, get `+Y`.
    pub fn recalculate_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(pa), Some(pb), Some(pc)) = (
                self.vertices.get(a),
                self.vertices.get(b),
                self.vertices.get(c),
            ) else {
                continue;
            };
            // Unnormalized cross product: magnitude is twice the triangle area.
            let face = (pb.position - pa.position).cross(pc.position - pa.position);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = sum.try_normalize().unwrap_or(Vec3::Y);
        }
    }
}
