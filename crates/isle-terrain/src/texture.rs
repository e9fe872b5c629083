//! RGBA textures built from terrain fields.

use isle_config::FilterMode;
use isle_field::{ColorField, HeightField, Rgba};
use tracing::trace;

/// A terrain texture stored as row-major RGBA pixels.
///
/// Pixel `(x, y)` corresponds to field cell `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainImage {
    width: u32,
    height: u32,
    /// Row-major RGBA bytes. Length = `width * height * 4`.
    pixels: Vec<u8>,
    filter: FilterMode,
}

impl TerrainImage {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32, filter: FilterMode) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            filter,
        }
    }

    /// One pixel per classified cell.
    pub fn from_color_field(colors: &ColorField, filter: FilterMode) -> Self {
        let pixels = colors.cells().iter().flat_map(|c| c.0).collect();
        Self {
            width: colors.width(),
            height: colors.height(),
            pixels,
            filter,
        }
    }

    /// Grayscale rendering of a height field, black at 0 and white at 1.
    pub fn from_height_field(field: &HeightField, filter: FilterMode) -> Self {
        let pixels = field
            .cells()
            .iter()
            .flat_map(|&v| Rgba::BLACK.lerp(Rgba::WHITE, v).0)
            .collect();
        Self {
            width: field.width(),
            height: field.height(),
            pixels,
            filter,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image and return its RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let idx = self.offset(i64::from(x), i64::from(y))?;
        let p = &self.pixels[idx..idx + 4];
        Some(Rgba([p[0], p[1], p[2], p[3]]))
    }

    /// Write one pixel. Returns `false` (and writes nothing) when out of bounds.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) -> bool {
        match self.offset(x, y) {
            Some(idx) => {
                self.pixels[idx..idx + 4].copy_from_slice(&color.0);
                true
            }
            None => false,
        }
    }

    /// Mirror left to right.
    pub fn flip_horizontal(&self) -> Self {
        let row_len = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(row_len.max(1)) {
            for px in row.chunks_exact(4).rev() {
                pixels.extend_from_slice(px);
            }
        }
        Self {
            pixels,
            ..self.clone_header()
        }
    }

    /// Mirror top to bottom.
    pub fn flip_vertical(&self) -> Self {
        let row_len = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(row_len.max(1)).rev() {
            pixels.extend_from_slice(row);
        }
        Self {
            pixels,
            ..self.clone_header()
        }
    }

    /// Paint every pixel `(u, v)` with `(cx - u)^2 + (cy - v)^2 < radius^2`.
    ///
    /// Pixels that fall outside the image are skipped.
    pub fn stamp_circle(mut self, cx: i64, cy: i64, radius: i32, color: Rgba) -> Self {
        let r = i64::from(radius.max(0));
        let r2 = r * r;
        let mut clipped = 0u32;
        for v in cy - r..=cy + r {
            for u in cx - r..=cx + r {
                let (dx, dy) = (cx - u, cy - v);
                if dx * dx + dy * dy < r2 && !self.set_pixel(u, v, color) {
                    clipped += 1;
                }
            }
        }
        if clipped > 0 {
            trace!(cx, cy, radius, clipped, "circle clipped at image border");
        }
        self
    }

    fn clone_header(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: Vec::new(),
            filter: self.filter,
        }
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}
