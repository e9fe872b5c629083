//! Row-major 2D grids.

use crate::color::Rgba;
use crate::error::FieldError;

/// A dense, row-major `width × height` grid. Cell `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

/// Grid of normalized elevation-like scalars, nominally in `[0, 1]`.
pub type HeightField = Grid<f32>;

/// Grid of classified per-cell colors.
pub type ColorField = Grid<Rgba>;

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::BufferLength`] if `cells.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Result<Self, FieldError> {
        if cells.len() != width as usize * height as usize {
            return Err(FieldError::BufferLength {
                width,
                height,
                len: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    /// Returns the cell at `(x, y)` with both coordinates clamped into the grid.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty.
    pub fn get_clamped(&self, x: i64, y: i64) -> &T {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        &self.cells[self.index(cx, cy)]
    }

    /// Overwrite the cell at `(x, y)`. Returns `false` when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = value;
        true
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Mutable row-major view of all cells.
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Returns `true` if `other` has the same dimensions.
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fail with [`FieldError::DimensionMismatch`] unless `other` has the same dimensions.
    pub fn ensure_same_shape<U>(&self, other: &Grid<U>) -> Result<(), FieldError> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(FieldError::DimensionMismatch {
                expected: self.dimensions(),
                found: other.dimensions(),
            })
        }
    }

    /// Produce a new grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Grid<f32> {
    /// Smallest and largest cell values, or `None` for an empty field.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.cells.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Returns `true` if every cell is finite and within `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        self.cells
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}
