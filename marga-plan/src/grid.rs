//! Speed grid storage.
//!
//! A speed grid is a row-major raster of unsigned 8-bit terrain values:
//! 0 is impassable, 1-255 is traversable with higher values being faster
//! (cheaper) to cross. The grid is read-only during a search; stages
//! that need to modify terrain (corridor masking, obstacle inflation)
//! work on independent owned copies.

use crate::error::{PlanError, Result};
use crate::geometry::GridPoint;

/// Row-major raster of terrain speed values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl SpeedGrid {
    /// Create a grid filled with a uniform speed value.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build a grid from raw row-major bytes.
    ///
    /// Fails when the dimensions are empty or do not match the buffer.
    pub fn from_raw(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanError::InvalidGrid(format!(
                "empty dimensions {}x{}",
                width, height
            )));
        }
        if cells.len() != width * height {
            return Err(PlanError::InvalidGrid(format!(
                "buffer of {} bytes does not match {}x{}",
                cells.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the point lies inside the grid bounds.
    #[inline]
    pub fn contains(&self, p: GridPoint) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Speed value at a point. Out-of-bounds reads are impassable (0).
    #[inline]
    pub fn get(&self, p: GridPoint) -> u8 {
        if !self.contains(p) {
            return 0;
        }
        self.cells[p.y as usize * self.width + p.x as usize]
    }

    /// Set the speed value at a point. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, p: GridPoint, value: u8) {
        if self.contains(p) {
            self.cells[p.y as usize * self.width + p.x as usize] = value;
        }
    }

    /// Whether the cell is traversable (non-zero speed).
    #[inline]
    pub fn is_passable(&self, p: GridPoint) -> bool {
        self.get(p) != 0
    }

    /// Flat node-table index for a point inside the grid.
    #[inline]
    pub(crate) fn index(&self, p: GridPoint) -> usize {
        p.y as usize * self.width + p.x as usize
    }

    /// Point corresponding to a flat node-table index.
    #[inline]
    pub(crate) fn point(&self, index: usize) -> GridPoint {
        GridPoint::new((index % self.width) as i32, (index / self.width) as i32)
    }
}
