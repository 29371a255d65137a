//! Square grid of optional cell values.
//!
//! Cell `(i, j)` pairs the i-th x coordinate with the j-th y coordinate.
//! Storage is row-major by y, so [`SurfaceGrid::row`] returns the values
//! along x for a fixed y, matching the usual heatmap layout `z[j][i]`.

use super::error::{LocalCorrError, Result};

/// Square `size × size` grid where `None` marks an undefined cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurfaceGrid {
    size: usize,
    cells: Vec<Option<f64>>,
}

impl SurfaceGrid {
    /// Grid with every cell undefined.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build from row-major (by y) cells.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<Option<f64>>) -> Result<Self> {
        if cells.len() != size * size {
            return Err(LocalCorrError::invalid_parameter(
                "cells",
                format!("expected {} cells, got {}", size * size, cells.len()),
            ));
        }
        Ok(Self { size, cells })
    }

    /// Build from heatmap rows `rows[j][i]`.
    pub fn from_rows(rows: &[Vec<Option<f64>>]) -> Result<Self> {
        let size = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != size) {
            return Err(LocalCorrError::ShapeMismatch {
                expected: size,
                actual: bad.len(),
            });
        }
        Ok(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.size && j < self.size);
        j * self.size + i
    }

    /// Value at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells[self.offset(i, j)]
    }

    /// Set the value at `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Option<f64>) {
        let k = self.offset(i, j);
        self.cells[k] = value;
    }

    /// All cells, row-major by y.
    #[inline]
    pub fn cells(&self) -> &[Option<f64>] {
        &self.cells
    }

    /// Values along x for the j-th y coordinate.
    #[inline]
    pub fn row(&self, j: usize) -> &[Option<f64>] {
        &self.cells[j * self.size..(j + 1) * self.size]
    }

    /// Heatmap rows `rows[j][i]`.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.size).map(|j| self.row(j).to_vec()).collect()
    }

    /// Iterate `(i, j, value)` over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Option<f64>)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, v)| (k % size, k / size, *v))
    }

    /// Iterate over defined values only.
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|v| *v)
    }

    /// Number of defined cells.
    pub fn count_defined(&self) -> usize {
        self.cells.iter().filter(|v| v.is_some()).count()
    }

    /// Fail with `ShapeMismatch` unless `other` has the same side length.
    pub fn ensure_same_shape(&self, other: &SurfaceGrid) -> Result<()> {
        if self.size != other.size {
            return Err(LocalCorrError::ShapeMismatch {
                expected: self.size,
                actual: other.size,
            });
        }
        Ok(())
    }
}
