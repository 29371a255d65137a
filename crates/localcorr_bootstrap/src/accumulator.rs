//! Per-cell replicate aggregation.
//!
//! Replicate correlations are folded into running (count, mean, M2)
//! moments with Welford's update, so memory stays O(size²) regardless of
//! the iteration count. Partial grids from parallel workers combine with
//! Chan's pairwise merge.

use localcorr_core::SurfaceGrid;

/// Running moments of one cell's replicate collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
}

impl CellAccumulator {
    /// Append one replicate.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine with another accumulator.
    pub fn merge(&mut self, other: &CellAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;
        let delta = other.mean - self.mean;
        self.mean += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count += other.count;
    }

    /// Number of replicates.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the replicates, if any.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample standard deviation (denominator `count - 1`).
    #[inline]
    pub fn sample_std(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some((self.m2.max(0.0) / (self.count - 1) as f64).sqrt())
    }
}

/// Replicate accumulators for every cell of a square grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateGrid {
    size: usize,
    cells: Vec<CellAccumulator>,
}

impl ReplicateGrid {
    /// Empty accumulators for a `size × size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellAccumulator::default(); size * size],
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Append every defined cell of `surface`.
    pub fn record(&mut self, surface: &SurfaceGrid) {
        debug_assert_eq!(surface.size(), self.size);
        for (acc, value) in self.cells.iter_mut().zip(surface.cells()) {
            if let Some(v) = value {
                acc.push(*v);
            }
        }
    }

    /// Combine with another grid of the same size.
    pub fn merge(&mut self, other: &ReplicateGrid) {
        debug_assert_eq!(other.size, self.size);
        for (a, b) in self.cells.iter_mut().zip(&other.cells) {
            a.merge(b);
        }
    }

    /// Accumulator at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &CellAccumulator {
        &self.cells[j * self.size + i]
    }

    /// Accumulators, row-major by y.
    #[inline]
    pub fn cells(&self) -> &[CellAccumulator] {
        &self.cells
    }
}
