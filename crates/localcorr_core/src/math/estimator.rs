//! Kernel-weighted local correlation and density.
//!
//! For grid cell `(i, j)` every sample `k` receives the Gaussian weight
//!
//! ```text
//! w_k = exp(-0.5·((x_k - gx_i)/hx)²) · exp(-0.5·((y_k - gy_j)/hy)²)
//! ```
//!
//! and the cell's correlation is the Pearson correlation under the
//! probability mass `w_k / W`, where `W = Σ w_k`. The kernel is separable,
//! so the per-axis factors are tabulated once per grid coordinate and the
//! full evaluation costs O(size·n) exponentials plus O(size²·n) products.
//!
//! ## Null Cells
//!
//! A cell is `None` (in both the correlation and density grids) when
//! `W < min_weight` or either weighted variance is not positive.
//!
//! ## Memory
//!
//! The two kernel tables hold `size·n` values each. Callers that evaluate
//! many grids of the same shape (the bootstrap) should keep a
//! [`KernelWorkspace`] and call [`LocalCorrelationEstimator::estimate_with`]
//! so the tables are allocated once rather than per evaluation.
//!
//! ## Determinism
//!
//! No randomness is involved and the per-cell reduction order is fixed, so
//! repeated calls return bit-identical grids. The `parallel` feature only
//! distributes rows across threads; it does not change any arithmetic.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::grid::Grid;
use crate::types::{Bandwidth, Dataset, LocalCorrError, Result, SurfaceGrid};

/// Default minimum total kernel weight for a cell to be defined.
pub const DEFAULT_MIN_WEIGHT: f64 = 0.1;

/// Unnormalised Gaussian kernel `exp(-0.5·u²)`.
#[inline]
pub fn gaussian_kernel(u: f64) -> f64 {
    (-0.5 * u * u).exp()
}

/// Result for a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellEstimate {
    /// Local correlation in [-1, 1]
    pub correlation: f64,
    /// Relative density `W / n`
    pub density: f64,
}

/// Correlation and density grids evaluated on the same geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalCorrelationSurface {
    /// Local correlation per cell
    pub correlation: SurfaceGrid,
    /// Relative density per cell; `None` exactly where `correlation` is `None`
    pub density: SurfaceGrid,
}

/// Local Gaussian correlation estimator.
///
/// # Examples
///
/// ```
/// use localcorr_core::math::estimator::LocalCorrelationEstimator;
/// use localcorr_core::types::{Bandwidth, Dataset};
///
/// let xs: Vec<f64> = (0..20).map(f64::from).collect();
/// let ys: Vec<f64> = xs.iter().map(|x| -2.0 * x).collect();
/// let dataset = Dataset::new(xs, ys).unwrap();
///
/// let estimator = LocalCorrelationEstimator::default();
/// let bw = Bandwidth::new(5.0, 10.0).unwrap();
/// let cell = estimator.estimate_cell(&dataset, 10.0, -20.0, bw).unwrap();
/// assert!((cell.correlation + 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalCorrelationEstimator {
    min_weight: f64,
}

impl Default for LocalCorrelationEstimator {
    fn default() -> Self {
        Self {
            min_weight: DEFAULT_MIN_WEIGHT,
        }
    }
}

impl LocalCorrelationEstimator {
    /// Create an estimator with a custom support threshold.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `min_weight` is finite and ≥ 0.
    pub fn new(min_weight: f64) -> Result<Self> {
        if !min_weight.is_finite() || min_weight < 0.0 {
            return Err(LocalCorrError::invalid_parameter(
                "min_weight",
                format!("must be finite and >= 0, got {}", min_weight),
            ));
        }
        Ok(Self { min_weight })
    }

    /// Minimum total weight for a defined cell.
    #[inline]
    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Evaluate a single cell centred at `(gx, gy)`.
    pub fn estimate_cell(
        &self,
        dataset: &Dataset,
        gx: f64,
        gy: f64,
        bandwidth: Bandwidth,
    ) -> Option<CellEstimate> {
        let (hx, hy) = (bandwidth.hx(), bandwidth.hy());
        let kx: Vec<f64> = dataset
            .xs()
            .iter()
            .map(|&x| gaussian_kernel((x - gx) / hx))
            .collect();
        let ky: Vec<f64> = dataset
            .ys()
            .iter()
            .map(|&y| gaussian_kernel((y - gy) / hy))
            .collect();
        self.reduce_cell(dataset, &kx, &ky)
    }

    /// Evaluate the full grid.
    ///
    /// Datasets with no samples produce an all-`None` surface.
    pub fn estimate(
        &self,
        dataset: &Dataset,
        grid: &Grid,
        bandwidth: Bandwidth,
    ) -> LocalCorrelationSurface {
        self.estimate_with(dataset, grid, bandwidth, &mut KernelWorkspace::new())
    }

    /// As [`estimate`](Self::estimate), tabulating kernels into `workspace`.
    ///
    /// The result does not depend on what `workspace` held before.
    pub fn estimate_with(
        &self,
        dataset: &Dataset,
        grid: &Grid,
        bandwidth: Bandwidth,
        workspace: &mut KernelWorkspace,
    ) -> LocalCorrelationSurface {
        let size = grid.size();
        workspace.x.fill(dataset.xs(), grid.x(), bandwidth.hx());
        workspace.y.fill(dataset.ys(), grid.y(), bandwidth.hy());
        let (kx, ky) = (&workspace.x, &workspace.y);

        let eval_row = |j: usize| -> Vec<Option<CellEstimate>> {
            (0..size)
                .map(|i| self.reduce_cell(dataset, kx.row(i), ky.row(j)))
                .collect()
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<Option<CellEstimate>>> = (0..size).into_par_iter().map(eval_row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<Option<CellEstimate>>> = (0..size).map(eval_row).collect();

        let mut correlation = SurfaceGrid::empty(size);
        let mut density = SurfaceGrid::empty(size);
        for (j, row) in rows.into_iter().enumerate() {
            for (i, cell) in row.into_iter().enumerate() {
                if let Some(cell) = cell {
                    correlation.set(i, j, Some(cell.correlation));
                    density.set(i, j, Some(cell.density));
                }
            }
        }

        LocalCorrelationSurface {
            correlation,
            density,
        }
    }

    /// Weighted moments of one cell given the tabulated axis kernels.
    fn reduce_cell(&self, dataset: &Dataset, kx: &[f64], ky: &[f64]) -> Option<CellEstimate> {
        let n = dataset.len();
        if n == 0 {
            return None;
        }
        let xs = dataset.xs();
        let ys = dataset.ys();

        let mut total = 0.0;
        let mut sx = 0.0;
        let mut sy = 0.0;
        for k in 0..n {
            let w = kx[k] * ky[k];
            total += w;
            sx += w * xs[k];
            sy += w * ys[k];
        }
        if total < self.min_weight || total <= 0.0 {
            return None;
        }

        let mx = sx / total;
        let my = sy / total;
        let mut vx = 0.0;
        let mut vy = 0.0;
        let mut cov = 0.0;
        for k in 0..n {
            let w = kx[k] * ky[k];
            let dx = xs[k] - mx;
            let dy = ys[k] - my;
            vx += w * dx * dx;
            vy += w * dy * dy;
            cov += w * dx * dy;
        }
        vx /= total;
        vy /= total;
        cov /= total;

        if vx <= 0.0 || vy <= 0.0 {
            return None;
        }
        let correlation = (cov / (vx * vy).sqrt()).clamp(-1.0, 1.0);
        if !correlation.is_finite() {
            return None;
        }

        Some(CellEstimate {
            correlation,
            density: total / n as f64,
        })
    }
}

/// Reusable kernel tables for repeated grid evaluations.
#[derive(Debug, Default)]
pub struct KernelWorkspace {
    x: KernelTable,
    y: KernelTable,
}

impl KernelWorkspace {
    /// Empty workspace; tables grow on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of kernel values the workspace can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.x.values.capacity() + self.y.values.capacity()
    }
}

/// Per-axis kernel factors, one row of `n` values per grid coordinate.
#[derive(Debug, Default)]
struct KernelTable {
    n: usize,
    values: Vec<f64>,
}

impl KernelTable {
    fn fill(&mut self, samples: &[f64], coords: &[f64], h: f64) {
        self.n = samples.len();
        self.values.clear();
        self.values.reserve(self.n * coords.len());
        for &c in coords {
            self.values
                .extend(samples.iter().map(|&s| gaussian_kernel((s - c) / h)));
        }
    }

    #[inline]
    fn row(&self, idx: usize) -> &[f64] {
        &self.values[idx * self.n..(idx + 1) * self.n]
    }
}
