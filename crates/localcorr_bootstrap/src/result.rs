//! Bootstrap output and per-cell t-statistics.

use localcorr_core::SurfaceGrid;

use crate::accumulator::ReplicateGrid;
use crate::config::BootstrapConfig;

/// Conventional two-sided 5% critical value.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 1.96;

/// Standard errors and t-statistics over the original grid geometry.
///
/// A cell is `None` in both grids when fewer than the configured minimum
/// number of replicates were observed there, or when the original
/// correlation at that cell is undefined.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BootstrapResult {
    /// t-statistic per cell
    pub t: SurfaceGrid,
    /// Bootstrap standard error per cell
    pub se: SurfaceGrid,
    /// Replicates observed per cell, row-major by y
    pub replicate_counts: Vec<usize>,
    /// Iterations that contributed
    pub iterations: usize,
    /// Base seed of the run
    pub seed: u64,
}

impl BootstrapResult {
    /// Side length of the grids.
    #[inline]
    pub fn size(&self) -> usize {
        self.t.size()
    }

    /// Replicates observed at `(i, j)`.
    #[inline]
    pub fn replicate_count(&self, i: usize, j: usize) -> usize {
        self.replicate_counts[j * self.size() + i]
    }

    /// Cells with `|t| >= threshold`, as `(i, j)` pairs.
    pub fn significant_cells(&self, threshold: f64) -> Vec<(usize, usize)> {
        self.t
            .iter()
            .filter_map(|(i, j, t)| match t {
                Some(t) if t.abs() >= threshold => Some((i, j)),
                _ => None,
            })
            .collect()
    }
}

/// t-statistic for an estimate with bootstrap standard error `se`.
///
/// Below the floor the estimate is treated as noise-free and t saturates
/// to `±saturation` (0 for a zero estimate).
///
/// # Examples
///
/// ```
/// use localcorr_bootstrap::result::t_statistic;
///
/// assert_eq!(t_statistic(0.5, 0.1, 0.001, 10.0), 5.0);
/// assert_eq!(t_statistic(-0.5, 0.0, 0.001, 10.0), -10.0);
/// assert_eq!(t_statistic(0.0, 0.0, 0.001, 10.0), 0.0);
/// ```
pub fn t_statistic(estimate: f64, se: f64, se_floor: f64, saturation: f64) -> f64 {
    if se > se_floor {
        estimate / se
    } else if estimate > 0.0 {
        saturation
    } else if estimate < 0.0 {
        -saturation
    } else {
        0.0
    }
}

/// Turn accumulated replicates into standard errors and t-statistics.
pub(crate) fn summarise(
    original: &SurfaceGrid,
    replicates: &ReplicateGrid,
    config: &BootstrapConfig,
    iterations: usize,
    seed: u64,
) -> BootstrapResult {
    let size = original.size();
    let mut t = SurfaceGrid::empty(size);
    let mut se = SurfaceGrid::empty(size);

    for (i, j, rho) in original.iter() {
        let acc = replicates.get(i, j);
        if acc.count() < config.min_replicates() {
            continue;
        }
        let (Some(rho), Some(std)) = (rho, acc.sample_std()) else {
            continue;
        };
        se.set(i, j, Some(std));
        t.set(
            i,
            j,
            Some(t_statistic(rho, std, config.se_floor(), config.t_saturation())),
        );
    }

    BootstrapResult {
        t,
        se,
        replicate_counts: replicates.cells().iter().map(|c| c.count()).collect(),
        iterations,
        seed,
    }
}
