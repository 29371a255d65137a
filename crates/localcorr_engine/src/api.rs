//! Stateless entry points.
//!
//! These mirror the operations a chart needs without holding a cache; use
//! [`LocalCorrelationEngine`](crate::LocalCorrelationEngine) when the same
//! data is analysed repeatedly.

use localcorr_bootstrap::{BootstrapConfig, BootstrapEngine, BootstrapResult};
use localcorr_core::math::{integrate, Grid, LocalCorrelationEstimator, MarginalCurves};
use localcorr_core::types::MIN_SAMPLES;
use localcorr_core::{Bandwidth, Dataset, LocalCorrError, SurfaceGrid};

use crate::config::EstimatorConfig;
use crate::error::Result;
use crate::result::{analyse, LocalCorrelationResult};

/// Estimate the local correlation surface of `(x, y)`.
///
/// `bandwidth_override` replaces Silverman's rule on both axes.
///
/// # Errors
///
/// - `InsufficientData` for fewer than 10 pairs
/// - `InvalidGridSize` for `grid_size` outside `[2, 512]`
/// - `DegenerateBandwidth`, `DegenerateAxis` for constant axes or a bad override
///
/// # Examples
///
/// ```
/// use localcorr_engine::compute_local_correlation;
///
/// let x: Vec<f64> = (1..=10).map(f64::from).collect();
/// let result = compute_local_correlation(&x, &x, 5, None).unwrap();
///
/// assert_eq!(result.grid.x().len(), 5);
/// assert_eq!(result.correlation.size(), 5);
/// for rho in result.correlation.defined_values() {
///     assert!((rho - 1.0).abs() < 1e-9);
/// }
/// ```
pub fn compute_local_correlation(
    x: &[f64],
    y: &[f64],
    grid_size: usize,
    bandwidth_override: Option<f64>,
) -> Result<LocalCorrelationResult> {
    let config = EstimatorConfig::builder()
        .grid_size(grid_size)
        .bandwidth_override(bandwidth_override)
        .build()?;
    let dataset = Dataset::from_slices(x, y)?;
    dataset.ensure_min_len(MIN_SAMPLES)?;
    let bandwidth = Bandwidth::select(&dataset, config.bandwidth_override())?;
    analyse(&dataset, bandwidth, &config)
}

/// Bootstrap t-statistics for a previously computed correlation surface.
///
/// `x_grid`, `y_grid`, `hx` and `hy` must be the ones that produced
/// `original`. `progress` receives fractions in `[0, 1]`, ending at `1.0`.
///
/// # Errors
///
/// - `InsufficientData` for fewer than 10 pairs
/// - `InvalidIterationCount` for `iterations` outside `[1, 100_000]`
/// - `GridMismatch` if `original` does not match the grid
#[allow(clippy::too_many_arguments)]
pub fn compute_bootstrap_t_stats<P>(
    x: &[f64],
    y: &[f64],
    x_grid: &[f64],
    y_grid: &[f64],
    hx: f64,
    hy: f64,
    original: &SurfaceGrid,
    iterations: usize,
    progress: P,
) -> Result<BootstrapResult>
where
    P: FnMut(f64),
{
    let dataset = Dataset::from_slices(x, y)?;
    dataset.ensure_min_len(MIN_SAMPLES)?;
    let grid = Grid::from_coordinates(x_grid.to_vec(), y_grid.to_vec())?;
    let bandwidth = Bandwidth::new(hx, hy)?;
    let config = BootstrapConfig::default().with_iterations(iterations)?;

    let engine = BootstrapEngine::new(config, LocalCorrelationEstimator::default())?;
    Ok(engine.run(&dataset, &grid, bandwidth, original, progress, None)?)
}

/// Density-weighted marginals of a t-statistic grid.
///
/// # Errors
///
/// Returns `ShapeMismatch` if either grid is not `grid_size × grid_size`.
pub fn compute_t_stat_marginals(
    t: &SurfaceGrid,
    density: &SurfaceGrid,
    grid_size: usize,
) -> Result<MarginalCurves> {
    for grid in [t, density] {
        if grid.size() != grid_size {
            return Err(LocalCorrError::ShapeMismatch {
                expected: grid_size,
                actual: grid.size(),
            }
            .into());
        }
    }
    Ok(integrate(t, density)?)
}
