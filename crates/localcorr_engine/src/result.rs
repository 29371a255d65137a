//! Full local correlation analysis of one dataset.

use localcorr_core::math::stats::pearson;
use localcorr_core::math::{integrate, Grid, MarginalCurves};
use localcorr_core::{Bandwidth, Dataset, SurfaceGrid};
use tracing::debug;

use crate::config::EstimatorConfig;
use crate::error::Result;

/// Everything a chart needs to draw one local correlation surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalCorrelationResult {
    /// Evaluation coordinates
    pub grid: Grid,
    /// Local correlation per cell
    pub correlation: SurfaceGrid,
    /// Normalised kernel weight per cell
    pub density: SurfaceGrid,
    /// Density-weighted correlation marginals
    pub marginals: MarginalCurves,
    /// Bandwidth used
    pub bandwidth: Bandwidth,
    /// Global Pearson correlation, `None` for a constant axis
    pub pearson: Option<f64>,
}

/// Estimate the surface, marginals and summary statistics for `dataset`.
///
/// The dataset is assumed to have passed the minimum-size check.
pub(crate) fn analyse(
    dataset: &Dataset,
    bandwidth: Bandwidth,
    config: &EstimatorConfig,
) -> Result<LocalCorrelationResult> {
    debug!(
        samples = dataset.len(),
        hx = bandwidth.hx(),
        hy = bandwidth.hy(),
        grid_size = config.grid_size(),
        "Estimating local correlation"
    );

    let grid = Grid::from_dataset_padded(dataset, config.grid_size(), config.padding())?;
    let surface = config.estimator()?.estimate(dataset, &grid, bandwidth);
    let marginals = integrate(&surface.correlation, &surface.density)?;

    Ok(LocalCorrelationResult {
        grid,
        correlation: surface.correlation,
        density: surface.density,
        marginals,
        bandwidth,
        pearson: pearson(dataset.xs(), dataset.ys()),
    })
}
