//! Numerical components of the estimator.
//!
//! - [`bandwidth`]: Silverman's rule
//! - [`grid`]: padded evaluation grids
//! - [`estimator`]: local correlation and density per cell
//! - [`marginal`]: density-weighted marginal curves
//! - [`stats`]: global summary statistics

pub mod bandwidth;
pub mod estimator;
pub mod grid;
pub mod marginal;
pub mod stats;

pub use estimator::{
    KernelWorkspace, LocalCorrelationEstimator, LocalCorrelationSurface, DEFAULT_MIN_WEIGHT,
};
pub use grid::{Grid, DEFAULT_GRID_SIZE};
pub use marginal::{integrate, MarginalCurves};
