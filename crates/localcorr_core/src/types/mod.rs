//! Core types for the local correlation estimator.
//!
//! This module provides:
//! - `Dataset` / `Sample`: validated paired observations
//! - `Bandwidth`: strictly positive kernel bandwidth pair
//! - `SurfaceGrid`: square grid of optional values (correlation, density, t)
//! - `LocalCorrError`: structured error type

pub mod bandwidth;
pub mod dataset;
pub mod error;
pub mod surface;

pub use bandwidth::Bandwidth;
pub use dataset::{Dataset, Sample, MIN_SAMPLES};
pub use error::{Axis, LocalCorrError, Result};
pub use surface::SurfaceGrid;
