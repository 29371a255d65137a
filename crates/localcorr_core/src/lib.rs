//! # localcorr_core: Local Gaussian Correlation Estimator
//!
//! ## Layer 1 (Foundation) Role
//!
//! localcorr_core is the bottom layer of the workspace, providing:
//! - Data model: `Dataset`, `Bandwidth`, `Grid`, `SurfaceGrid` (`types`)
//! - Error types: `LocalCorrError` (`types::error`)
//! - Silverman bandwidth selection (`math::bandwidth`)
//! - Padded evaluation grids (`math::grid`)
//! - Kernel-weighted local correlation and density (`math::estimator`)
//! - Density-weighted marginal curves (`math::marginal`)
//! - Global summary statistics (`math::stats`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other localcorr_* crates:
//! - thiserror: Error derivation
//! - rayon: Row-parallel grid evaluation (optional, `parallel` feature)
//! - serde: Serialisation of result types (optional, `serde` feature)
//!
//! ## Usage Examples
//!
//! ```rust
//! use localcorr_core::math::{estimator::LocalCorrelationEstimator, grid::Grid};
//! use localcorr_core::types::{Bandwidth, Dataset};
//!
//! let xs: Vec<f64> = (1..=10).map(f64::from).collect();
//! let dataset = Dataset::new(xs.clone(), xs).unwrap();
//!
//! let bandwidth = Bandwidth::select(&dataset, None).unwrap();
//! let grid = Grid::from_dataset(&dataset, 5).unwrap();
//!
//! let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bandwidth);
//! assert_eq!(surface.correlation.size(), 5);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Evaluate grid rows with rayon (bit-identical output)
//! - `serde`: Enable serialisation for grids, bandwidths and marginals

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;

pub use types::{Bandwidth, Dataset, LocalCorrError, Result, Sample, SurfaceGrid};
