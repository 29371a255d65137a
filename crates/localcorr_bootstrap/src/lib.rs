//! # localcorr_bootstrap: Bootstrap Significance for Local Correlation
//!
//! ## Layer 2 (Inference) Role
//!
//! localcorr_bootstrap sits on top of localcorr_core and estimates how
//! reliable each cell of a local correlation surface is:
//! - Seeded per-iteration resampling streams (`rng`)
//! - Validated run configuration (`config`)
//! - Streaming per-cell replicate moments (`accumulator`)
//! - Sequential, stepwise and rayon-parallel drivers (`engine`)
//! - Standard errors, t-statistics and significance masks (`result`)
//! - Cooperative cancellation (`cancel`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use localcorr_bootstrap::{BootstrapConfig, BootstrapEngine};
//! use localcorr_core::math::{Grid, LocalCorrelationEstimator};
//! use localcorr_core::{Bandwidth, Dataset};
//!
//! let xs: Vec<f64> = (0..40).map(|k| k as f64 * 0.25 + (k as f64).sin()).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| 0.8 * x + (x * 3.0).cos()).collect();
//! let dataset = Dataset::new(xs, ys).unwrap();
//! let grid = Grid::from_dataset(&dataset, 6).unwrap();
//! let bandwidth = Bandwidth::select(&dataset, None).unwrap();
//!
//! let estimator = LocalCorrelationEstimator::default();
//! let original = estimator.estimate(&dataset, &grid, bandwidth).correlation;
//!
//! let config = BootstrapConfig::builder().iterations(50).seed(7).build().unwrap();
//! let engine = BootstrapEngine::new(config, estimator).unwrap();
//! let result = engine
//!     .run(&dataset, &grid, bandwidth, &original, |_| {}, None)
//!     .unwrap();
//!
//! assert_eq!(result.t.size(), 6);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): `BootstrapEngine::run_parallel` via rayon
//! - `serde`: Serialisation of `BootstrapResult`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accumulator;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod result;
pub mod rng;

pub use cancel::CancellationToken;
pub use config::{BootstrapConfig, BootstrapConfigBuilder};
pub use engine::{BootstrapEngine, BootstrapRun};
pub use error::{BootstrapError, ConfigError, Result};
pub use result::{BootstrapResult, DEFAULT_SIGNIFICANCE_THRESHOLD};
