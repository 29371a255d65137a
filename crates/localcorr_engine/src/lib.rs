//! # localcorr_engine: Cached Local Correlation Engine
//!
//! ## Layer 3 (Orchestration) Role
//!
//! localcorr_engine combines the estimator (L1) and the bootstrap (L2) into
//! the operations a chart calls:
//! - Stateless entry points (`api`): surface, bootstrap t-statistics and
//!   t-statistic marginals
//! - Per-chart engine with result caching (`engine`, `cache`)
//! - Estimator and engine configuration (`config`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use localcorr_engine::{compute_local_correlation, compute_t_stat_marginals};
//!
//! let x: Vec<f64> = (0..50).map(|k| k as f64 * 0.1).collect();
//! let y: Vec<f64> = x.iter().map(|v| v * v).collect();
//!
//! let result = compute_local_correlation(&x, &y, 10, None).unwrap();
//! assert_eq!(result.marginals.x.len(), 10);
//!
//! let curves = compute_t_stat_marginals(&result.correlation, &result.density, 10).unwrap();
//! assert_eq!(curves, result.marginals);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): rayon grid evaluation and `bootstrap_parallel`
//! - `serde`: Serialisation of result types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod result;

pub use api::{compute_bootstrap_t_stats, compute_local_correlation, compute_t_stat_marginals};
pub use cache::{CacheStats, Fingerprint, ResultCache};
pub use config::{EngineConfig, EstimatorConfig, EstimatorConfigBuilder, DEFAULT_CACHE_CAPACITY};
pub use engine::LocalCorrelationEngine;
pub use error::{EngineError, Result};
pub use result::LocalCorrelationResult;
