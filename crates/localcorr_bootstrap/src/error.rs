//! Bootstrap-specific error types.
//!
//! This module provides structured error handling for bootstrap
//! configuration and execution.

use localcorr_core::LocalCorrError;
use thiserror::Error;

/// Configuration error for the bootstrap engine.
///
/// These errors occur at build time when invalid parameters are provided.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Iteration count outside valid range.
    #[error("Invalid iteration count {0}: must be in range [1, {max}]", max = crate::config::MAX_ITERATIONS)]
    InvalidIterationCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Errors that can occur while running a bootstrap.
///
/// # Variants
///
/// - `Config`: Rejected configuration
/// - `Core`: Dataset, bandwidth or grid validation failure
/// - `GridMismatch`: Original correlation grid does not match the grid geometry
/// - `Cancelled`: Cancellation was requested before completion
///
/// # Examples
///
/// ```
/// use localcorr_bootstrap::BootstrapError;
///
/// let err = BootstrapError::cancelled(40, 200);
/// assert!(err.is_cancelled());
/// assert!(format!("{}", err).contains("40 of 200"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    /// Wrapped configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Wrapped estimator error.
    #[error("Estimator error: {0}")]
    Core(#[from] LocalCorrError),

    /// Original correlation grid has the wrong shape.
    #[error("Grid mismatch: grid has {expected} coordinates per axis, original surface has {actual}")]
    GridMismatch {
        /// Grid side length
        expected: usize,
        /// Side length of the supplied original surface
        actual: usize,
    },

    /// Bootstrap stopped before all iterations ran.
    #[error("Bootstrap cancelled after {completed} of {requested} iterations")]
    Cancelled {
        /// Iterations that finished
        completed: usize,
        /// Iterations requested
        requested: usize,
    },
}

impl BootstrapError {
    /// Create a cancellation error.
    pub fn cancelled(completed: usize, requested: usize) -> Self {
        Self::Cancelled {
            completed,
            requested,
        }
    }

    /// Check if this is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
