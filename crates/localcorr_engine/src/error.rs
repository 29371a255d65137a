//! Engine error type.

use localcorr_bootstrap::{BootstrapError, ConfigError};
use localcorr_core::LocalCorrError;
use thiserror::Error;

/// Errors surfaced by the engine and its entry points.
///
/// # Examples
///
/// ```
/// use localcorr_core::LocalCorrError;
/// use localcorr_engine::EngineError;
///
/// let err: EngineError = LocalCorrError::insufficient_data(10, 3).into();
/// assert!(err.is_insufficient_data());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Dataset, bandwidth, grid or estimator failure.
    #[error(transparent)]
    Core(#[from] LocalCorrError),

    /// Bootstrap failure, including cancellation.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// Rejected bootstrap configuration.
    #[error("Bootstrap configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Check if the input had too few samples.
    pub fn is_insufficient_data(&self) -> bool {
        match self {
            Self::Core(e) => e.is_insufficient_data(),
            Self::Bootstrap(BootstrapError::Core(e)) => e.is_insufficient_data(),
            _ => false,
        }
    }

    /// Check if a bootstrap was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Bootstrap(e) if e.is_cancelled())
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_is_transparent() {
        let inner = LocalCorrError::insufficient_data(10, 4);
        let err = EngineError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_predicates() {
        let nested = EngineError::from(BootstrapError::from(LocalCorrError::insufficient_data(
            10, 1,
        )));
        assert!(nested.is_insufficient_data());
        assert!(!nested.is_cancelled());

        let cancelled = EngineError::from(BootstrapError::cancelled(3, 10));
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_insufficient_data());
    }

    #[test]
    fn test_config_display() {
        let err = EngineError::from(ConfigError::InvalidIterationCount(0));
        assert!(err.to_string().contains("Invalid iteration count"));
    }
}
