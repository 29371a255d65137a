//! CLI error types.

use localcorr_core::LocalCorrError;
use localcorr_engine::EngineError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by the `localcorr` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Requested CSV column is missing from the header.
    #[error("Column '{0}' not found in input header")]
    ColumnNotFound(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Estimator failure.
    #[error(transparent)]
    Core(#[from] LocalCorrError),

    /// Engine or bootstrap failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
