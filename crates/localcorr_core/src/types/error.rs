//! Error types for structured error handling.
//!
//! This module provides `LocalCorrError`, raised by dataset validation,
//! bandwidth selection, grid construction and marginal integration.
//!
//! Null grid cells are not errors: they are valid output meaning
//! "insufficient local support" and are represented as `None`.

use thiserror::Error;

/// Axis identifier used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal axis (first variable)
    X,
    /// Vertical axis (second variable)
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors that can occur while preparing or running the estimator.
///
/// # Variants
///
/// - `InsufficientData`: Fewer samples than the estimator requires
/// - `LengthMismatch`: x and y arrays differ in length
/// - `NonFiniteSample`: A NaN or infinite value reached the engine
/// - `DegenerateBandwidth`: Bandwidth would be zero, negative or non-finite
/// - `DegenerateAxis`: An axis span is zero or too narrow to grid
/// - `InvalidGridSize`: Grid size outside the supported range
/// - `ShapeMismatch`: Two grids that must align do not
/// - `InvalidParameter`: Any other rejected parameter
///
/// # Examples
///
/// ```
/// use localcorr_core::types::LocalCorrError;
///
/// let err = LocalCorrError::insufficient_data(10, 3);
/// assert!(format!("{}", err).contains("at least 10"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalCorrError {
    /// Not enough sample pairs to compute a meaningful surface.
    #[error("Insufficient data: need at least {required} sample pairs, got {provided}")]
    InsufficientData {
        /// Minimum number of samples required
        required: usize,
        /// Number of samples provided
        provided: usize,
    },

    /// x and y inputs have different lengths.
    #[error("Length mismatch: x has {x_len} values, y has {y_len}")]
    LengthMismatch {
        /// Length of the x input
        x_len: usize,
        /// Length of the y input
        y_len: usize,
    },

    /// A non-finite value was found in the input.
    #[error("Non-finite sample on {axis} axis at index {index}")]
    NonFiniteSample {
        /// Axis holding the offending value
        axis: Axis,
        /// Position of the offending sample
        index: usize,
    },

    /// Bandwidth cannot be used for kernel evaluation.
    #[error("Degenerate bandwidth on {axis} axis: {reason}")]
    DegenerateBandwidth {
        /// Axis whose bandwidth is degenerate
        axis: Axis,
        /// Description of the failure
        reason: String,
    },

    /// Axis span is zero, or too narrow for distinct grid coordinates.
    #[error("Degenerate {axis} axis at {value}: span too small for grid")]
    DegenerateAxis {
        /// Constant axis
        axis: Axis,
        /// Smallest value on the axis
        value: f64,
    },

    /// Grid size outside `[min, max]`.
    #[error("Invalid grid size {size}: must be in range [{min}, {max}]")]
    InvalidGridSize {
        /// Requested size
        size: usize,
        /// Smallest supported size
        min: usize,
        /// Largest supported size
        max: usize,
    },

    /// Grids that must share geometry do not.
    #[error("Shape mismatch: expected {expected}x{expected} grid, got {actual}x{actual}")]
    ShapeMismatch {
        /// Expected side length
        expected: usize,
        /// Actual side length
        actual: usize,
    },

    /// General invalid parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        reason: String,
    },
}

impl LocalCorrError {
    /// Create an insufficient data error.
    pub fn insufficient_data(required: usize, provided: usize) -> Self {
        Self::InsufficientData { required, provided }
    }

    /// Create a degenerate bandwidth error.
    pub fn degenerate_bandwidth(axis: Axis, reason: impl Into<String>) -> Self {
        Self::DegenerateBandwidth {
            axis,
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Check if this is an insufficient data error.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Check if this is a degenerate bandwidth error.
    pub fn is_degenerate_bandwidth(&self) -> bool {
        matches!(self, Self::DegenerateBandwidth { .. })
    }

    /// Check if this is a degenerate axis error.
    pub fn is_degenerate_axis(&self) -> bool {
        matches!(self, Self::DegenerateAxis { .. })
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, LocalCorrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = LocalCorrError::insufficient_data(10, 4);
        let display = format!("{}", err);
        assert!(display.contains("Insufficient data"));
        assert!(display.contains("10"));
        assert!(display.contains("4"));
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_degenerate_bandwidth_display() {
        let err = LocalCorrError::degenerate_bandwidth(Axis::Y, "zero variance");
        let display = format!("{}", err);
        assert!(display.contains("y axis"));
        assert!(display.contains("zero variance"));
        assert!(err.is_degenerate_bandwidth());
        assert!(!err.is_degenerate_axis());
    }

    #[test]
    fn test_degenerate_axis_display() {
        let err = LocalCorrError::DegenerateAxis {
            axis: Axis::X,
            value: 3.5,
        };
        assert!(format!("{}", err).contains("3.5"));
        assert!(err.is_degenerate_axis());
    }

    #[test]
    fn test_grid_size_display() {
        let err = LocalCorrError::InvalidGridSize {
            size: 1,
            min: 2,
            max: 512,
        };
        assert!(err.to_string().contains("Invalid grid size 1"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = LocalCorrError::invalid_parameter("min_weight", "must be finite");
        let _: &dyn std::error::Error = &err;
        assert_eq!(err.clone(), err);
    }
}
