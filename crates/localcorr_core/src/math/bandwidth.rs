//! Silverman's rule-of-thumb bandwidth.
//!
//! `h = 1.06 · σ · n^(-1/5)` with σ the population standard deviation.

use super::stats::population_std;
use crate::types::{Axis, LocalCorrError, Result};

/// Silverman scaling constant.
pub const SILVERMAN_FACTOR: f64 = 1.06;

/// Bandwidth for one axis by Silverman's rule.
///
/// # Errors
///
/// Returns `DegenerateBandwidth` when fewer than two values are given, the
/// axis has zero variance, or the result is otherwise not positive.
///
/// # Examples
///
/// ```
/// use localcorr_core::math::bandwidth::silverman;
/// use localcorr_core::types::Axis;
///
/// let h = silverman(&[1.0, 2.0, 3.0, 4.0, 5.0], Axis::X).unwrap();
/// assert!(h > 0.0);
/// assert!(silverman(&[2.0, 2.0, 2.0], Axis::X).is_err());
/// ```
pub fn silverman(values: &[f64], axis: Axis) -> Result<f64> {
    let n = values.len();
    if n < 2 {
        return Err(LocalCorrError::degenerate_bandwidth(
            axis,
            format!("need at least 2 values, got {}", n),
        ));
    }

    let sigma = population_std(values).unwrap_or(0.0);
    if sigma <= 0.0 {
        return Err(LocalCorrError::degenerate_bandwidth(axis, "zero variance"));
    }

    let h = SILVERMAN_FACTOR * sigma * (n as f64).powf(-0.2);
    if !h.is_finite() || h <= 0.0 {
        return Err(LocalCorrError::degenerate_bandwidth(
            axis,
            format!("rule produced {}", h),
        ));
    }
    Ok(h)
}
