//! Per-axis kernel bandwidth.

use super::dataset::Dataset;
use super::error::{Axis, LocalCorrError, Result};
use crate::math::bandwidth;

/// Kernel bandwidth pair `(hx, hy)`.
///
/// Both components are guaranteed finite and strictly positive; the only
/// way to obtain a `Bandwidth` is through a validating constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bandwidth {
    hx: f64,
    hy: f64,
}

impl Bandwidth {
    /// Create a bandwidth from explicit per-axis values.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateBandwidth` if either value is not finite and positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use localcorr_core::types::Bandwidth;
    ///
    /// let bw = Bandwidth::new(0.5, 1.5).unwrap();
    /// assert_eq!(bw.hx(), 0.5);
    /// assert!(Bandwidth::new(0.0, 1.0).is_err());
    /// ```
    pub fn new(hx: f64, hy: f64) -> Result<Self> {
        validate(Axis::X, hx)?;
        validate(Axis::Y, hy)?;
        Ok(Self { hx, hy })
    }

    /// Use the same bandwidth on both axes.
    pub fn uniform(h: f64) -> Result<Self> {
        Self::new(h, h)
    }

    /// Select a bandwidth for `dataset`.
    ///
    /// With an override, it is used for both axes; otherwise each axis gets
    /// its own Silverman bandwidth.
    pub fn select(dataset: &Dataset, override_h: Option<f64>) -> Result<Self> {
        match override_h {
            Some(h) => Self::uniform(h),
            None => Ok(Self {
                hx: bandwidth::silverman(dataset.xs(), Axis::X)?,
                hy: bandwidth::silverman(dataset.ys(), Axis::Y)?,
            }),
        }
    }

    /// Bandwidth on the x axis.
    #[inline]
    pub fn hx(&self) -> f64 {
        self.hx
    }

    /// Bandwidth on the y axis.
    #[inline]
    pub fn hy(&self) -> f64 {
        self.hy
    }
}

fn validate(axis: Axis, h: f64) -> Result<()> {
    if !h.is_finite() || h <= 0.0 {
        return Err(LocalCorrError::degenerate_bandwidth(
            axis,
            format!("bandwidth must be finite and > 0, got {}", h),
        ));
    }
    Ok(())
}
