//! Evaluation grid construction.
//!
//! Each axis gets `size` evenly spaced coordinates covering the data range
//! padded by 5% of the span on both sides, endpoints included.

use crate::types::{Axis, Dataset, LocalCorrError, Result};

/// Smallest supported grid side.
pub const MIN_GRID_SIZE: usize = 2;

/// Largest supported grid side.
pub const MAX_GRID_SIZE: usize = 512;

/// Default grid side.
pub const DEFAULT_GRID_SIZE: usize = 30;

/// Fraction of the span added on each side of the data range.
pub const PADDING_FRACTION: f64 = 0.05;

/// Pair of strictly increasing axis coordinate vectors of equal length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grid {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Grid {
    /// Build the padded grid for both axes of `dataset`.
    ///
    /// # Errors
    ///
    /// - `InvalidGridSize` if `size` is outside `[2, 512]`
    /// - `DegenerateAxis` if either axis has zero span, or a span too narrow
    ///   to hold `size` distinct coordinates
    pub fn from_dataset(dataset: &Dataset, size: usize) -> Result<Self> {
        Self::from_dataset_padded(dataset, size, PADDING_FRACTION)
    }

    /// Build a grid with a custom padding fraction on each side.
    ///
    /// # Errors
    ///
    /// As [`Grid::from_dataset`], plus `InvalidParameter` for a negative or
    /// non-finite `padding`.
    pub fn from_dataset_padded(dataset: &Dataset, size: usize, padding: f64) -> Result<Self> {
        Ok(Self {
            x: padded_axis_coordinates(dataset.xs(), size, padding, Axis::X)?,
            y: padded_axis_coordinates(dataset.ys(), size, padding, Axis::Y)?,
        })
    }

    /// Adopt caller-supplied coordinates.
    ///
    /// # Errors
    ///
    /// Fails unless both axes have the same valid length and are finite and
    /// strictly increasing.
    pub fn from_coordinates(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(LocalCorrError::ShapeMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        validate_size(x.len())?;
        ensure_increasing(&x, Axis::X)?;
        ensure_increasing(&y, Axis::Y)?;
        Ok(Self { x, y })
    }

    /// Number of coordinates per axis.
    #[inline]
    pub fn size(&self) -> usize {
        self.x.len()
    }

    /// x coordinates.
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// y coordinates.
    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }
}

/// Evenly spaced padded coordinates for one axis.
///
/// # Examples
///
/// ```
/// use localcorr_core::math::grid::axis_coordinates;
/// use localcorr_core::types::Axis;
///
/// let coords = axis_coordinates(&[0.0, 10.0], 3, Axis::X).unwrap();
/// assert_eq!(coords, vec![-0.5, 5.0, 10.5]);
/// ```
pub fn axis_coordinates(values: &[f64], size: usize, axis: Axis) -> Result<Vec<f64>> {
    padded_axis_coordinates(values, size, PADDING_FRACTION, axis)
}

/// Evenly spaced coordinates with `padding · span` added on each side.
pub fn padded_axis_coordinates(
    values: &[f64],
    size: usize,
    padding: f64,
    axis: Axis,
) -> Result<Vec<f64>> {
    validate_size(size)?;
    if !padding.is_finite() || padding < 0.0 {
        return Err(LocalCorrError::invalid_parameter(
            "padding",
            format!("must be finite and >= 0, got {}", padding),
        ));
    }
    if values.is_empty() {
        return Err(LocalCorrError::insufficient_data(1, 0));
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    if span <= 0.0 {
        return Err(LocalCorrError::DegenerateAxis { axis, value: min });
    }

    let lo = min - padding * span;
    let hi = max + padding * span;
    let step = (hi - lo) / (size - 1) as f64;

    let mut coords: Vec<f64> = (0..size).map(|k| lo + step * k as f64).collect();
    // Pin the upper endpoint exactly.
    coords[size - 1] = hi;

    // A nonzero span narrower than `size` representable steps collapses
    // neighbouring coordinates.
    if coords.windows(2).any(|w| w[1] <= w[0]) {
        return Err(LocalCorrError::DegenerateAxis { axis, value: min });
    }
    Ok(coords)
}

fn validate_size(size: usize) -> Result<()> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(LocalCorrError::InvalidGridSize {
            size,
            min: MIN_GRID_SIZE,
            max: MAX_GRID_SIZE,
        });
    }
    Ok(())
}

fn ensure_increasing(coords: &[f64], axis: Axis) -> Result<()> {
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(LocalCorrError::invalid_parameter(
            "grid",
            format!("{} coordinates must be finite", axis),
        ));
    }
    if coords.windows(2).any(|w| w[1] <= w[0]) {
        return Err(LocalCorrError::invalid_parameter(
            "grid",
            format!("{} coordinates must be strictly increasing", axis),
        ));
    }
    Ok(())
}
