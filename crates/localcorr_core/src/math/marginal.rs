//! Density-weighted marginal integration.
//!
//! Reduces a 2D grid (correlation or t-statistic) to two 1D curves:
//!
//! - `x[i]` averages column `i` over all y coordinates
//! - `y[j]` averages row `j` over all x coordinates
//!
//! Each average is weighted by the paired density grid and skips cells where
//! either the value or the density is undefined. A coordinate whose total
//! weight is zero has no marginal value.

use crate::types::{Result, SurfaceGrid};

/// Marginal curves indexed by grid coordinate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarginalCurves {
    /// Curve along x (averaged over y)
    pub x: Vec<Option<f64>>,
    /// Curve along y (averaged over x)
    pub y: Vec<Option<f64>>,
}

/// Integrate `values` against `density`.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the grids differ in size.
///
/// # Examples
///
/// ```
/// use localcorr_core::math::marginal::integrate;
/// use localcorr_core::types::SurfaceGrid;
///
/// let values = SurfaceGrid::from_rows(&[vec![Some(1.0), Some(0.0)], vec![None, Some(0.5)]]).unwrap();
/// let density = SurfaceGrid::from_rows(&[vec![Some(1.0), Some(3.0)], vec![None, Some(1.0)]]).unwrap();
/// let curves = integrate(&values, &density).unwrap();
///
/// assert_eq!(curves.x[0], Some(1.0));
/// assert_eq!(curves.y[0], Some(0.25));
/// ```
pub fn integrate(values: &SurfaceGrid, density: &SurfaceGrid) -> Result<MarginalCurves> {
    values.ensure_same_shape(density)?;
    let size = values.size();

    let mut x_num = vec![0.0; size];
    let mut x_den = vec![0.0; size];
    let mut y_num = vec![0.0; size];
    let mut y_den = vec![0.0; size];

    for ((i, j, value), (_, _, weight)) in values.iter().zip(density.iter()) {
        let (Some(value), Some(weight)) = (value, weight) else {
            continue;
        };
        x_num[i] += weight * value;
        x_den[i] += weight;
        y_num[j] += weight * value;
        y_den[j] += weight;
    }

    Ok(MarginalCurves {
        x: finish(&x_num, &x_den),
        y: finish(&y_num, &y_den),
    })
}

fn finish(num: &[f64], den: &[f64]) -> Vec<Option<f64>> {
    num.iter()
        .zip(den)
        .map(|(&n, &d)| if d > 0.0 { Some(n / d) } else { None })
        .collect()
}
