//! Paired sample storage.
//!
//! A [`Dataset`] holds the two axis arrays as separate contiguous vectors,
//! which keeps the kernel loop cache-friendly and lets the bootstrap build
//! resampled copies without re-validating values.

use super::error::{Axis, LocalCorrError, Result};

/// Minimum number of sample pairs accepted by the engine.
pub const MIN_SAMPLES: usize = 10;

/// A single observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// First variable
    pub x: f64,
    /// Second variable
    pub y: f64,
}

/// Immutable ordered sequence of finite sample pairs.
///
/// # Examples
///
/// ```
/// use localcorr_core::types::Dataset;
///
/// let dataset = Dataset::new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]).unwrap();
/// assert_eq!(dataset.len(), 3);
/// assert_eq!(dataset.sample(1).y, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from two equal-length arrays of finite values.
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` if the arrays differ in length
    /// - `NonFiniteSample` if any value is NaN or infinite
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(LocalCorrError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        if let Some(index) = xs.iter().position(|v| !v.is_finite()) {
            return Err(LocalCorrError::NonFiniteSample {
                axis: Axis::X,
                index,
            });
        }
        if let Some(index) = ys.iter().position(|v| !v.is_finite()) {
            return Err(LocalCorrError::NonFiniteSample {
                axis: Axis::Y,
                index,
            });
        }
        Ok(Self { xs, ys })
    }

    /// Build a dataset from borrowed slices.
    pub fn from_slices(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Self::new(xs.to_vec(), ys.to_vec())
    }

    /// Build a dataset from sample pairs.
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let (xs, ys) = samples.iter().map(|s| (s.x, s.y)).unzip();
        Self::new(xs, ys)
    }

    /// Fail with `InsufficientData` unless at least `required` samples exist.
    pub fn ensure_min_len(&self, required: usize) -> Result<()> {
        if self.len() < required {
            return Err(LocalCorrError::insufficient_data(required, self.len()));
        }
        Ok(())
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether the dataset is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// x values.
    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// y values.
    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Values along one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.xs,
            Axis::Y => &self.ys,
        }
    }

    /// Sample at `index`.
    #[inline]
    pub fn sample(&self, index: usize) -> Sample {
        Sample {
            x: self.xs[index],
            y: self.ys[index],
        }
    }

    /// Iterate over sample pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(&x, &y)| Sample { x, y })
    }

    /// Build a new dataset from the samples at `indices` (repeats allowed).
    ///
    /// Values are already validated, so this cannot fail.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn resample(&self, indices: &[usize]) -> Dataset {
        let mut xs = Vec::with_capacity(indices.len());
        let mut ys = Vec::with_capacity(indices.len());
        self.resample_into(indices, &mut xs, &mut ys);
        Dataset { xs, ys }
    }

    /// Like [`Dataset::resample`] but reuses caller-owned buffers.
    pub fn resample_into(&self, indices: &[usize], xs: &mut Vec<f64>, ys: &mut Vec<f64>) {
        xs.clear();
        ys.clear();
        for &k in indices {
            xs.push(self.xs[k]);
            ys.push(self.ys[k]);
        }
    }

    /// Wrap pre-validated buffers, taking ownership.
    ///
    /// Used by the bootstrap to recycle resample buffers; the buffers must
    /// have come from an existing dataset.
    pub fn from_validated(xs: Vec<f64>, ys: Vec<f64>) -> Dataset {
        debug_assert_eq!(xs.len(), ys.len());
        Dataset { xs, ys }
    }

    /// Release the underlying buffers.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.xs, self.ys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Dataset::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert_eq!(err, LocalCorrError::LengthMismatch { x_len: 2, y_len: 1 });
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let err = Dataset::new(vec![1.0, 2.0], vec![1.0, f64::NAN]).unwrap_err();
        assert_eq!(
            err,
            LocalCorrError::NonFiniteSample {
                axis: Axis::Y,
                index: 1
            }
        );

        let err = Dataset::new(vec![f64::INFINITY], vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            LocalCorrError::NonFiniteSample { axis: Axis::X, .. }
        ));
    }

    #[test]
    fn test_ensure_min_len() {
        let dataset = Dataset::new(vec![1.0; 9], vec![2.0; 9]).unwrap();
        assert!(dataset
            .ensure_min_len(MIN_SAMPLES)
            .unwrap_err()
            .is_insufficient_data());
        assert!(dataset.ensure_min_len(9).is_ok());
    }

    #[test]
    fn test_resample_repeats_indices() {
        let dataset = Dataset::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]).unwrap();
        let resampled = dataset.resample(&[2, 2, 0]);
        assert_eq!(resampled.xs(), &[3.0, 3.0, 1.0]);
        assert_eq!(resampled.ys(), &[30.0, 30.0, 10.0]);
    }

    #[test]
    fn test_from_samples_round_trip() {
        let samples = [Sample { x: 1.0, y: 2.0 }, Sample { x: 3.0, y: 4.0 }];
        let dataset = Dataset::from_samples(&samples).unwrap();
        let collected: Vec<Sample> = dataset.iter().collect();
        assert_eq!(collected, samples);
        assert_eq!(dataset.axis(Axis::Y), &[2.0, 4.0]);
    }
}
