//! Engine configuration.
//!
//! [`EstimatorConfig`] controls the correlation surface; bootstrap settings
//! live in [`BootstrapConfig`]. [`EngineConfig`] pairs the two for a
//! [`LocalCorrelationEngine`](crate::LocalCorrelationEngine).

use localcorr_bootstrap::BootstrapConfig;
use localcorr_core::math::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE, PADDING_FRACTION};
use localcorr_core::math::{LocalCorrelationEstimator, DEFAULT_GRID_SIZE, DEFAULT_MIN_WEIGHT};
use localcorr_core::{Bandwidth, LocalCorrError, Result};

use crate::error::EngineError;

/// Surface estimation settings.
///
/// # Examples
///
/// ```rust
/// use localcorr_engine::EstimatorConfig;
///
/// let config = EstimatorConfig::builder()
///     .grid_size(40)
///     .bandwidth(0.25)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.grid_size(), 40);
/// assert_eq!(config.bandwidth_override(), Some(0.25));
/// assert_eq!(config.min_weight(), 0.1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimatorConfig {
    grid_size: usize,
    min_weight: f64,
    padding: f64,
    bandwidth_override: Option<f64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_weight: DEFAULT_MIN_WEIGHT,
            padding: PADDING_FRACTION,
            bandwidth_override: None,
        }
    }
}

impl EstimatorConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Grid side length.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Minimum kernel weight for a defined cell.
    #[inline]
    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Padding fraction on each side of the data range.
    #[inline]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Bandwidth applied to both axes instead of Silverman's rule.
    #[inline]
    pub fn bandwidth_override(&self) -> Option<f64> {
        self.bandwidth_override
    }

    /// Estimator built from these settings.
    pub fn estimator(&self) -> Result<LocalCorrelationEstimator> {
        LocalCorrelationEstimator::new(self.min_weight)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidGridSize` outside `[2, 512]`
    /// - `InvalidParameter` for a negative or non-finite min weight or padding
    /// - `DegenerateBandwidth` for a non-positive or non-finite override
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(LocalCorrError::InvalidGridSize {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        self.estimator()?;
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(LocalCorrError::invalid_parameter(
                "padding",
                format!("must be finite and >= 0, got {}", self.padding),
            ));
        }
        if let Some(h) = self.bandwidth_override {
            Bandwidth::uniform(h)?;
        }
        Ok(())
    }
}

/// Builder for [`EstimatorConfig`].
#[derive(Clone, Debug, Default)]
pub struct EstimatorConfigBuilder {
    grid_size: Option<usize>,
    min_weight: Option<f64>,
    padding: Option<f64>,
    bandwidth_override: Option<f64>,
}

impl EstimatorConfigBuilder {
    /// Sets the grid side length.
    #[inline]
    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    /// Sets the minimum kernel weight.
    #[inline]
    pub fn min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = Some(min_weight);
        self
    }

    /// Sets the padding fraction.
    #[inline]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Sets a fixed bandwidth for both axes.
    #[inline]
    pub fn bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth_override = Some(bandwidth);
        self
    }

    /// Sets or clears the fixed bandwidth.
    #[inline]
    pub fn bandwidth_override(mut self, bandwidth: Option<f64>) -> Self {
        self.bandwidth_override = bandwidth;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<EstimatorConfig> {
        let defaults = EstimatorConfig::default();
        let config = EstimatorConfig {
            grid_size: self.grid_size.unwrap_or(defaults.grid_size),
            min_weight: self.min_weight.unwrap_or(defaults.min_weight),
            padding: self.padding.unwrap_or(defaults.padding),
            bandwidth_override: self.bandwidth_override,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Entries kept by an engine's [`ResultCache`](crate::ResultCache) by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Full configuration of a [`LocalCorrelationEngine`](crate::LocalCorrelationEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Surface estimation settings
    pub estimator: EstimatorConfig,
    /// Bootstrap settings
    pub bootstrap: BootstrapConfig,
    /// Distinct parameter sets cached at once (at least 1)
    pub cache_capacity: usize,
}

impl EngineConfig {
    /// Pair estimator and bootstrap settings.
    pub fn new(estimator: EstimatorConfig, bootstrap: BootstrapConfig) -> Self {
        Self {
            estimator,
            bootstrap,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Set the number of cached parameter sets.
    ///
    /// A capacity of 1 gives replace-on-miss caching for a single chart.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> std::result::Result<(), EngineError> {
        self.estimator.validate()?;
        self.bootstrap.validate()?;
        if self.cache_capacity == 0 {
            return Err(LocalCorrError::invalid_parameter(
                "cache_capacity",
                "must be at least 1",
            )
            .into());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(EstimatorConfig::default(), BootstrapConfig::default())
    }
}
