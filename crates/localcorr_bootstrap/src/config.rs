//! Bootstrap configuration.
//!
//! This module provides [`BootstrapConfig`] and its builder. Values are
//! validated at build time so the engine never sees a configuration that
//! would divide by zero or loop forever.

use crate::error::ConfigError;

/// Maximum number of bootstrap iterations allowed.
pub const MAX_ITERATIONS: usize = 100_000;

/// Default number of bootstrap iterations.
pub const DEFAULT_ITERATIONS: usize = 200;

/// Default minimum replicates for a cell to receive a t-statistic.
pub const DEFAULT_MIN_REPLICATES: usize = 10;

/// Default standard-error floor below which t saturates.
pub const DEFAULT_SE_FLOOR: f64 = 0.001;

/// Default magnitude of a saturated t-statistic.
pub const DEFAULT_T_SATURATION: f64 = 10.0;

/// Default number of iterations between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 20;

/// Bootstrap configuration.
///
/// Immutable once built. Use [`BootstrapConfig::builder`] to construct
/// non-default instances.
///
/// # Examples
///
/// ```rust
/// use localcorr_bootstrap::BootstrapConfig;
///
/// let config = BootstrapConfig::builder()
///     .iterations(500)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.iterations(), 500);
/// assert_eq!(config.seed(), Some(42));
/// assert_eq!(config.min_replicates(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BootstrapConfig {
    iterations: usize,
    min_replicates: usize,
    se_floor: f64,
    t_saturation: f64,
    progress_interval: usize,
    seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            min_replicates: DEFAULT_MIN_REPLICATES,
            se_floor: DEFAULT_SE_FLOOR,
            t_saturation: DEFAULT_T_SATURATION,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    /// Number of resampling iterations.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Minimum replicates for a defined cell.
    #[inline]
    pub fn min_replicates(&self) -> usize {
        self.min_replicates
    }

    /// Standard-error floor for t saturation.
    #[inline]
    pub fn se_floor(&self) -> f64 {
        self.se_floor
    }

    /// Magnitude of a saturated t-statistic.
    #[inline]
    pub fn t_saturation(&self) -> f64 {
        self.t_saturation
    }

    /// Iterations between progress reports.
    #[inline]
    pub fn progress_interval(&self) -> usize {
        self.progress_interval
    }

    /// Optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Copy of this configuration with a different iteration count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIterationCount` for 0 or more than [`MAX_ITERATIONS`].
    pub fn with_iterations(&self, iterations: usize) -> Result<Self, ConfigError> {
        let config = Self {
            iterations,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Copy of this configuration with a different seed.
    pub fn with_seed(&self, seed: Option<u64>) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `iterations` is 0 or greater than 100,000
    /// - `min_replicates` is below 2 (a sample deviation needs two values)
    /// - `se_floor` is negative or non-finite
    /// - `t_saturation` is not finite and positive
    /// - `progress_interval` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::InvalidIterationCount(self.iterations));
        }
        if self.min_replicates < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "min_replicates",
                value: format!("must be at least 2, got {}", self.min_replicates),
            });
        }
        if !self.se_floor.is_finite() || self.se_floor < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "se_floor",
                value: format!("must be finite and >= 0, got {}", self.se_floor),
            });
        }
        if !self.t_saturation.is_finite() || self.t_saturation <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "t_saturation",
                value: format!("must be finite and > 0, got {}", self.t_saturation),
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "progress_interval",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`BootstrapConfig`].
///
/// Unset fields keep their defaults; validation happens in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct BootstrapConfigBuilder {
    iterations: Option<usize>,
    min_replicates: Option<usize>,
    se_floor: Option<f64>,
    t_saturation: Option<f64>,
    progress_interval: Option<usize>,
    seed: Option<u64>,
}

impl BootstrapConfigBuilder {
    /// Sets the number of iterations, in [1, 100_000].
    #[inline]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Sets the minimum replicate count per cell.
    #[inline]
    pub fn min_replicates(mut self, min_replicates: usize) -> Self {
        self.min_replicates = Some(min_replicates);
        self
    }

    /// Sets the standard-error floor.
    #[inline]
    pub fn se_floor(mut self, se_floor: f64) -> Self {
        self.se_floor = Some(se_floor);
        self
    }

    /// Sets the saturated t magnitude.
    #[inline]
    pub fn t_saturation(mut self, t_saturation: f64) -> Self {
        self.t_saturation = Some(t_saturation);
        self
    }

    /// Sets the progress reporting cadence.
    #[inline]
    pub fn progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = Some(progress_interval);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<BootstrapConfig, ConfigError> {
        let defaults = BootstrapConfig::default();
        let config = BootstrapConfig {
            iterations: self.iterations.unwrap_or(defaults.iterations),
            min_replicates: self.min_replicates.unwrap_or(defaults.min_replicates),
            se_floor: self.se_floor.unwrap_or(defaults.se_floor),
            t_saturation: self.t_saturation.unwrap_or(defaults.t_saturation),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}
