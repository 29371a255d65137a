//! CLI configuration management
//!
//! Handles loading configuration from TOML files, `LOCALCORR_*` environment
//! variables and command-line flags.

use std::path::Path;
use std::str::FromStr;

use clap::Args;
use localcorr_bootstrap::config::{DEFAULT_ITERATIONS, DEFAULT_PROGRESS_INTERVAL};
use localcorr_bootstrap::{BootstrapConfig, DEFAULT_SIGNIFICANCE_THRESHOLD};
use localcorr_core::math::grid::PADDING_FRACTION;
use localcorr_core::math::{DEFAULT_GRID_SIZE, DEFAULT_MIN_WEIGHT};
use localcorr_engine::{EngineConfig, EstimatorConfig};
use serde::Deserialize;
use thiserror::Error;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "localcorr.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Effective CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level when `RUST_LOG` is unset
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Grid side length
    pub grid_size: usize,
    /// Minimum kernel weight for a defined cell
    pub min_weight: f64,
    /// Padding fraction on each side of the data range
    pub padding: f64,
    /// Fixed bandwidth for both axes (Silverman's rule when unset)
    pub bandwidth: Option<f64>,
    /// Bootstrap iterations (0 disables the bootstrap)
    pub bootstrap_iterations: usize,
    /// Bootstrap seed
    pub seed: Option<u64>,
    /// Iterations between progress reports
    pub progress_interval: usize,
    /// |t| at or above which a cell counts as significant
    pub significance_threshold: f64,
    /// Run the bootstrap on the rayon thread pool
    pub parallel: bool,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            grid_size: DEFAULT_GRID_SIZE,
            min_weight: DEFAULT_MIN_WEIGHT,
            padding: PADDING_FRACTION,
            bandwidth: None,
            bootstrap_iterations: DEFAULT_ITERATIONS,
            seed: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
            parallel: false,
        }
    }
}

/// Analysis flags shared by `analyse` and `demo`
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Grid side length
    #[arg(short, long)]
    pub grid_size: Option<usize>,

    /// Fixed bandwidth for both axes
    #[arg(short, long)]
    pub bandwidth: Option<f64>,

    /// Bootstrap iterations (0 disables the bootstrap)
    #[arg(long)]
    pub bootstrap: Option<usize>,

    /// Seed for reproducible resampling
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Run the bootstrap in parallel
    #[arg(long)]
    pub parallel: bool,
}

fn parse_var<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override fields from `LOCALCORR_*` variables resolved by `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("LOCALCORR_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(v) = lookup("LOCALCORR_GRID_SIZE") {
            self.grid_size = parse_var("LOCALCORR_GRID_SIZE", &v)?;
        }
        if let Some(v) = lookup("LOCALCORR_MIN_WEIGHT") {
            self.min_weight = parse_var("LOCALCORR_MIN_WEIGHT", &v)?;
        }
        if let Some(v) = lookup("LOCALCORR_PADDING") {
            self.padding = parse_var("LOCALCORR_PADDING", &v)?;
        }
        if let Some(v) = lookup("LOCALCORR_BANDWIDTH") {
            self.bandwidth = Some(parse_var("LOCALCORR_BANDWIDTH", &v)?);
        }
        if let Some(v) = lookup("LOCALCORR_BOOTSTRAP") {
            self.bootstrap_iterations = parse_var("LOCALCORR_BOOTSTRAP", &v)?;
        }
        if let Some(v) = lookup("LOCALCORR_SEED") {
            self.seed = Some(parse_var("LOCALCORR_SEED", &v)?);
        }
        if let Some(v) = lookup("LOCALCORR_PARALLEL") {
            self.parallel = parse_var("LOCALCORR_PARALLEL", &v.to_lowercase())?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, args: &AnalysisArgs) {
        if let Some(grid_size) = args.grid_size {
            self.grid_size = grid_size;
        }
        if let Some(bandwidth) = args.bandwidth {
            self.bandwidth = Some(bandwidth);
        }
        if let Some(iterations) = args.bootstrap {
            self.bootstrap_iterations = iterations;
        }
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if args.parallel {
            self.parallel = true;
        }
    }

    /// Whether a bootstrap should run
    pub fn bootstrap_enabled(&self) -> bool {
        self.bootstrap_iterations > 0
    }

    /// Estimator settings
    pub fn estimator_config(&self) -> Result<EstimatorConfig, ConfigError> {
        EstimatorConfig::builder()
            .grid_size(self.grid_size)
            .min_weight(self.min_weight)
            .padding(self.padding)
            .bandwidth_override(self.bandwidth)
            .build()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Engine settings; the bootstrap part uses defaults when disabled
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let estimator = self.estimator_config()?;
        let bootstrap = if self.bootstrap_enabled() {
            let builder = BootstrapConfig::builder()
                .iterations(self.bootstrap_iterations)
                .progress_interval(self.progress_interval);
            let builder = match self.seed {
                Some(seed) => builder.seed(seed),
                None => builder,
            };
            builder
                .build()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?
        } else {
            BootstrapConfig::default()
        };
        Ok(EngineConfig::new(estimator, bootstrap))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.significance_threshold.is_finite() || self.significance_threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "significance_threshold",
                value: self.significance_threshold.to_string(),
            });
        }
        self.engine_config().map(|_| ())
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (explicit path, else `localcorr.toml` if present)
/// 4. Default values
pub fn build_config(path: Option<&Path>, args: &AnalysisArgs) -> Result<CliConfig, ConfigError> {
    let mut config = match path {
        Some(path) => CliConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            CliConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => CliConfig::default(),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.merge_with_cli(args);
    config.validate()?;
    Ok(config)
}
