//! Per-chart local correlation engine.
//!
//! [`LocalCorrelationEngine`] owns an [`EngineConfig`] and a
//! [`ResultCache`]. Repeated requests for the same data return the cached
//! `Arc`. Each distinct parameter set gets its own entry, up to
//! [`EngineConfig::cache_capacity`]; the least recently used entry is evicted
//! together with its bootstrap. A capacity of 1 scopes the engine to one
//! chart, where new data replaces the entry and drops the stale bootstrap.

use std::sync::Arc;

use localcorr_bootstrap::{
    BootstrapEngine, BootstrapResult, CancellationToken, DEFAULT_SIGNIFICANCE_THRESHOLD,
};
use localcorr_core::math::{integrate, MarginalCurves};
use localcorr_core::types::MIN_SAMPLES;
use localcorr_core::{Bandwidth, Dataset};
use tracing::info;

use crate::cache::{Fingerprint, ResultCache};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::result::{analyse, LocalCorrelationResult};

/// Local correlation engine with result caching.
///
/// # Examples
///
/// ```rust
/// use localcorr_engine::LocalCorrelationEngine;
/// use std::sync::Arc;
///
/// let engine = LocalCorrelationEngine::with_defaults();
/// let xs: Vec<f64> = (1..=20).map(f64::from).collect();
/// let ys: Vec<f64> = xs.iter().map(|x| x.sqrt()).collect();
///
/// let first = engine.analyse(&xs, &ys).unwrap();
/// let second = engine.analyse(&xs, &ys).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct LocalCorrelationEngine {
    config: EngineConfig,
    cache: ResultCache,
}

/// Validated inputs of one request.
struct Prepared {
    dataset: Dataset,
    bandwidth: Bandwidth,
    fingerprint: Fingerprint,
}

impl LocalCorrelationEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cache: ResultCache::with_capacity(config.cache_capacity),
            config,
        })
    }

    /// Engine with default configuration.
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        Self {
            cache: ResultCache::with_capacity(config.cache_capacity),
            config,
        }
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Result cache.
    #[inline]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    fn prepare(&self, xs: &[f64], ys: &[f64]) -> Result<Prepared> {
        let dataset = Dataset::from_slices(xs, ys)?;
        dataset.ensure_min_len(MIN_SAMPLES)?;
        let bandwidth = Bandwidth::select(&dataset, self.config.estimator.bandwidth_override())?;
        let fingerprint = Fingerprint::new(&dataset, bandwidth, &self.config.estimator);
        Ok(Prepared {
            dataset,
            bandwidth,
            fingerprint,
        })
    }

    fn analysis_for(&self, prepared: &Prepared) -> Result<Arc<LocalCorrelationResult>> {
        self.cache.get_or_compute(prepared.fingerprint, || {
            analyse(&prepared.dataset, prepared.bandwidth, &self.config.estimator)
        })
    }

    /// Correlation surface, density and marginals for `(xs, ys)`.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` for fewer than 10 pairs
    /// - `LengthMismatch`, `NonFiniteSample` for malformed input
    /// - `DegenerateBandwidth`, `DegenerateAxis` for constant axes
    pub fn analyse(&self, xs: &[f64], ys: &[f64]) -> Result<Arc<LocalCorrelationResult>> {
        let prepared = self.prepare(xs, ys)?;
        self.analysis_for(&prepared)
    }

    /// Bootstrap t-statistics for the surface of `(xs, ys)`.
    ///
    /// Reuses the cached result when the data and bootstrap settings are
    /// unchanged.
    pub fn bootstrap<P>(
        &self,
        xs: &[f64],
        ys: &[f64],
        progress: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<Arc<BootstrapResult>>
    where
        P: FnMut(f64),
    {
        let prepared = self.prepare(xs, ys)?;
        let analysis = self.analysis_for(&prepared)?;
        let config = &self.config.bootstrap;
        if let Some(cached) = self.cache.bootstrap(prepared.fingerprint, config) {
            return Ok(cached);
        }

        let engine = BootstrapEngine::new(config.clone(), self.config.estimator.estimator()?)?;
        let result = engine.run(
            &prepared.dataset,
            &analysis.grid,
            prepared.bandwidth,
            &analysis.correlation,
            progress,
            cancel,
        )?;
        Ok(self
            .cache
            .store_bootstrap(prepared.fingerprint, config, result))
    }

    /// As [`bootstrap`](Self::bootstrap), distributing iterations with rayon.
    #[cfg(feature = "parallel")]
    pub fn bootstrap_parallel<P>(
        &self,
        xs: &[f64],
        ys: &[f64],
        progress: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<Arc<BootstrapResult>>
    where
        P: Fn(f64) + Sync,
    {
        let prepared = self.prepare(xs, ys)?;
        let analysis = self.analysis_for(&prepared)?;
        let config = &self.config.bootstrap;
        if let Some(cached) = self.cache.bootstrap(prepared.fingerprint, config) {
            return Ok(cached);
        }

        let engine = BootstrapEngine::new(config.clone(), self.config.estimator.estimator()?)?;
        let result = engine.run_parallel(
            &prepared.dataset,
            &analysis.grid,
            prepared.bandwidth,
            &analysis.correlation,
            progress,
            cancel,
        )?;
        Ok(self
            .cache
            .store_bootstrap(prepared.fingerprint, config, result))
    }

    /// Density-weighted marginals of the bootstrap t-statistics.
    pub fn t_stat_marginals<P>(
        &self,
        xs: &[f64],
        ys: &[f64],
        progress: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<MarginalCurves>
    where
        P: FnMut(f64),
    {
        let bootstrap = self.bootstrap(xs, ys, progress, cancel)?;
        let analysis = self.analyse(xs, ys)?;
        let curves = integrate(&bootstrap.t, &analysis.density)?;
        info!(
            significant = bootstrap
                .significant_cells(DEFAULT_SIGNIFICANCE_THRESHOLD)
                .len(),
            "t-statistic marginals ready"
        );
        Ok(curves)
    }
}

impl Default for LocalCorrelationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
