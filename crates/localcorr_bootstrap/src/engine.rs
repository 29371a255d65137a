//! Bootstrap engine for local correlation significance.
//!
//! The local correlation estimator has no closed-form standard error, so it
//! is estimated empirically: resample the dataset with replacement, recompute
//! the correlation grid, and measure per-cell spread across replicates.
//!
//! ## Execution Modes
//!
//! - [`BootstrapRun::step`]: resumable; a cooperative host runs a batch,
//!   services its event loop, and resumes
//! - [`BootstrapEngine::run`]: runs to completion on the calling thread with
//!   progress callbacks and cancellation checks between iterations
//! - [`BootstrapEngine::run_parallel`]: distributes iterations with rayon
//!   (`parallel` feature)
//!
//! All three collect the same replicates for the same seed, because each
//! iteration draws from its own `(seed, iteration)` stream.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(feature = "parallel")]
use std::sync::Mutex;

use localcorr_core::math::{Grid, KernelWorkspace, LocalCorrelationEstimator};
use localcorr_core::types::MIN_SAMPLES;
use localcorr_core::{Bandwidth, Dataset, SurfaceGrid};
use tracing::{debug, info, warn};

use crate::accumulator::ReplicateGrid;
use crate::cancel::CancellationToken;
use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, ConfigError, Result};
use crate::result::{summarise, BootstrapResult};
use crate::rng::{entropy_seed, BootstrapRng};

/// Inputs shared by every iteration of one run.
struct RunContext<'a> {
    dataset: &'a Dataset,
    grid: &'a Grid,
    original: &'a SurfaceGrid,
    bandwidth: Bandwidth,
    estimator: LocalCorrelationEstimator,
    seed: u64,
}

/// Reusable per-thread buffers plus the replicates collected so far.
struct Worker {
    replicates: ReplicateGrid,
    indices: Vec<usize>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    kernels: KernelWorkspace,
}

impl Worker {
    fn new(size: usize, n: usize) -> Self {
        Self {
            replicates: ReplicateGrid::new(size),
            indices: vec![0; n],
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            kernels: KernelWorkspace::new(),
        }
    }

    fn iterate(&mut self, ctx: &RunContext<'_>, iteration: usize) {
        let n = ctx.dataset.len();
        let mut rng = BootstrapRng::for_iteration(ctx.seed, iteration);
        rng.fill_indices(&mut self.indices, n);

        ctx.dataset
            .resample_into(&self.indices, &mut self.xs, &mut self.ys);
        let resampled =
            Dataset::from_validated(std::mem::take(&mut self.xs), std::mem::take(&mut self.ys));

        let surface = ctx
            .estimator
            .estimate_with(&resampled, ctx.grid, ctx.bandwidth, &mut self.kernels);
        self.replicates.record(&surface.correlation);

        let (xs, ys) = resampled.into_parts();
        self.xs = xs;
        self.ys = ys;
    }
}

/// An in-progress bootstrap that advances in caller-controlled batches.
///
/// # Examples
///
/// ```rust
/// use localcorr_bootstrap::{BootstrapConfig, BootstrapEngine};
/// use localcorr_core::math::{Grid, KernelWorkspace, LocalCorrelationEstimator};
/// use localcorr_core::{Bandwidth, Dataset};
///
/// let xs: Vec<f64> = (0..30).map(|k| (k as f64 * 0.7).sin() + k as f64 * 0.1).collect();
/// let ys: Vec<f64> = (0..30).map(|k| (k as f64 * 1.3).cos() + k as f64 * 0.05).collect();
/// let dataset = Dataset::new(xs, ys).unwrap();
/// let grid = Grid::from_dataset(&dataset, 5).unwrap();
/// let bw = Bandwidth::select(&dataset, None).unwrap();
/// let original = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bw).correlation;
///
/// let config = BootstrapConfig::builder().iterations(40).seed(1).build().unwrap();
/// let engine = BootstrapEngine::new(config, LocalCorrelationEstimator::default()).unwrap();
/// let mut run = engine.start(&dataset, &grid, bw, &original).unwrap();
///
/// while !run.is_finished() {
///     run.step(10);
///     // hand control back to the host here
/// }
/// let result = run.finish().unwrap();
/// assert_eq!(result.iterations, 40);
/// ```
pub struct BootstrapRun<'a> {
    ctx: RunContext<'a>,
    config: BootstrapConfig,
    worker: Worker,
    completed: usize,
}

impl<'a> BootstrapRun<'a> {
    /// Run up to `max_iterations` further iterations; returns how many ran.
    pub fn step(&mut self, max_iterations: usize) -> usize {
        let remaining = self.config.iterations() - self.completed;
        let batch = max_iterations.min(remaining);
        for _ in 0..batch {
            self.worker.iterate(&self.ctx, self.completed);
            self.completed += 1;
        }
        batch
    }

    /// Iterations completed so far.
    #[inline]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Iterations requested.
    #[inline]
    pub fn requested(&self) -> usize {
        self.config.iterations()
    }

    /// Completed fraction in [0, 1].
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.completed as f64 / self.requested() as f64
    }

    /// Whether every iteration has run.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.completed >= self.requested()
    }

    /// Base seed of this run.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.ctx.seed
    }

    /// Summarise the replicates.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if called before every iteration has run.
    pub fn finish(self) -> Result<BootstrapResult> {
        if !self.is_finished() {
            return Err(BootstrapError::cancelled(self.completed, self.requested()));
        }
        Ok(summarise(
            self.ctx.original,
            &self.worker.replicates,
            &self.config,
            self.completed,
            self.ctx.seed,
        ))
    }
}

/// Bootstrap engine.
///
/// Pairs a validated [`BootstrapConfig`] with the estimator used to
/// recompute each replicate grid. The estimator must match the one that
/// produced the original grid for the t-statistics to be meaningful.
#[derive(Debug, Clone)]
pub struct BootstrapEngine {
    config: BootstrapConfig,
    estimator: LocalCorrelationEstimator,
}

impl BootstrapEngine {
    /// Create an engine, validating the configuration.
    pub fn new(
        config: BootstrapConfig,
        estimator: LocalCorrelationEstimator,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    /// Engine with default configuration and estimator.
    pub fn with_defaults() -> Self {
        Self {
            config: BootstrapConfig::default(),
            estimator: LocalCorrelationEstimator::default(),
        }
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Estimator used for replicate grids.
    #[inline]
    pub fn estimator(&self) -> LocalCorrelationEstimator {
        self.estimator
    }

    fn context<'a>(
        &self,
        dataset: &'a Dataset,
        grid: &'a Grid,
        bandwidth: Bandwidth,
        original: &'a SurfaceGrid,
    ) -> Result<RunContext<'a>> {
        dataset.ensure_min_len(MIN_SAMPLES)?;
        if original.size() != grid.size() {
            return Err(BootstrapError::GridMismatch {
                expected: grid.size(),
                actual: original.size(),
            });
        }
        let seed = self.config.seed().unwrap_or_else(entropy_seed);
        Ok(RunContext {
            dataset,
            grid,
            original,
            bandwidth,
            estimator: self.estimator,
            seed,
        })
    }

    /// Begin a resumable run.
    ///
    /// # Errors
    ///
    /// - `Core(InsufficientData)` for fewer than 10 samples
    /// - `GridMismatch` if `original` does not match `grid`
    pub fn start<'a>(
        &self,
        dataset: &'a Dataset,
        grid: &'a Grid,
        bandwidth: Bandwidth,
        original: &'a SurfaceGrid,
    ) -> Result<BootstrapRun<'a>> {
        let ctx = self.context(dataset, grid, bandwidth, original)?;
        let worker = Worker::new(grid.size(), dataset.len());
        Ok(BootstrapRun {
            ctx,
            config: self.config.clone(),
            worker,
            completed: 0,
        })
    }

    /// Run every iteration on the calling thread.
    ///
    /// `progress` receives the completed fraction every
    /// `progress_interval` iterations and exactly once with `1.0` at the end.
    /// `cancel` is checked before each iteration.
    pub fn run<P>(
        &self,
        dataset: &Dataset,
        grid: &Grid,
        bandwidth: Bandwidth,
        original: &SurfaceGrid,
        mut progress: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<BootstrapResult>
    where
        P: FnMut(f64),
    {
        let mut run = self.start(dataset, grid, bandwidth, original)?;
        let interval = self.config.progress_interval();
        info!(
            iterations = run.requested(),
            samples = dataset.len(),
            grid_size = grid.size(),
            seed = run.seed(),
            "Starting bootstrap"
        );

        while !run.is_finished() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                warn!(completed = run.completed(), "Bootstrap cancelled");
                return Err(BootstrapError::cancelled(run.completed(), run.requested()));
            }
            run.step(1);
            if run.completed() % interval == 0 || run.is_finished() {
                debug!(completed = run.completed(), "Bootstrap progress");
                progress(run.fraction());
            }
        }

        let result = run.finish()?;
        info!(defined_cells = result.t.count_defined(), "Bootstrap complete");
        Ok(result)
    }

    /// Run iterations across the rayon thread pool.
    ///
    /// Progress calls are serialised and strictly increasing; the final call
    /// is `1.0`. Cancellation is checked before each iteration on every
    /// worker.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<P>(
        &self,
        dataset: &Dataset,
        grid: &Grid,
        bandwidth: Bandwidth,
        original: &SurfaceGrid,
        progress: P,
        cancel: Option<&CancellationToken>,
    ) -> Result<BootstrapResult>
    where
        P: Fn(f64) + Sync,
    {
        let ctx = self.context(dataset, grid, bandwidth, original)?;
        let total = self.config.iterations();
        let interval = self.config.progress_interval();
        let size = grid.size();
        let n = dataset.len();
        info!(
            iterations = total,
            samples = n,
            grid_size = size,
            seed = ctx.seed,
            "Starting parallel bootstrap"
        );

        let done = AtomicUsize::new(0);
        let last_reported = Mutex::new(0usize);
        let tick = || {
            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            if count % interval != 0 || count >= total {
                return;
            }
            if let Ok(mut last) = last_reported.lock() {
                if count > *last {
                    *last = count;
                    progress(count as f64 / total as f64);
                }
            }
        };

        let replicates = (0..total)
            .into_par_iter()
            .try_fold(
                || Worker::new(size, n),
                |mut worker, iteration| {
                    if cancel.is_some_and(CancellationToken::is_cancelled) {
                        return Err(BootstrapError::cancelled(
                            done.load(Ordering::Relaxed),
                            total,
                        ));
                    }
                    worker.iterate(&ctx, iteration);
                    tick();
                    Ok(worker)
                },
            )
            .map(|worker| worker.map(|w| w.replicates))
            .try_reduce(
                || ReplicateGrid::new(size),
                |mut a, b| {
                    a.merge(&b);
                    Ok(a)
                },
            );

        let replicates = match replicates {
            Ok(replicates) => replicates,
            Err(err) => {
                warn!(error = %err, "Parallel bootstrap stopped");
                return Err(err);
            }
        };

        progress(1.0);
        let result = summarise(original, &replicates, &self.config, total, ctx.seed);
        info!(defined_cells = result.t.count_defined(), "Bootstrap complete");
        Ok(result)
    }
}
