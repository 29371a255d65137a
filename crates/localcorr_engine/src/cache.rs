//! Result cache with Arc sharing.
//!
//! A chart redraws far more often than its data changes, so the engine keeps
//! recent analyses (and their bootstraps, once computed) behind an `RwLock`,
//! keyed by a [`Fingerprint`] of everything that determines them.
//!
//! # Caching Strategy
//!
//! - Double-check locking: a miss takes the write lock and re-checks before
//!   computing, so concurrent callers never compute the same entry twice
//! - Each parameter set has its own entry; a full cache evicts the least
//!   recently used entry together with its bootstrap result
//! - With capacity 1 every miss replaces the entry, dropping the stale
//!   bootstrap
//! - Hits return the cached `Arc` without recomputation

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use localcorr_bootstrap::{BootstrapConfig, BootstrapResult};
use localcorr_core::{Bandwidth, Dataset};
use tracing::debug;

use crate::config::{EstimatorConfig, DEFAULT_CACHE_CAPACITY};
use crate::error::Result;
use crate::result::LocalCorrelationResult;

/// Structural hash of an analysis' inputs.
///
/// Covers the bit pattern of every sample, the resolved bandwidth and each
/// estimator setting. Two inputs share a fingerprint only on a 64-bit hash
/// collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint an analysis request.
    pub fn new(dataset: &Dataset, bandwidth: Bandwidth, config: &EstimatorConfig) -> Self {
        let mut hasher = DefaultHasher::new();
        dataset.len().hash(&mut hasher);
        for (x, y) in dataset.xs().iter().zip(dataset.ys()) {
            x.to_bits().hash(&mut hasher);
            y.to_bits().hash(&mut hasher);
        }
        bandwidth.hx().to_bits().hash(&mut hasher);
        bandwidth.hy().to_bits().hash(&mut hasher);
        config.grid_size().hash(&mut hasher);
        config.min_weight().to_bits().hash(&mut hasher);
        config.padding().to_bits().hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Raw hash value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that computed a new entry
    pub misses: usize,
}

struct CacheEntry {
    analysis: Arc<LocalCorrelationResult>,
    bootstrap: Option<(BootstrapConfig, Arc<BootstrapResult>)>,
    last_used: AtomicU64,
}

type Entries = HashMap<Fingerprint, CacheEntry>;

/// Thread-safe, bounded cache of analysis and bootstrap results.
pub struct ResultCache {
    entries: RwLock<Entries>,
    capacity: usize,
    clock: AtomicU64,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResultCache {
    /// Creates an empty cache holding up to 8 parameter sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding up to `capacity` parameter sets.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn touch(&self, entry: &CacheEntry) {
        entry.last_used.store(self.tick(), Ordering::Relaxed);
    }

    /// Returns the cached analysis for `fingerprint`, computing it on a miss.
    ///
    /// A failed computation leaves the cache unchanged.
    pub fn get_or_compute<F>(
        &self,
        fingerprint: Fingerprint,
        compute: F,
    ) -> Result<Arc<LocalCorrelationResult>>
    where
        F: FnOnce() -> Result<LocalCorrelationResult>,
    {
        // Fast path: read lock check
        if let Some(analysis) = self.analysis(fingerprint) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint = fingerprint.value(), "Analysis cache hit");
            return Ok(analysis);
        }

        // Slow path: write lock with double-check
        let mut entries = self.write();
        if let Some(cached) = entries.get(&fingerprint) {
            self.touch(cached);
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&cached.analysis));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(fingerprint = fingerprint.value(), "Analysis cache miss");
        let analysis = Arc::new(compute()?);

        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_used.load(Ordering::Relaxed))
                .map(|(fp, _)| *fp);
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                debug!(fingerprint = oldest.value(), "Evicted cache entry");
            }
        }
        entries.insert(
            fingerprint,
            CacheEntry {
                analysis: Arc::clone(&analysis),
                bootstrap: None,
                last_used: AtomicU64::new(self.tick()),
            },
        );
        Ok(analysis)
    }

    /// Cached analysis for `fingerprint`, if present.
    pub fn analysis(&self, fingerprint: Fingerprint) -> Option<Arc<LocalCorrelationResult>> {
        let entries = self.read();
        let entry = entries.get(&fingerprint)?;
        self.touch(entry);
        Some(Arc::clone(&entry.analysis))
    }

    /// Cached bootstrap for `fingerprint` run under `config`, if present.
    pub fn bootstrap(
        &self,
        fingerprint: Fingerprint,
        config: &BootstrapConfig,
    ) -> Option<Arc<BootstrapResult>> {
        let entries = self.read();
        let entry = entries.get(&fingerprint)?;
        let (cached_config, result) = entry.bootstrap.as_ref()?;
        if cached_config != config {
            return None;
        }
        self.touch(entry);
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!(fingerprint = fingerprint.value(), "Bootstrap cache hit");
        Some(Arc::clone(result))
    }

    /// Attach a bootstrap result to the entry for `fingerprint`.
    ///
    /// If the entry has since been evicted the result is returned but not
    /// stored.
    pub fn store_bootstrap(
        &self,
        fingerprint: Fingerprint,
        config: &BootstrapConfig,
        result: BootstrapResult,
    ) -> Arc<BootstrapResult> {
        let result = Arc::new(result);
        let mut entries = self.write();
        match entries.get_mut(&fingerprint) {
            Some(current) => {
                current.bootstrap = Some((config.clone(), Arc::clone(&result)));
            }
            None => {
                debug!(
                    fingerprint = fingerprint.value(),
                    "Discarding bootstrap for evicted entry"
                );
            }
        }
        result
    }

    /// Whether an entry for `fingerprint` is cached.
    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.read().contains_key(&fingerprint)
    }

    /// Fingerprint of the most recently used entry.
    pub fn most_recent(&self) -> Option<Fingerprint> {
        self.read()
            .iter()
            .max_by_key(|(_, e)| e.last_used.load(Ordering::Relaxed))
            .map(|(fp, _)| *fp)
    }

    /// Number of cached parameter sets.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Maximum number of cached parameter sets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Hit and miss counts since creation.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
