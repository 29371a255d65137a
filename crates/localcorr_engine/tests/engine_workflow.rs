//! End-to-end tests of the cached engine.

use std::sync::Arc;

use localcorr_bootstrap::{BootstrapConfig, CancellationToken};
use localcorr_engine::{
    compute_bootstrap_t_stats, compute_local_correlation, EngineConfig, EstimatorConfig,
    LocalCorrelationEngine, DEFAULT_CACHE_CAPACITY,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

fn bivariate_normal(n: usize, rho: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = (1.0 - rho * rho).sqrt();
    (0..n)
        .map(|_| {
            let a: f64 = StandardNormal.sample(&mut rng);
            let b: f64 = StandardNormal.sample(&mut rng);
            (a, rho * a + scale * b)
        })
        .unzip()
}

fn engine(grid_size: usize, iterations: usize) -> LocalCorrelationEngine {
    engine_with_capacity(grid_size, iterations, DEFAULT_CACHE_CAPACITY)
}

fn engine_with_capacity(
    grid_size: usize,
    iterations: usize,
    capacity: usize,
) -> LocalCorrelationEngine {
    let config = EngineConfig::new(
        EstimatorConfig::builder()
            .grid_size(grid_size)
            .build()
            .unwrap(),
        BootstrapConfig::builder()
            .iterations(iterations)
            .seed(17)
            .build()
            .unwrap(),
    )
    .with_cache_capacity(capacity);
    LocalCorrelationEngine::new(config).unwrap()
}

// ============================================================================
// Caching
// ============================================================================

#[test]
fn test_repeated_analysis_shares_arc() {
    let engine = engine(12, 40);
    let (x, y) = bivariate_normal(200, 0.5, 1);

    let a = engine.analyse(&x, &y).unwrap();
    let b = engine.analyse(&x, &y).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let stats = engine.cache().stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_new_data_evicts_bootstrap_in_single_chart_engine() {
    let engine = engine_with_capacity(10, 40, 1);
    let (x1, y1) = bivariate_normal(150, 0.5, 2);
    let (x2, y2) = bivariate_normal(150, -0.5, 3);

    let first = engine.bootstrap(&x1, &y1, |_| {}, None).unwrap();
    let fingerprint = engine.cache().most_recent().unwrap();

    engine.analyse(&x2, &y2).unwrap();
    assert_ne!(engine.cache().most_recent(), Some(fingerprint));
    assert!(engine
        .cache()
        .bootstrap(fingerprint, &engine.config().bootstrap)
        .is_none());

    let again = engine.bootstrap(&x1, &y1, |_| {}, None).unwrap();
    assert!(!Arc::ptr_eq(&first, &again));
    assert_eq!(*first, *again);
}

#[test]
fn test_concurrent_charts_do_not_evict_each_other() {
    let engine = Arc::new(engine(10, 40));
    let datasets = [
        bivariate_normal(150, 0.5, 2),
        bivariate_normal(150, -0.5, 3),
    ];

    let firsts: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = datasets
            .iter()
            .map(|(x, y)| {
                let engine = Arc::clone(&engine);
                scope.spawn(move || engine.bootstrap(x, y, |_| {}, None).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(engine.cache().len(), 2);

    for ((x, y), first) in datasets.iter().zip(&firsts) {
        let again = engine
            .bootstrap(x, y, |_| panic!("must not rerun"), None)
            .unwrap();
        assert!(Arc::ptr_eq(first, &again));
    }
    assert_ne!(*firsts[0], *firsts[1]);
}

#[test]
fn test_cached_matches_stateless() {
    let engine = engine(9, 40);
    let (x, y) = bivariate_normal(120, 0.3, 4);

    let cached = engine.analyse(&x, &y).unwrap();
    let direct = compute_local_correlation(&x, &y, 9, None).unwrap();
    assert_eq!(*cached, direct);

    let boot = engine.bootstrap(&x, &y, |_| {}, None).unwrap();
    assert_eq!(boot.size(), 9);
    assert_eq!(boot.seed, 17);
}

// ============================================================================
// Bootstrap Through the Engine
// ============================================================================

#[test]
fn test_cancellation_surfaces_as_error() {
    let engine = engine(8, 200);
    let (x, y) = bivariate_normal(100, 0.2, 5);
    let token = CancellationToken::new();
    token.cancel();

    let err = engine.bootstrap(&x, &y, |_| {}, Some(&token)).unwrap_err();
    assert!(err.is_cancelled());
    assert!(engine
        .cache()
        .bootstrap(engine.cache().most_recent().unwrap(), &engine.config().bootstrap)
        .is_none());
}

#[test]
fn test_stateless_bootstrap_progress_monotonic() {
    let (x, y) = bivariate_normal(80, 0.6, 6);
    let surface = compute_local_correlation(&x, &y, 8, None).unwrap();
    let mut seen = Vec::new();
    let result = compute_bootstrap_t_stats(
        &x,
        &y,
        surface.grid.x(),
        surface.grid.y(),
        surface.bandwidth.hx(),
        surface.bandwidth.hy(),
        &surface.correlation,
        100,
        |p| seen.push(p),
    )
    .unwrap();

    assert_eq!(result.iterations, 100);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&1.0));
    for t in result.t.defined_values() {
        assert!(t.is_finite());
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_bootstrap_agrees() {
    let (x, y) = bivariate_normal(120, 0.4, 7);
    let sequential = engine(8, 50).bootstrap(&x, &y, |_| {}, None).unwrap();
    let parallel = engine(8, 50)
        .bootstrap_parallel(&x, &y, |_| {}, None)
        .unwrap();

    assert_eq!(sequential.replicate_counts, parallel.replicate_counts);
    for ((_, _, a), (_, _, b)) in sequential.t.iter().zip(parallel.t.iter()) {
        match (a, b) {
            (Some(a), Some(b)) => approx::assert_relative_eq!(a, b, epsilon = 1e-8),
            (None, None) => {}
            _ => panic!("null pattern differs"),
        }
    }
}
