//! Integration tests for bootstrap significance.
//!
//! Runs the estimator and the bootstrap engine together on synthetic data
//! with known dependence structure.

use approx::assert_relative_eq;
use localcorr_bootstrap::{
    BootstrapConfig, BootstrapEngine, BootstrapError, BootstrapResult, CancellationToken,
    DEFAULT_SIGNIFICANCE_THRESHOLD,
};
use localcorr_core::math::{integrate, Grid, LocalCorrelationEstimator};
use localcorr_core::{Bandwidth, Dataset, SurfaceGrid};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

fn bivariate_normal(n: usize, rho: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = (1.0 - rho * rho).sqrt();
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for _ in 0..n {
        let a: f64 = StandardNormal.sample(&mut rng);
        let b: f64 = StandardNormal.sample(&mut rng);
        xs.push(a);
        ys.push(rho * a + scale * b);
    }
    Dataset::new(xs, ys).unwrap()
}

struct Fixture {
    dataset: Dataset,
    grid: Grid,
    bandwidth: Bandwidth,
    original: SurfaceGrid,
    density: SurfaceGrid,
}

fn fixture(dataset: Dataset, size: usize) -> Fixture {
    let grid = Grid::from_dataset(&dataset, size).unwrap();
    let bandwidth = Bandwidth::select(&dataset, None).unwrap();
    let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bandwidth);
    Fixture {
        dataset,
        grid,
        bandwidth,
        original: surface.correlation,
        density: surface.density,
    }
}

fn bootstrap(f: &Fixture, iterations: usize, seed: u64) -> BootstrapResult {
    let config = BootstrapConfig::builder()
        .iterations(iterations)
        .seed(seed)
        .build()
        .unwrap();
    BootstrapEngine::new(config, LocalCorrelationEstimator::default())
        .unwrap()
        .run(&f.dataset, &f.grid, f.bandwidth, &f.original, |_| {}, None)
        .unwrap()
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

/// Perfectly collinear data: every replicate reproduces rho = 1, so the
/// standard error collapses and t saturates instead of dividing by zero.
#[test]
fn test_identity_line_saturates() {
    let xs: Vec<f64> = (1..=10).map(f64::from).collect();
    let f = fixture(Dataset::new(xs.clone(), xs).unwrap(), 5);
    let result = bootstrap(&f, 200, 2024);

    assert!(result.t.count_defined() > 0);
    for (i, j, t) in result.t.iter() {
        if let Some(t) = t {
            assert!(!t.is_nan());
            assert_eq!(t, 10.0, "cell ({}, {})", i, j);
            assert!(result.se.get(i, j).unwrap() <= 0.001);
        }
    }
}

#[test]
fn test_independent_noise_mostly_insignificant() {
    let f = fixture(bivariate_normal(300, 0.0, 11), 10);
    let result = bootstrap(&f, 100, 5);

    let defined = result.t.count_defined();
    assert!(defined > 0);
    let significant = result.significant_cells(DEFAULT_SIGNIFICANCE_THRESHOLD).len();
    assert!(
        (significant as f64) < 0.5 * defined as f64,
        "{} of {} cells significant",
        significant,
        defined
    );
}

#[test]
fn test_dependence_increases_significance() {
    let independent = fixture(bivariate_normal(300, 0.0, 21), 10);
    let dependent = fixture(bivariate_normal(300, 0.9, 21), 10);

    let quiet = bootstrap(&independent, 100, 9)
        .significant_cells(DEFAULT_SIGNIFICANCE_THRESHOLD)
        .len();
    let loud = bootstrap(&dependent, 100, 9)
        .significant_cells(DEFAULT_SIGNIFICANCE_THRESHOLD)
        .len();
    assert!(loud > quiet, "dependent {} vs independent {}", loud, quiet);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_null_pattern_follows_original() {
    let f = fixture(bivariate_normal(80, 0.4, 3), 12);
    let result = bootstrap(&f, 60, 4);

    assert_eq!(result.size(), 12);
    for (i, j, t) in result.t.iter() {
        if t.is_some() {
            assert!(f.original.get(i, j).is_some());
            assert!(result.replicate_count(i, j) >= 10);
            assert!(result.se.get(i, j).is_some());
        }
    }
}

#[test]
fn test_same_seed_reproducible() {
    let f = fixture(bivariate_normal(100, 0.5, 8), 8);
    assert_eq!(bootstrap(&f, 40, 123), bootstrap(&f, 40, 123));
    assert_ne!(bootstrap(&f, 40, 123).se, bootstrap(&f, 40, 124).se);
}

#[test]
fn test_t_marginals_integrate_with_density() {
    let f = fixture(bivariate_normal(150, 0.6, 17), 10);
    let result = bootstrap(&f, 60, 1);
    let curves = integrate(&result.t, &f.density).unwrap();

    assert_eq!(curves.x.len(), 10);
    assert_eq!(curves.y.len(), 10);
    assert!(curves.x.iter().any(Option::is_some));
    for value in curves.x.iter().chain(curves.y.iter()).flatten() {
        assert!(value.is_finite());
    }
}

// ============================================================================
// Driving the Engine
// ============================================================================

#[test]
fn test_progress_reaches_one() {
    let f = fixture(bivariate_normal(50, 0.3, 2), 6);
    let config = BootstrapConfig::builder()
        .iterations(70)
        .seed(1)
        .build()
        .unwrap();
    let engine = BootstrapEngine::new(config, LocalCorrelationEstimator::default()).unwrap();

    let mut seen = Vec::new();
    engine
        .run(
            &f.dataset,
            &f.grid,
            f.bandwidth,
            &f.original,
            |p| seen.push(p),
            None,
        )
        .unwrap();

    assert_eq!(seen.len(), 4);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_relative_eq!(*seen.last().unwrap(), 1.0);
}

#[test]
fn test_cancellation_stops_run() {
    let f = fixture(bivariate_normal(50, 0.3, 2), 6);
    let config = BootstrapConfig::builder()
        .iterations(200)
        .seed(1)
        .build()
        .unwrap();
    let engine = BootstrapEngine::new(config, LocalCorrelationEstimator::default()).unwrap();
    let token = CancellationToken::new();
    let handle = token.clone();

    let err = engine
        .run(
            &f.dataset,
            &f.grid,
            f.bandwidth,
            &f.original,
            move |p| {
                if p >= 0.5 {
                    handle.cancel();
                }
            },
            Some(&token),
        )
        .unwrap_err();

    assert_eq!(
        err,
        BootstrapError::Cancelled {
            completed: 100,
            requested: 200
        }
    );
}

#[test]
fn test_too_few_samples_rejected() {
    let dataset = Dataset::new(vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]).unwrap();
    let grid = Grid::from_dataset(&dataset, 4).unwrap();
    let bw = Bandwidth::uniform(0.5).unwrap();
    let original = SurfaceGrid::empty(4);

    let err = BootstrapEngine::with_defaults()
        .run(&dataset, &grid, bw, &original, |_| {}, None)
        .unwrap_err();
    assert!(matches!(err, BootstrapError::Core(e) if e.is_insufficient_data()));
}
