//! Integration tests for the local correlation estimator.
//!
//! These tests exercise the public surface end to end: bandwidth
//! selection, grid construction, full-grid estimation and marginal
//! integration.

use approx::assert_relative_eq;
use localcorr_core::math::stats::pearson;
use localcorr_core::math::{integrate, Grid, LocalCorrelationEstimator};
use localcorr_core::types::{Bandwidth, Dataset};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

fn one_to_ten() -> Dataset {
    let xs: Vec<f64> = (1..=10).map(f64::from).collect();
    Dataset::new(xs.clone(), xs).unwrap()
}

// ============================================================================
// Shape and Range
// ============================================================================

#[test]
fn test_output_shapes_follow_grid_size() {
    let dataset = one_to_ten();
    for size in [2, 5, 17, 30] {
        let grid = Grid::from_dataset(&dataset, size).unwrap();
        let bw = Bandwidth::select(&dataset, None).unwrap();
        let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bw);

        assert_eq!(grid.x().len(), size);
        assert_eq!(grid.y().len(), size);
        assert_eq!(surface.correlation.size(), size);
        assert_eq!(surface.density.size(), size);
        assert_eq!(surface.correlation.cells().len(), size * size);
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

/// x = y = 1..10 on a 5x5 grid: every defined cell is a perfect correlation.
#[test]
fn test_identity_line_scenario() {
    let dataset = one_to_ten();
    let grid = Grid::from_dataset(&dataset, 5).unwrap();
    let bw = Bandwidth::select(&dataset, None).unwrap();
    let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bw);

    assert!(surface.correlation.count_defined() > 0);
    for rho in surface.correlation.defined_values() {
        assert_relative_eq!(rho, 1.0, epsilon = 1e-9);
    }

    let curves = integrate(&surface.correlation, &surface.density).unwrap();
    assert!(curves.x.iter().any(Option::is_some));
    for value in curves.x.iter().chain(curves.y.iter()).flatten() {
        assert_relative_eq!(*value, 1.0, epsilon = 1e-9);
    }
}

/// Perfect negative linear relation with a bandwidth spanning the data.
#[test]
fn test_linear_relation_sign() {
    let xs: Vec<f64> = (0..40).map(|k| k as f64 * 0.25).collect();
    let ys: Vec<f64> = xs.iter().map(|x| 4.0 - 3.0 * x).collect();
    let dataset = Dataset::new(xs, ys).unwrap();
    let grid = Grid::from_dataset(&dataset, 10).unwrap();
    let bw = Bandwidth::new(5.0, 15.0).unwrap();
    let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bw);

    assert!(surface.correlation.count_defined() > 0);
    for rho in surface.correlation.defined_values() {
        assert_relative_eq!(rho, -1.0, epsilon = 1e-9);
    }
}

/// A bandwidth far wider than the data collapses every cell to the global Pearson value.
#[test]
fn test_global_neighbourhood_equals_pearson() {
    let mut rng = StdRng::seed_from_u64(7);
    let xs: Vec<f64> = (0..200).map(|_| StandardNormal.sample(&mut rng)).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| {
            let noise: f64 = StandardNormal.sample(&mut rng);
            0.6 * x + 0.8 * noise
        })
        .collect();
    let expected = pearson(&xs, &ys).unwrap();

    let dataset = Dataset::new(xs, ys).unwrap();
    let grid = Grid::from_dataset(&dataset, 3).unwrap();
    let bw = Bandwidth::uniform(1e5).unwrap();
    let surface = LocalCorrelationEstimator::default().estimate(&dataset, &grid, bw);

    let centre = surface.correlation.get(1, 1).unwrap();
    assert_relative_eq!(centre, expected, epsilon = 1e-6);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_repeated_calls_bit_identical() {
    let mut rng = StdRng::seed_from_u64(99);
    let xs: Vec<f64> = (0..150).map(|_| StandardNormal.sample(&mut rng)).collect();
    let ys: Vec<f64> = (0..150).map(|_| StandardNormal.sample(&mut rng)).collect();
    let dataset = Dataset::new(xs, ys).unwrap();
    let grid = Grid::from_dataset(&dataset, 30).unwrap();
    let bw = Bandwidth::select(&dataset, None).unwrap();
    let estimator = LocalCorrelationEstimator::default();

    let first = estimator.estimate(&dataset, &grid, bw);
    let second = estimator.estimate(&dataset, &grid, bw);

    let bits = |g: &localcorr_core::SurfaceGrid| -> Vec<Option<u64>> {
        g.cells().iter().map(|c| c.map(f64::to_bits)).collect()
    };
    assert_eq!(bits(&first.correlation), bits(&second.correlation));
    assert_eq!(bits(&first.density), bits(&second.density));
}

// ============================================================================
// Degenerate Inputs
// ============================================================================

#[test]
fn test_constant_axis_rejected() {
    let dataset = Dataset::new((0..20).map(f64::from).collect(), vec![2.5; 20]).unwrap();
    assert!(Bandwidth::select(&dataset, None)
        .unwrap_err()
        .is_degenerate_bandwidth());
    assert!(Grid::from_dataset(&dataset, 10)
        .unwrap_err()
        .is_degenerate_axis());
}
