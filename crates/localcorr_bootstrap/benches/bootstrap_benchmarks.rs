//! Benchmarks for localcorr_bootstrap.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use localcorr_bootstrap::{BootstrapConfig, BootstrapEngine};
use localcorr_core::math::{Grid, LocalCorrelationEstimator};
use localcorr_core::{Bandwidth, Dataset};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

fn generate_dataset(n: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for _ in 0..n {
        let a: f64 = StandardNormal.sample(&mut rng);
        let b: f64 = StandardNormal.sample(&mut rng);
        xs.push(a);
        ys.push(0.5 * a + 0.866 * b);
    }
    Dataset::new(xs, ys).unwrap()
}

fn engine(iterations: usize) -> BootstrapEngine {
    let config = BootstrapConfig::builder()
        .iterations(iterations)
        .seed(42)
        .build()
        .unwrap();
    BootstrapEngine::new(config, LocalCorrelationEstimator::default()).unwrap()
}

fn benchmark_bootstrap_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_n500_grid20");
    group.sample_size(10);

    let dataset = generate_dataset(500);
    let grid = Grid::from_dataset(&dataset, 20).unwrap();
    let bw = Bandwidth::select(&dataset, None).unwrap();
    let original = LocalCorrelationEstimator::default()
        .estimate(&dataset, &grid, bw)
        .correlation;

    for iterations in [50, 200] {
        let engine = engine(iterations);

        group.bench_with_input(
            BenchmarkId::new("sequential", iterations),
            &iterations,
            |b, _| {
                b.iter(|| {
                    engine
                        .run(black_box(&dataset), &grid, bw, &original, |_| {}, None)
                        .unwrap()
                })
            },
        );

        #[cfg(feature = "parallel")]
        group.bench_with_input(
            BenchmarkId::new("parallel", iterations),
            &iterations,
            |b, _| {
                b.iter(|| {
                    engine
                        .run_parallel(black_box(&dataset), &grid, bw, &original, |_| {}, None)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_bootstrap_modes);
criterion_main!(benches);
