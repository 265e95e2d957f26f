//! Benchmarks comparing the determinant engines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pivotal_det::{determinant, determinant_block, determinant_static, EngineConfig};
use pivotal_matrix::SquareMatrix;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generates a random integer-valued matrix with a fixed seed.
fn random_matrix(size: usize, seed: u64) -> SquareMatrix {
    let mut m = SquareMatrix::zeros(size);
    m.fill_random(-10, 10, &mut ChaCha8Rng::seed_from_u64(seed));
    m
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential");

    for size in [16, 32, 64, 128] {
        let m = random_matrix(size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(determinant(&m)))
        });
    }

    group.finish();
}

fn bench_dynamic_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_block_256");
    group.sample_size(20);

    let m = random_matrix(256, 42);
    group.bench_function("sequential_baseline", |b| {
        b.iter(|| black_box(determinant(&m)))
    });

    for threads in [2, 4, 8] {
        let config = EngineConfig {
            max_threads: threads,
            static_threshold: usize::MAX,
            ..EngineConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| black_box(determinant_block(&m, &config)))
        });
    }

    group.finish();
}

fn bench_static_barrier(c: &mut Criterion) {
    let mut group = c.benchmark_group("static_barrier_256");
    group.sample_size(20);

    let m = random_matrix(256, 42);
    for threads in [2, 4, 8] {
        let config = EngineConfig {
            max_threads: threads,
            static_threshold: 2,
            ..EngineConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| black_box(determinant_static(&m, &config)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sequential,
    bench_dynamic_block,
    bench_static_barrier
);

criterion_main!(benches);
