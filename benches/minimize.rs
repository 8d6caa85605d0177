use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mealy_moore::prelude::*;
use mealy_moore::random::{generate_random_mealy_with, generate_random_moore_with};

fn minimization(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize");
    let mut rng = fastrand::Rng::with_seed(0xA5);
    for size in [16, 64, 256] {
        let mealy = generate_random_mealy_with(&mut rng, 3, 2, size);
        group.bench_with_input(BenchmarkId::new("mealy", size), &mealy, |b, mm| {
            b.iter(|| black_box(mm.minimize().unwrap()))
        });

        let moore = generate_random_moore_with(&mut rng, 3, 2, size);
        group.bench_with_input(BenchmarkId::new("moore", size), &moore, |b, mm| {
            b.iter(|| black_box(mm.minimize().unwrap()))
        });
    }
    group.finish();
}

fn conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let mut rng = fastrand::Rng::with_seed(0x5A);
    for size in [16, 64, 256] {
        let mealy = generate_random_mealy_with(&mut rng, 3, 4, size).trim();
        group.bench_with_input(BenchmarkId::new("mealy-to-moore", size), &mealy, |b, mm| {
            b.iter(|| black_box(mm.to_moore().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, minimization, conversion);
criterion_main!(benches);
