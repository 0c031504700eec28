//! Benchmarks for noise buffer generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use studyflow_ambient::dsp::noise::{fill_noise, NoiseColor};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    let mut rng = StdRng::seed_from_u64(0);

    // One sound activation generates one buffer of this size
    for &size in &[4_096usize, 48_000] {
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("white", size), &size, |b, _| {
            b.iter(|| fill_noise(black_box(&mut buffer), NoiseColor::White, &mut rng))
        });

        group.bench_with_input(BenchmarkId::new("brown", size), &size, |b, _| {
            b.iter(|| fill_noise(black_box(&mut buffer), NoiseColor::Brown, &mut rng))
        });
    }

    group.finish();
}
