//! Benchmarks for gain automation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use studyflow_ambient::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Holding steady (no automation left)
        let mut env = Envelope::new(0.3);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(1.0), SAMPLE_RATE);
            })
        });

        // Linear gust rise
        let mut env = Envelope::new(0.02);
        env.hold_at(0.0).unwrap();
        env.linear_ramp_to(0.2, 10.0).unwrap();
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(1.0), SAMPLE_RATE);
            })
        });

        // Exponential swell tail
        let mut env = Envelope::new(0.3);
        env.hold_at(0.0).unwrap();
        env.exponential_ramp_to(0.001, 10.0).unwrap();
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(1.0), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
