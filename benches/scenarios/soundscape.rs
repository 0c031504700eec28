//! Benchmarks for the mixer rendering whole soundscapes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use studyflow_ambient::{config::EngineConfig, mixer::Mixer};

use crate::BLOCK_SIZES;

fn mixer_with(sounds: &[(&str, f32)]) -> Mixer {
    let mut mixer = Mixer::new(EngineConfig::default().seeded(1), 48_000.0);
    for &(name, level) in sounds {
        mixer.set_volume(name, level);
    }
    mixer
}

pub fn bench_soundscapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/soundscape");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === Single noise bed ===
        let mut mixer = mixer_with(&[("brown_noise", 0.4)]);
        group.bench_with_input(BenchmarkId::new("brown_noise", size), &size, |b, _| {
            b.iter(|| mixer.render_block(black_box(&mut buffer)))
        });

        // === Nature study preset: rain + forest ===
        let mut mixer = mixer_with(&[("rain", 0.3), ("forest", 0.2)]);
        group.bench_with_input(BenchmarkId::new("rain_forest", size), &size, |b, _| {
            b.iter(|| mixer.render_block(black_box(&mut buffer)))
        });

        // === Everything at once ===
        let mut mixer = mixer_with(&[
            ("rain", 0.3),
            ("forest", 0.3),
            ("cafe", 0.3),
            ("ocean", 0.3),
            ("brown_noise", 0.3),
            ("white_noise", 0.3),
        ]);
        group.bench_with_input(BenchmarkId::new("all_sounds", size), &size, |b, _| {
            b.iter(|| mixer.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
