//! Benchmarks for the attack/decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::envelope::EnvelopeState;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sample_period = 1.0 / 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = EnvelopeState::new(0.1, 0.3);
        env.note_on(0.0);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample = env.level_at(black_box(i as f64 * sample_period));
                }
            })
        });

        // Decay phase (ramping down)
        let mut env = EnvelopeState::new(0.001, 0.3);
        env.note_on(0.0);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample = env.level_at(black_box(0.1 + i as f64 * sample_period));
                }
            })
        });
    }

    group.finish();
}
