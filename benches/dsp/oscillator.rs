//! Benchmarks for waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::{
    oscillator::{ShapeParams, WaveGenerator, WaveformKind},
    phase::{phase_increment, PhaseAccumulator},
};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let dt = phase_increment(440.0, 48_000.0);
    let params = ShapeParams::defaults();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // One entry per waveform: PolyBLEP shapes branch near edges,
        // sine-derived shapes pay for sin()/powf(), noise for the PRNG.
        for kind in WaveformKind::ALL {
            let mut generator = WaveGenerator::new(1);
            let mut phase = PhaseAccumulator::new();
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = generator.generate(
                            black_box(Some(kind)),
                            phase.phase(),
                            black_box(dt),
                            &params,
                        );
                        phase.advance(dt);
                    }
                })
            });
        }
    }

    group.finish();
}
