//! Benchmarks for the gain stage.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::{amplify::Amp, smoothing::Smoothing};
use monosynth::graph::node::Stage;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        // Pre-allocate buffers
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Smoothed gain while it is still gliding
        let mut amp = Amp::new(0.0, Smoothing::DEFAULT, 48_000.0);
        let mut signal_copy = signal.clone();
        let mut up = true;
        group.bench_with_input(BenchmarkId::new("amp_gliding", size), &size, |b, _| {
            b.iter(|| {
                up = !up;
                amp.set_gain(if up { 1.0 } else { 0.0 });
                signal_copy.copy_from_slice(&signal);
                amp.process_block(black_box(&mut signal_copy));
            })
        });
    }

    group.finish();
}
