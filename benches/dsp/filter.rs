//! Benchmarks for the biquad filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::{
    filter::{Filter, FilterType},
    smoothing::Smoothing,
};
use monosynth::graph::node::Stage;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Settled parameters: coefficients are computed once
        for filter_type in FilterType::ALL {
            let mut filter = Filter::new(filter_type, Smoothing::DEFAULT, 48_000.0);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(filter_type.name(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        filter.process_block(black_box(&mut buffer));
                    })
                },
            );
        }

        // Sweeping cutoff: coefficients recomputed every sample
        let mut filter = Filter::lowpass(200.0, 48_000.0);
        let mut buffer = input.clone();
        let mut up = true;
        group.bench_with_input(BenchmarkId::new("lowpass_sweep", size), &size, |b, _| {
            b.iter(|| {
                up = !up;
                filter.set_parameter_by_name("cutoff", if up { 8_000.0 } else { 200.0 });
                buffer.copy_from_slice(&input);
                filter.process_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
