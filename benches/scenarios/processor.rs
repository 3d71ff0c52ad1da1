//! Benchmarks for complete processor blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::{
    control_channel,
    dsp::{filter::FilterType, oscillator::WaveformKind},
    AudioProcessor, BlockParams, ControlHandle, EngineConfig,
};

use crate::BLOCK_SIZES;

fn processor() -> (ControlHandle, AudioProcessor) {
    let config = EngineConfig::default();
    let (handle, endpoint) = control_channel(config.queue_capacity);
    (handle, AudioProcessor::new(&config, endpoint))
}

pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        // Stereo interleaved, as most devices hand it out
        let mut buffer = vec![0.0f32; size * 2];

        // === DRONE ===
        // square → amp, no filter: the cheapest audible path
        let (mut handle, mut drone) = processor();
        handle.start().unwrap();
        group.bench_with_input(BenchmarkId::new("drone", size), &size, |b, _| {
            b.iter(|| {
                drone.process(black_box(&mut buffer), 2, &BlockParams::NONE);
            })
        });

        // === FILTERED DRONE ===
        // saw → lowpass → amp
        let (mut handle, mut filtered) = processor();
        handle.set_wave_type(WaveformKind::Saw).unwrap();
        handle.set_filter_type(FilterType::LowPass).unwrap();
        handle.set_filter_parameter("cutoff", 800.0).unwrap();
        handle.start().unwrap();
        group.bench_with_input(BenchmarkId::new("filtered_drone", size), &size, |b, _| {
            b.iter(|| {
                filtered.process(black_box(&mut buffer), 2, &BlockParams::NONE);
            })
        });

        // === SEQUENCE ===
        // envelope evaluated per sample, queue re-filled each iteration
        let (mut handle, mut sequenced) = processor();
        group.bench_with_input(BenchmarkId::new("sequence", size), &size, |b, _| {
            b.iter(|| {
                let _ = handle.play_frequencies(&[261.63, 329.63, 392.0], 0.05, 0.1);
                sequenced.process(black_box(&mut buffer), 2, &BlockParams::NONE);
            })
        });
    }

    group.finish();
}
