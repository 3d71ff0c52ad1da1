//! Real-world scenario benchmarks.
//!
//! These benchmarks drive the whole `AudioProcessor` the way an audio
//! callback does: drain the queue, then render a block.

mod processor;

pub use processor::bench_processor;
