//! Low-level DSP primitives used by the voice pipeline.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside the audio processor. They intentionally stay focused
//! on the signal-processing math; sequencing and control live elsewhere.

/// Smoothed gain stage.
pub mod amplify;
/// Attack/decay envelope for sequenced notes.
pub mod envelope;
/// Biquad filter with smoothed frequency and Q.
pub mod filter;
/// Waveform generation, PolyBLEP and the noise source.
pub mod oscillator;
/// Named parameter ranges.
pub mod param;
/// Normalised phase accumulator.
pub mod phase;
/// Exponential parameter smoothing.
pub mod smoothing;

pub use amplify::Amp;
pub use envelope::EnvelopeState;
pub use filter::{Filter, FilterParam, FilterType};
pub use oscillator::{ShapeParam, ShapeParams, WaveGenerator, WaveformKind};
pub use smoothing::{Smoother, Smoothing};
