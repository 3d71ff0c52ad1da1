//! Smoothed gain stage.

/*
Gain
====

The amplifier is the last stage of the voice: it multiplies every sample by
the current gain.

    gain 1.0  →  unchanged
    gain 0.5  →  -6 dB
    gain 0.0  →  silence

Changing gain instantly would put a step into the waveform and click, so the
gain glides toward its target through a `Smoother`. With the default 10 ms
time constant a change is inaudible as a click yet still feels immediate.

The envelope uses the same multiplication: envelope values in [0, 1] are a
time-varying gain applied before the filter.
*/

use crate::{
    dsp::smoothing::{Smoother, Smoothing},
    graph::node::Stage,
};

/// Smoothed gain stage.
pub struct Amp {
    gain: Smoother,
}

impl Amp {
    pub fn new(gain: f32, smoothing: Smoothing, sample_rate: f32) -> Self {
        Self {
            gain: Smoother::new(gain, smoothing, sample_rate),
        }
    }

    /// Glide toward `target` using the configured smoothing.
    pub fn set_gain(&mut self, target: f32) {
        self.gain.set_target(target);
    }

    /// Glide toward `target` with an explicit time constant in seconds.
    pub fn set_gain_with_time_constant(&mut self, target: f32, seconds: f32) {
        self.gain.set_target_with_time_constant(target, seconds);
    }

    /// Current (smoothed) gain.
    pub fn gain(&self) -> f32 {
        self.gain.current()
    }

    pub fn target_gain(&self) -> f32 {
        self.gain.target()
    }
}

impl Stage for Amp {
    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        sample * self.gain.next_sample()
    }

    fn begin_block(&mut self) {
        self.gain.begin_block();
    }
}
