//! Phase accumulator driving every periodic waveform.

/*
Phase Accumulator
=================

An oscillator does not track "time", it tracks where it is inside one cycle
of the waveform. That position is the phase, normalised to [0, 1):

    0.0   start of the cycle
    0.5   halfway
    1.0   same point as 0.0 of the next cycle, so we wrap back

Each sample the phase advances by the phase increment:

    dt = frequency / sample_rate

At 440 Hz and 48 kHz, dt ≈ 0.00917, so one cycle takes ~109 samples.

Wrapping subtracts 1.0 instead of resetting to 0.0. Resetting would throw
away the fractional overshoot and detune the oscillator slightly; subtracting
keeps the exact position inside the next cycle.

The increment `dt` is also what the anti-aliasing code needs: it is the width
of one sample measured in cycles.
*/

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAccumulator {
    phase: f32,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Current position inside the cycle, always in `[0, 1)`.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance by `dt` cycles and wrap back into `[0, 1)`.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
            // Only reachable when dt >= 1 (frequency above the sample rate).
            if self.phase >= 1.0 {
                self.phase = self.phase.fract();
            }
        } else if self.phase < 0.0 {
            self.phase = self.phase.rem_euclid(1.0);
            if self.phase >= 1.0 {
                self.phase = 0.0;
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Phase increment for a frequency at a sample rate.
#[inline]
pub fn phase_increment(frequency: f32, sample_rate: f32) -> f32 {
    if sample_rate > 0.0 {
        frequency / sample_rate
    } else {
        0.0
    }
}
