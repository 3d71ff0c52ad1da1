//! Exponential parameter smoothing.

/*
Parameter Smoothing
===================

Jumping a gain or a filter cutoff from one value to another between two
samples puts a step into the signal, which is heard as a click ("zipper
noise" when it happens repeatedly during automation). Instead the parameter
approaches its target exponentially:

    current += (target - current) * coeff          0 < coeff <= 1

Each step closes the same fraction of the remaining gap, so the value
never overshoots and never oscillates; it converges monotonically.

Two ways of choosing `coeff` are supported:

  TimeConstant   applied every sample.
                 coeff = 1 - e^(-1 / (tau · sample_rate))
                 After one tau the gap has shrunk to 1/e (≈37%), after
                 five taus to under 1%. This is what a host's
                 "set target at time" ramp does.

  BlockBlend     applied once per block with a fixed fraction.
                 Cheaper, but the response time depends on block size.

A time constant of zero (or a blend factor of one) makes the parameter jump
straight to its target.
*/

/// How a `Smoother` approaches its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Per-sample approach with a time constant in seconds.
    TimeConstant { seconds: f32 },
    /// Per-block approach closing `factor` of the gap each block.
    BlockBlend { factor: f32 },
}

impl Smoothing {
    /// The 10 ms per-sample default used for gain, frequency and filter.
    pub const DEFAULT: Smoothing = Smoothing::TimeConstant { seconds: 0.01 };
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A value gliding exponentially toward a target.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    current: f32,
    target: f32,
    strategy: Smoothing,
    sample_rate: f32,
    coeff: f32,
}

impl Smoother {
    pub fn new(value: f32, strategy: Smoothing, sample_rate: f32) -> Self {
        let mut smoother = Self {
            current: value,
            target: value,
            strategy,
            sample_rate,
            coeff: 1.0,
        };
        smoother.coeff = smoother.compute_coeff();
        smoother
    }

    fn compute_coeff(&self) -> f32 {
        match self.strategy {
            Smoothing::TimeConstant { seconds } => {
                let samples = seconds * self.sample_rate;
                if samples > 0.0 && samples.is_finite() {
                    1.0 - (-1.0 / samples).exp()
                } else {
                    1.0
                }
            }
            Smoothing::BlockBlend { factor } => {
                if factor.is_finite() {
                    factor.clamp(f32::EPSILON, 1.0)
                } else {
                    1.0
                }
            }
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set a new target and change the time constant for this and later ramps.
    ///
    /// Only meaningful for the time-constant strategy; a block-blend smoother
    /// keeps its factor.
    pub fn set_target_with_time_constant(&mut self, target: f32, seconds: f32) {
        if let Smoothing::TimeConstant { .. } = self.strategy {
            self.strategy = Smoothing::TimeConstant { seconds };
            self.coeff = self.compute_coeff();
        }
        self.target = target;
    }

    /// Skip the ramp and sit on `value`.
    pub fn jump(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the value has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    #[inline]
    fn step(&mut self) {
        let gap = self.target - self.current;
        let next = self.current + gap * self.coeff;
        // Snap once a step no longer moves the value in f32.
        if next == self.current || gap.abs() <= f32::EPSILON {
            self.current = self.target;
        } else {
            self.current = next;
        }
    }

    /// Once-per-block update. Advances block-blend smoothers only.
    #[inline]
    pub fn begin_block(&mut self) {
        if let Smoothing::BlockBlend { .. } = self.strategy {
            self.step();
        }
    }

    /// Per-sample update. Advances time-constant smoothers only.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if let Smoothing::TimeConstant { .. } = self.strategy {
            if !self.is_settled() {
                self.step();
            }
        }
        self.current
    }
}
