use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        param::ParamSpec,
        smoothing::{Smoother, Smoothing},
    },
    graph::node::Stage,
};

/*
| type              | parameters          | passes          | rejects      |
| ----------------- | ------------------- | --------------- | ------------ |
| low-pass          | cutoff, resonance   | below cutoff    | above cutoff |
| high-pass         | cutoff, resonance   | above cutoff    | below cutoff |
| band-pass         | frequency, Q        | around centre   | both sides   |
| notch / band-stop | frequency, Q        | outside centre  | at centre    |

Biquad
======

A biquad is a two-pole, two-zero IIR filter:

    y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]

All four responses share that difference equation; only the coefficients
change. They come from Robert Bristow-Johnson's Audio EQ Cookbook:

    w0    = 2π · f0 / sample_rate
    alpha = sin(w0) / (2 · Q)

For low-pass and high-pass the resonance is given in dB, the way browser
audio hosts expose it, and turned into a linear Q first:

    Q = 10^(resonance / 20)         0 dB → Q = 1, 20 dB → Q = 10

Band-pass and notch take a linear Q directly (bandwidth ≈ f0 / Q).

Smoothing
---------

Frequency and Q never jump. Both glide toward their targets (10 ms time
constant by default), and the coefficients are recomputed every sample
while either is still moving, so sweeping the cutoff does not click. Once
both have settled the coefficients are left alone.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::LowPass,
        FilterType::HighPass,
        FilterType::BandPass,
        FilterType::Notch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
            FilterType::BandPass => "bandpass",
            FilterType::Notch => "notch",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The (frequency, Q) parameter pair this topology exposes.
    pub fn params(self) -> [FilterParam; 2] {
        match self {
            FilterType::LowPass | FilterType::HighPass => {
                [FilterParam::Cutoff, FilterParam::Resonance]
            }
            FilterType::BandPass | FilterType::Notch => [FilterParam::Frequency, FilterParam::Q],
        }
    }

    pub fn accepts(self, param: FilterParam) -> bool {
        self.params().contains(&param)
    }

    fn frequency_param(self) -> FilterParam {
        self.params()[0]
    }

    fn q_param(self) -> FilterParam {
        self.params()[1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterParam {
    /// Low/high-pass corner frequency (Hz).
    Cutoff,
    /// Low/high-pass resonance (dB).
    Resonance,
    /// Band-pass/notch centre frequency (Hz).
    Frequency,
    /// Band-pass/notch linear Q.
    Q,
}

const CUTOFF: ParamSpec = ParamSpec::new("cutoff", "Cutoff", 20.0, 20_000.0, 1_000.0, 1.0);
const RESONANCE: ParamSpec = ParamSpec::new("resonance", "Resonance", 0.0, 20.0, 1.0, 0.1);
const FREQUENCY: ParamSpec =
    ParamSpec::new("frequency", "Center Frequency", 20.0, 20_000.0, 1_000.0, 1.0);
const Q_FACTOR: ParamSpec = ParamSpec::new("Q", "Q Factor", 0.1, 40.0, 1.0, 0.1);

impl FilterParam {
    pub const ALL: [FilterParam; 4] = [
        FilterParam::Cutoff,
        FilterParam::Resonance,
        FilterParam::Frequency,
        FilterParam::Q,
    ];

    pub fn spec(self) -> &'static ParamSpec {
        match self {
            FilterParam::Cutoff => &CUTOFF,
            FilterParam::Resonance => &RESONANCE,
            FilterParam::Frequency => &FREQUENCY,
            FilterParam::Q => &Q_FACTOR,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.name() == name)
    }
}

/// Smallest linear Q fed into the coefficient math.
const MIN_Q: f64 = 1e-3;

pub struct Filter {
    filter_type: FilterType,
    sample_rate: f32,

    frequency: Smoother,
    q: Smoother,
    coefficients_dirty: bool,

    // Direct form I history
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,

    // Normalised coefficients (a0 = 1)
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Filter {
    pub fn new(filter_type: FilterType, smoothing: Smoothing, sample_rate: f32) -> Self {
        let frequency = filter_type.frequency_param().spec().default;
        let q = filter_type.q_param().spec().default;

        let mut filter = Self {
            filter_type,
            sample_rate,
            frequency: Smoother::new(frequency, smoothing, sample_rate),
            q: Smoother::new(q, smoothing, sample_rate),
            coefficients_dirty: true,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::LowPass, Smoothing::DEFAULT, sample_rate);
        filter.frequency.jump(cutoff_hz);
        filter.update_coefficients();
        filter
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Switch topology and reset both parameters to its defaults.
    ///
    /// The frequency glides. Q glides only between topologies that share its
    /// unit; switching between dB resonance and linear Q jumps straight to
    /// the new default.
    pub fn set_type(&mut self, filter_type: FilterType) {
        let q_default = filter_type.q_param().spec().default;
        if filter_type.q_param() == self.filter_type.q_param() {
            self.q.set_target(q_default);
        } else {
            self.q.jump(q_default);
        }
        self.frequency
            .set_target(filter_type.frequency_param().spec().default);
        self.filter_type = filter_type;
        self.coefficients_dirty = true;
    }

    /// Set a parameter target. Returns `false` (and changes nothing) when
    /// the current topology has no such parameter.
    pub fn set_parameter(&mut self, param: FilterParam, value: f32) -> bool {
        if !self.filter_type.accepts(param) || !value.is_finite() {
            return false;
        }

        match param {
            FilterParam::Cutoff | FilterParam::Frequency => self.frequency.set_target(value),
            FilterParam::Resonance | FilterParam::Q => self.q.set_target(value),
        }
        true
    }

    /// Name-based variant of `set_parameter`; unknown names are a no-op.
    pub fn set_parameter_by_name(&mut self, name: &str, value: f32) -> bool {
        FilterParam::from_name(name).is_some_and(|param| self.set_parameter(param, value))
    }

    /// Current (smoothed) cutoff or centre frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency.current()
    }

    /// Current (smoothed) resonance in dB or linear Q, per topology.
    pub fn q(&self) -> f32 {
        self.q.current()
    }

    fn update_coefficients(&mut self) {
        let sample_rate = self.sample_rate as f64;
        let frequency = self.frequency.current() as f64;
        let q = self.q.current() as f64;
        if !frequency.is_finite() || !q.is_finite() || sample_rate <= 0.0 {
            return;
        }

        let frequency = frequency.clamp(1.0, sample_rate * 0.49);
        let linear_q = match self.filter_type {
            FilterType::LowPass | FilterType::HighPass => 10f64.powf(q / 20.0),
            FilterType::BandPass | FilterType::Notch => q,
        }
        .max(MIN_Q);

        let w0 = TAU * frequency / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * linear_q);

        let (b0, b1, b2) = match self.filter_type {
            FilterType::LowPass => {
                let b = (1.0 - cos_w0) / 2.0;
                (b, 1.0 - cos_w0, b)
            }
            FilterType::HighPass => {
                let b = (1.0 + cos_w0) / 2.0;
                (b, -(1.0 + cos_w0), b)
            }
            // Constant 0 dB peak gain
            FilterType::BandPass => (alpha, 0.0, -alpha),
            FilterType::Notch => (1.0, -2.0 * cos_w0, 1.0),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
        self.coefficients_dirty = false;
    }
}

impl Stage for Filter {
    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        if !self.frequency.is_settled() || !self.q.is_settled() {
            self.frequency.next_sample();
            self.q.next_sample();
            self.coefficients_dirty = true;
        }
        if self.coefficients_dirty {
            self.update_coefficients();
        }

        let x0 = sample as f64;
        let y0 = self.b0 * x0 + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        y0 as f32
    }

    fn begin_block(&mut self) {
        let before = (self.frequency.current(), self.q.current());
        self.frequency.begin_block();
        self.q.begin_block();
        if before != (self.frequency.current(), self.q.current()) {
            self.coefficients_dirty = true;
        }
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU as TAU32;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine_block(frequency: f32, samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|n| (TAU32 * frequency * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_peak(filter: &mut Filter, frequency: f32) -> f32 {
        filter.reset();
        let mut buffer = sine_block(frequency, 4_800);
        filter.process_block(&mut buffer);
        peak_after_transient(&buffer)
    }

    fn settled(filter_type: FilterType, frequency: f32, q: f32) -> Filter {
        let mut filter = Filter::new(filter_type, Smoothing::TimeConstant { seconds: 0.0 }, SAMPLE_RATE);
        let [f_param, q_param] = filter_type.params();
        filter.set_parameter(f_param, frequency);
        filter.set_parameter(q_param, q);
        filter.process(0.0);
        filter.reset();
        filter
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = settled(FilterType::LowPass, 500.0, 0.0);
        let mut buffer = vec![1.0; 4_800];
        filter.process_block(&mut buffer);
        assert!((buffer[4_799] - 1.0).abs() < 0.01);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = settled(FilterType::HighPass, 500.0, 0.0);
        let mut buffer = vec![1.0; 4_800];
        filter.process_block(&mut buffer);
        assert!(buffer[4_799].abs() < 0.01);
    }

    #[test]
    fn lowpass_attenuates_high_frequencies() {
        let mut filter = settled(FilterType::LowPass, 500.0, 0.0);
        let peak = filtered_peak(&mut filter, 5_000.0);
        assert!(peak < 0.05, "expected high freq attenuation, got peak {peak}");
    }

    #[test]
    fn bandpass_emphasizes_centre_frequency() {
        let mut filter = settled(FilterType::BandPass, 1_000.0, 5.0);
        let centre = filtered_peak(&mut filter, 1_000.0);
        let off = filtered_peak(&mut filter, 200.0);
        assert!(centre > 0.9, "centre peak {centre}");
        assert!(centre > off * 2.0, "centre={centre}, off={off}");
    }

    #[test]
    fn notch_rejects_centre_frequency() {
        let mut filter = settled(FilterType::Notch, 1_000.0, 1.0);
        let centre = filtered_peak(&mut filter, 1_000.0);
        let off = filtered_peak(&mut filter, 200.0);
        assert!(centre * 2.0 < off, "centre={centre}, off={off}");
    }

    #[test]
    fn resonance_boosts_the_cutoff_frequency() {
        let mut flat = settled(FilterType::LowPass, 1_000.0, 0.0);
        let mut resonant = settled(FilterType::LowPass, 1_000.0, 12.0);
        let flat_peak = filtered_peak(&mut flat, 1_000.0);
        let resonant_peak = filtered_peak(&mut resonant, 1_000.0);
        assert!(
            resonant_peak > flat_peak * 2.0,
            "resonant={resonant_peak}, flat={flat_peak}"
        );
    }

    #[test]
    fn unknown_parameter_for_topology_is_ignored() {
        let mut filter = Filter::new(FilterType::LowPass, Smoothing::DEFAULT, SAMPLE_RATE);
        assert!(!filter.set_parameter(FilterParam::Q, 10.0));
        assert!(!filter.set_parameter_by_name("bogus", 10.0));
        assert!(filter.set_parameter_by_name("resonance", 3.0));

        filter.set_type(FilterType::Notch);
        assert!(!filter.set_parameter(FilterParam::Cutoff, 300.0));
        assert!(filter.set_parameter(FilterParam::Frequency, 300.0));
    }

    #[test]
    fn cutoff_changes_glide_monotonically() {
        let tau = 0.01;
        let mut filter = Filter::new(FilterType::LowPass, Smoothing::TimeConstant { seconds: tau }, SAMPLE_RATE);
        filter.set_parameter(FilterParam::Cutoff, 5_000.0);

        let mut previous = filter.frequency();
        for _ in 0..(5.0 * tau * SAMPLE_RATE) as usize {
            filter.process(0.0);
            let current = filter.frequency();
            assert!(current >= previous && current <= 5_000.0);
            previous = current;
        }
        assert!((5_000.0 - previous) / 4_000.0 < 0.01);
    }

    #[test]
    fn set_type_resets_to_topology_defaults() {
        let mut filter = Filter::new(FilterType::LowPass, Smoothing::TimeConstant { seconds: 0.0 }, SAMPLE_RATE);
        filter.set_parameter(FilterParam::Cutoff, 200.0);
        filter.set_parameter(FilterParam::Resonance, 10.0);
        filter.process(0.0);

        filter.set_type(FilterType::BandPass);
        filter.process(0.0);
        assert_eq!(filter.frequency(), 1_000.0);
        assert_eq!(filter.q(), 1.0);
    }

    #[test]
    fn switching_q_units_does_not_reinterpret_the_old_value() {
        let mut filter = Filter::new(FilterType::BandPass, Smoothing::DEFAULT, SAMPLE_RATE);
        filter.set_parameter(FilterParam::Q, 40.0);
        for _ in 0..48_000 {
            filter.process(0.0);
        }
        assert!(filter.q() > 39.0);

        // 40 read as dB would be a linear Q of 100
        filter.set_type(FilterType::LowPass);
        assert_eq!(filter.q(), 1.0);

        let mut buffer: Vec<f32> = sine_block(1_000.0, 9_600).iter().map(|s| s * 0.5).collect();
        filter.process_block(&mut buffer);
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak < 1.0, "peak {peak} after bandpass -> lowpass");
    }

    #[test]
    fn switching_within_a_q_unit_glides() {
        let mut filter = Filter::new(FilterType::LowPass, Smoothing::DEFAULT, SAMPLE_RATE);
        filter.set_parameter(FilterParam::Resonance, 12.0);
        for _ in 0..48_000 {
            filter.process(0.0);
        }

        filter.set_type(FilterType::HighPass);
        filter.process(0.0);
        assert!(filter.q() > 11.0, "resonance jumped to {}", filter.q());
    }

    #[test]
    fn extreme_settings_stay_finite() {
        for filter_type in FilterType::ALL {
            let mut filter = settled(filter_type, 30_000.0, 0.0);
            let mut buffer = sine_block(440.0, 1_024);
            filter.process_block(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()), "{}", filter_type.name());

            let mut filter = settled(filter_type, 0.0, 40.0);
            let mut buffer = sine_block(440.0, 1_024);
            filter.process_block(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()), "{}", filter_type.name());
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in FilterType::ALL {
            assert_eq!(FilterType::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FilterParam::from_name("Q"), Some(FilterParam::Q));
        assert_eq!(FilterType::from_name("comb"), None);
    }
}
