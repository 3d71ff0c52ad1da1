use std::f32::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::param::ParamSpec;

/*
Waveform Generation
===================

Every waveform here is a pure function of the phase (position inside one
cycle, [0, 1)) plus at most one shape parameter. The oscillator keeps no
memory between samples except the shared noise pool.

    sine         sin(2π·phase)                      pure tone, no harmonics
    square       +1 for the first half, -1 after     odd harmonics
    saw          ramp from -1 to +1                  all harmonics
    triangle     folded ramp                         odd harmonics, 1/n² rolloff
    pulse        square with a movable duty cycle    thinner as width → 0.1/0.9
    noise        random values from a pool           no pitch
    sine-square  sine pushed toward square by morph  adds odd harmonics smoothly
    double-sine  fundamental + octave, crossfaded    organ-like
    fold-sine    sine + sine at foldAmount × phase   wavefolder-ish growl

Aliasing and PolyBLEP
---------------------

A naive square or saw jumps from one value to another between two samples.
That jump contains energy at every frequency, and everything above Nyquist
folds back into the audible band as inharmonic whine.

PolyBLEP ("polynomial band-limited step") replaces the hard jump with a
short polynomial ramp spread over one sample either side of the edge.
`dt` is the width of one sample in cycles, so the correction only touches
the sample just before and the sample just after each discontinuity:

       naive                 corrected
    +1 ───┐                +1 ───╮
          │                       ╲
    -1    └───             -1      ╰───

The correction for an upward step is added, for a downward step it is
subtracted. A saw has one downward step at phase 0; a square has an upward
step at 0 and a downward step at 0.5; a pulse moves that second step to the
pulse width.

Triangle has no jump in value, only in slope, and its harmonics already fall
off as 1/n², so it is used as-is.

All periodic outputs except sine and triangle are scaled by 0.5 to leave
headroom for the filter's resonance peak.
*/

/// The closed set of waveforms the generator can produce.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveformKind {
    Sine,
    Square,
    Saw,
    Triangle,
    Pulse,
    Noise,
    SineSquare,
    DoubleSine,
    FoldSine,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 9] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Saw,
        WaveformKind::Triangle,
        WaveformKind::Pulse,
        WaveformKind::Noise,
        WaveformKind::SineSquare,
        WaveformKind::DoubleSine,
        WaveformKind::FoldSine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveformKind::Sine => "sine",
            WaveformKind::Square => "square",
            WaveformKind::Saw => "saw",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Pulse => "pulse",
            WaveformKind::Noise => "noise",
            WaveformKind::SineSquare => "sine-square",
            WaveformKind::DoubleSine => "double-sine",
            WaveformKind::FoldSine => "fold-sine",
        }
    }

    /// Look a waveform up by its wire name. Unknown names yield `None`,
    /// which the processor renders as silence.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Waveform for a select index (the processor's `waveform` parameter).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The one shape parameter this waveform exposes, if any.
    pub fn shape_param(self) -> Option<ShapeParam> {
        match self {
            WaveformKind::Pulse => Some(ShapeParam::PulseWidth),
            WaveformKind::SineSquare => Some(ShapeParam::Morph),
            WaveformKind::DoubleSine => Some(ShapeParam::Mix),
            WaveformKind::FoldSine => Some(ShapeParam::FoldAmount),
            WaveformKind::Sine
            | WaveformKind::Square
            | WaveformKind::Saw
            | WaveformKind::Triangle
            | WaveformKind::Noise => None,
        }
    }
}

/// Named shape parameters. Each belongs to exactly one waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeParam {
    PulseWidth,
    Morph,
    Mix,
    FoldAmount,
}

const PULSE_WIDTH: ParamSpec = ParamSpec::new("pulseWidth", "Pulse Width", 0.1, 0.9, 0.5, 0.01);
const MORPH: ParamSpec = ParamSpec::new("morph", "Sine → Square", 0.0, 1.0, 0.5, 0.01);
const MIX: ParamSpec = ParamSpec::new("mix", "Octave Mix", 0.0, 1.0, 0.5, 0.01);
const FOLD_AMOUNT: ParamSpec = ParamSpec::new("foldAmount", "Fold Amount", 1.0, 10.0, 1.0, 0.1);

impl ShapeParam {
    pub const COUNT: usize = 4;
    pub const ALL: [ShapeParam; Self::COUNT] = [
        ShapeParam::PulseWidth,
        ShapeParam::Morph,
        ShapeParam::Mix,
        ShapeParam::FoldAmount,
    ];

    pub fn spec(self) -> &'static ParamSpec {
        match self {
            ShapeParam::PulseWidth => &PULSE_WIDTH,
            ShapeParam::Morph => &MORPH,
            ShapeParam::Mix => &MIX,
            ShapeParam::FoldAmount => &FOLD_AMOUNT,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.name() == name)
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Current shape parameter values. Unset parameters read as their default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    values: [f32; ShapeParam::COUNT],
}

impl ShapeParams {
    pub fn defaults() -> Self {
        let mut values = [0.0; ShapeParam::COUNT];
        for param in ShapeParam::ALL {
            values[param.slot()] = param.spec().default;
        }
        Self { values }
    }

    #[inline]
    pub fn get(&self, param: ShapeParam) -> f32 {
        self.values[param.slot()]
    }

    pub fn set(&mut self, param: ShapeParam, value: f32) {
        self.values[param.slot()] = value;
    }

    pub fn reset(&mut self) {
        *self = Self::defaults();
    }
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Polynomial band-limited step correction.
///
/// `t` is the phase distance past a discontinuity (wrapped into `[0, 1)`),
/// `dt` the phase increment per sample. Returns a value in `[-1, 1]` that is
/// non-zero only within one sample of the step.
#[inline]
pub fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let u = t / dt;
        u + u - u * u - 1.0
    } else if t > 1.0 - dt {
        let u = (t - 1.0) / dt;
        u * u + u + u + 1.0
    } else {
        0.0
    }
}

pub const NOISE_BUFFER_LEN: usize = 1024;
/// Generate calls between refreshing one noise cell.
pub const NOISE_REFRESH_INTERVAL: u32 = 100;

/// Preallocated pool of random values backing the noise waveform.
///
/// Every call reads one random cell; every `NOISE_REFRESH_INTERVAL` calls one
/// random cell is replaced. Nothing is allocated after construction.
pub struct NoiseBuffer {
    cells: [f32; NOISE_BUFFER_LEN],
    calls: u32,
    rng: SmallRng,
}

impl NoiseBuffer {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut cells = [0.0; NOISE_BUFFER_LEN];
        for cell in cells.iter_mut() {
            *cell = rng.gen_range(-1.0..=1.0);
        }

        Self {
            cells,
            calls: 0,
            rng,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.calls += 1;
        if self.calls >= NOISE_REFRESH_INTERVAL {
            self.calls = 0;
            let slot = self.rng.gen_range(0..NOISE_BUFFER_LEN);
            self.cells[slot] = self.rng.gen_range(-1.0..=1.0);
        }

        let read = self.rng.gen_range(0..NOISE_BUFFER_LEN);
        self.cells[read] * 0.5
    }
}

/// Stateless waveform evaluation plus the shared noise pool.
pub struct WaveGenerator {
    noise: NoiseBuffer,
}

impl WaveGenerator {
    pub fn new(noise_seed: u64) -> Self {
        Self {
            noise: NoiseBuffer::new(noise_seed),
        }
    }

    /// Evaluate one sample.
    ///
    /// `kind == None` is an unrecognised waveform and produces silence.
    #[inline]
    pub fn generate(
        &mut self,
        kind: Option<WaveformKind>,
        phase: f32,
        dt: f32,
        params: &ShapeParams,
    ) -> f32 {
        let Some(kind) = kind else {
            return 0.0;
        };

        match kind {
            WaveformKind::Sine => sine(phase),
            WaveformKind::Square => square(phase, dt),
            WaveformKind::Saw => saw(phase, dt),
            WaveformKind::Triangle => triangle(phase),
            WaveformKind::Pulse => pulse(phase, dt, params.get(ShapeParam::PulseWidth)),
            WaveformKind::Noise => self.noise.next_sample(),
            WaveformKind::SineSquare => sine_square(phase, params.get(ShapeParam::Morph)),
            WaveformKind::DoubleSine => double_sine(phase, params.get(ShapeParam::Mix)),
            WaveformKind::FoldSine => fold_sine(phase, params.get(ShapeParam::FoldAmount)),
        }
    }
}

#[inline]
fn sine(phase: f32) -> f32 {
    (TAU * phase).sin()
}

#[inline]
fn square(phase: f32, dt: f32) -> f32 {
    let mut value = if phase < 0.5 { 1.0 } else { -1.0 };
    value += poly_blep(phase, dt);
    value -= poly_blep((phase + 0.5).rem_euclid(1.0), dt);
    value * 0.5
}

#[inline]
fn saw(phase: f32, dt: f32) -> f32 {
    let mut value = 2.0 * phase - 1.0;
    value -= poly_blep(phase, dt);
    value * 0.5
}

#[inline]
fn triangle(phase: f32) -> f32 {
    2.0 * (2.0 * (phase - (phase + 0.5).floor())).abs() - 1.0
}

#[inline]
fn pulse(phase: f32, dt: f32, width: f32) -> f32 {
    let mut value = if phase < width { 1.0 } else { -1.0 };
    value += poly_blep(phase, dt);
    value -= poly_blep((phase + (1.0 - width)).rem_euclid(1.0), dt);
    value * 0.5
}

#[inline]
fn sine_square(phase: f32, morph: f32) -> f32 {
    let s = sine(phase);
    if s == 0.0 {
        return 0.0;
    }
    s.signum() * s.abs().powf(1.0 - morph) * 0.5
}

#[inline]
fn double_sine(phase: f32, mix: f32) -> f32 {
    let fundamental = sine(phase);
    let octave = (2.0 * TAU * phase).sin();
    (fundamental * (1.0 - mix) + octave * mix) * 0.5
}

#[inline]
fn fold_sine(phase: f32, fold_amount: f32) -> f32 {
    let s = sine(phase);
    let folded = (TAU * phase * fold_amount).sin();
    (s + folded) * 0.25
}
