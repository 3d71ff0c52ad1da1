use rtrb::Consumer;

use crate::{
    dsp::{
        filter::{FilterParam, FilterType},
        oscillator::{ShapeParam, WaveformKind},
    },
    sequencing::sequence::NoteSequence,
};

/// A sparse set of waveform shape values (`pulseWidth`, `morph`, ...).
///
/// Fixed-size so it can ride in a `SynthMessage` without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveParams {
    values: [Option<f32>; ShapeParam::COUNT],
}

impl WaveParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: ShapeParam, value: f32) -> Self {
        self.set(param, value);
        self
    }

    pub fn set(&mut self, param: ShapeParam, value: f32) {
        self.values[param.slot()] = Some(value);
    }

    pub fn get(&self, param: ShapeParam) -> Option<f32> {
        self.values[param.slot()]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeParam, f32)> + '_ {
        ShapeParam::ALL
            .into_iter()
            .filter_map(|param| self.get(param).map(|value| (param, value)))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    /// Oscillator target frequency in Hz.
    SetFrequency(f32),
    /// Switch waveform and reset its shape parameters. `None` is silence.
    SetWaveType(Option<WaveformKind>),
    /// Amp target gain.
    SetGain(f32),
    SetWaveParams(WaveParams),
    /// Enable the filter (or switch topology) and reset its parameters.
    SetFilterType(FilterType),
    SetFilterParameter { param: FilterParam, value: f32 },
    /// Replace the running sequence and start it from the first note.
    PlaySequence(NoteSequence),
    /// Open the drone gate.
    Start,
    /// Close the drone gate or end the running sequence.
    Stop,
    /// Remove the filter from the voice pipeline.
    BypassFilter,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
