use std::panic::{self, AssertUnwindSafe};

use crate::{
    config::EngineConfig,
    dsp::{
        amplify::Amp,
        envelope::EnvelopeState,
        filter::Filter,
        oscillator::{ShapeParams, WaveGenerator, WaveformKind},
        phase::{phase_increment, PhaseAccumulator},
        smoothing::{Smoother, Smoothing},
    },
    error::RenderFault,
    graph::{node::Stage, through::Through},
    sequencing::sequence::NoteSequence,
    synth::{
        control::RenderEndpoint,
        message::{MessageReceiver, SynthMessage},
        params::{self, BlockParams},
    },
};

/*
Audio Processor
===============

The processor owns every piece of DSP state and renders one block per call
from the audio thread:

    ┌──────────────── once per block ────────────────┐
    │ 1. drain the control queue                     │
    │ 2. apply host block parameters                 │
    │ 3. advance the sequencer                       │
    └────────────────────────────────────────────────┘
    ┌──────────────── once per sample ───────────────┐
    │ oscillator → × envelope/gate → [filter] → amp  │
    └────────────────────────────────────────────────┘

States:

    Uninitialized ──first block──→ Idle ⇄ Playing

Playing comes in two flavours. A sequence plays its notes one after another,
each shaped by the attack/decay envelope; a note is finished once the
envelope is back at zero and its whole attack + decay window has passed.
A sequence started over a sounding voice begins its first attack from the
current level.
A drone runs the oscillator continuously behind a short gate ramp until
stopped.

Synthesis runs on every block, Idle included, so the host always gets a full
block back. Idle simply multiplies the oscillator by zero.

Faults
------

Rendering runs inside `catch_unwind`. A panic halts the processor for good:
the block and every later block is silence and `process` returns `false`.
Non-finite samples are recoverable: the block is zeroed, the filter and
oscillator are reset and rendering continues next block. Both are reported
to the control side through the fault queue.
*/

/// Gate ramp used for drone start/stop and for ending a sequence early.
const GATE_SMOOTHING: Smoothing = Smoothing::TimeConstant { seconds: 0.01 };

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProcessorState {
    /// Constructed, no block rendered yet.
    Uninitialized,
    Idle,
    Playing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PlayMode {
    Drone,
    Sequence,
}

pub struct AudioProcessor {
    state: ProcessorState,
    mode: PlayMode,
    sample_rate: f32,
    smoothing: Smoothing,

    generator: WaveGenerator,
    phase: PhaseAccumulator,
    waveform: Option<WaveformKind>,
    shape: ShapeParams,
    frequency: Smoother,

    gate: Smoother,
    envelope: EnvelopeState,
    sequence: NoteSequence,

    chain: Through<Option<Filter>, Amp>,

    frame_counter: u64,
    last_params: BlockParams,
    halted: bool,
    endpoint: RenderEndpoint,
}

impl AudioProcessor {
    pub fn new(config: &EngineConfig, endpoint: RenderEndpoint) -> Self {
        let sample_rate = config.sample_rate;
        let smoothing = config.smoothing.smoothing();

        let filter = config
            .filter
            .map(|filter_type| Filter::new(filter_type, smoothing, sample_rate));
        let amp = Amp::new(config.gain, smoothing, sample_rate);

        Self {
            state: ProcessorState::Uninitialized,
            mode: PlayMode::Drone,
            sample_rate,
            smoothing,
            generator: WaveGenerator::new(config.noise_seed),
            phase: PhaseAccumulator::new(),
            waveform: Some(config.waveform),
            shape: ShapeParams::defaults(),
            frequency: Smoother::new(config.frequency, smoothing, sample_rate),
            gate: Smoother::new(0.0, GATE_SMOOTHING, sample_rate),
            envelope: EnvelopeState::new(config.attack as f64, config.decay as f64),
            sequence: NoteSequence::EMPTY,
            chain: Through::new(filter, amp),
            frame_counter: 0,
            last_params: BlockParams::NONE,
            halted: false,
            endpoint,
        }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn waveform(&self) -> Option<WaveformKind> {
        self.waveform
    }

    pub fn shape_params(&self) -> &ShapeParams {
        &self.shape
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.chain.first().as_ref()
    }

    pub fn amp(&self) -> &Amp {
        self.chain.second()
    }

    /// Current (smoothed) oscillator frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency.current()
    }

    pub fn sequence(&self) -> &NoteSequence {
        &self.sequence
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Seconds of audio rendered so far.
    pub fn now(&self) -> f64 {
        self.frame_counter as f64 / self.sample_rate as f64
    }

    /// Render one interleaved block of `out.len() / channels` frames.
    ///
    /// Every channel of a frame carries the same sample. Returns `false` once
    /// the processor has halted after a panic; the block is silent then.
    pub fn process(&mut self, out: &mut [f32], channels: usize, params: &BlockParams) -> bool {
        self.guarded(out, |this, out| this.render(out, channels, params))
    }

    fn guarded<F>(&mut self, out: &mut [f32], render: F) -> bool
    where
        F: FnOnce(&mut Self, &mut [f32]),
    {
        if self.halted {
            out.fill(0.0);
            return false;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| render(&mut *self, &mut *out)));
        if result.is_err() {
            out.fill(0.0);
            self.halted = true;
            self.endpoint.report(RenderFault::Panicked);
            return false;
        }
        true
    }

    fn render(&mut self, out: &mut [f32], channels: usize, params: &BlockParams) {
        if self.state == ProcessorState::Uninitialized {
            self.state = ProcessorState::Idle;
        }

        self.drain_messages();
        self.apply_block_params(params);
        self.advance_sequence();

        self.frequency.begin_block();
        self.gate.begin_block();
        self.chain.begin_block();

        if channels == 0 {
            out.fill(0.0);
            return;
        }

        let frames = out.len() / channels;
        let (body, tail) = out.split_at_mut(frames * channels);
        tail.fill(0.0);

        let sample_rate = self.sample_rate as f64;
        for (i, frame) in body.chunks_exact_mut(channels).enumerate() {
            let now = (self.frame_counter + i as u64) as f64 / sample_rate;

            let level = match (self.state, self.mode) {
                (ProcessorState::Playing, PlayMode::Sequence) => self.envelope.level_at(now),
                _ => self.gate.next_sample(),
            };

            let frequency = self.frequency.next_sample();
            let dt = phase_increment(frequency, self.sample_rate);
            let raw = self
                .generator
                .generate(self.waveform, self.phase.phase(), dt, &self.shape);
            self.phase.advance(dt);

            let sample = self.chain.process(raw * level);
            frame.fill(sample);
        }

        self.frame_counter += frames as u64;

        if !body.iter().all(|s| s.is_finite()) {
            body.fill(0.0);
            self.recover();
            self.endpoint.report(RenderFault::NonFiniteOutput);
        }
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.endpoint.pop() {
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::SetFrequency(frequency) => {
                if frequency.is_finite() {
                    self.frequency.set_target(frequency);
                }
            }
            SynthMessage::SetWaveType(kind) => self.set_wave_type(kind),
            SynthMessage::SetGain(gain) => {
                if gain.is_finite() {
                    self.chain.second_mut().set_gain(gain);
                }
            }
            SynthMessage::SetWaveParams(update) => {
                for (param, value) in update.iter() {
                    if value.is_finite() {
                        self.shape.set(param, value);
                    }
                }
            }
            SynthMessage::SetFilterType(filter_type) => {
                let (smoothing, sample_rate) = (self.smoothing, self.sample_rate);
                self.chain
                    .first_mut()
                    .get_or_insert_with(|| Filter::new(filter_type, smoothing, sample_rate))
                    .set_type(filter_type);
            }
            SynthMessage::SetFilterParameter { param, value } => {
                if let Some(filter) = self.chain.first_mut() {
                    filter.set_parameter(param, value);
                }
            }
            SynthMessage::PlaySequence(sequence) => self.play_sequence(sequence),
            SynthMessage::Start => self.start_drone(),
            SynthMessage::Stop => self.stop(),
            SynthMessage::BypassFilter => *self.chain.first_mut() = None,
        }
    }

    fn set_wave_type(&mut self, kind: Option<WaveformKind>) {
        self.waveform = kind;
        self.shape.reset();
    }

    fn apply_block_params(&mut self, block: &BlockParams) {
        if let Some(frequency) = params::sanitize(&params::FREQUENCY, block.frequency) {
            if self.last_params.frequency != Some(frequency) {
                self.frequency.set_target(frequency);
                self.last_params.frequency = Some(frequency);
            }
        }

        if let Some(gain) = params::sanitize(&params::GAIN, block.gain) {
            if self.last_params.gain != Some(gain) {
                self.chain.second_mut().set_gain(gain);
                self.last_params.gain = Some(gain);
            }
        }

        if let Some(index) = params::sanitize(&params::WAVEFORM, block.waveform) {
            let index = index.round();
            if self.last_params.waveform != Some(index) {
                self.set_wave_type(WaveformKind::from_index(index as usize));
                self.last_params.waveform = Some(index);
            }
        }
    }

    fn advance_sequence(&mut self) {
        if self.state != ProcessorState::Playing || self.mode != PlayMode::Sequence {
            return;
        }

        let now = self.now();
        let level = self.envelope.level_at(now);
        if level > 0.0 || !self.envelope.window_elapsed(now) {
            return;
        }

        match self.sequence.advance() {
            Some(frequency) => {
                self.frequency.jump(frequency);
                self.envelope.note_on(now);
            }
            None => {
                self.envelope.stop();
                self.state = ProcessorState::Idle;
            }
        }
    }

    fn play_sequence(&mut self, sequence: NoteSequence) {
        self.sequence = sequence;
        let Some(frequency) = self.sequence.current() else {
            self.stop();
            return;
        };

        let sounding = match (self.state, self.mode) {
            (ProcessorState::Playing, PlayMode::Sequence) => self.envelope.level(),
            _ => self.gate.current(),
        };

        self.envelope
            .set_shape(sequence.attack() as f64, sequence.decay() as f64);
        self.envelope.note_on_from(self.now(), sounding);
        if sounding == 0.0 {
            self.phase.reset();
        }
        self.frequency.jump(frequency);
        self.gate.jump(0.0);

        self.mode = PlayMode::Sequence;
        self.state = ProcessorState::Playing;
    }

    fn start_drone(&mut self) {
        if self.mode == PlayMode::Sequence {
            self.hand_envelope_to_gate();
        }
        self.mode = PlayMode::Drone;
        self.gate.set_target(1.0);
        self.state = ProcessorState::Playing;
    }

    fn stop(&mut self) {
        if self.mode == PlayMode::Sequence {
            self.hand_envelope_to_gate();
        }
        self.mode = PlayMode::Drone;
        self.gate.set_target(0.0);
        self.state = ProcessorState::Idle;
    }

    /// Continue from the envelope's current level on the gate so cutting a
    /// sequence short does not click.
    fn hand_envelope_to_gate(&mut self) {
        self.gate.jump(self.envelope.level());
        self.envelope.stop();
        self.sequence.stop();
    }

    fn recover(&mut self) {
        self.phase.reset();
        self.chain.reset();
        if !self.frequency.current().is_finite() {
            let target = self.frequency.target();
            let frequency = if target.is_finite() {
                target
            } else {
                params::FREQUENCY.spec.default
            };
            self.frequency.jump(frequency);
        }
    }
}
