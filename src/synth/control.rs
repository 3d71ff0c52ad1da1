//! The control side of the engine and the queues linking it to the render side.

use log::{debug, error, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::{
        filter::{FilterParam, FilterType},
        oscillator::{ShapeParam, WaveformKind},
    },
    error::{ControlError, RenderFault},
    sequencing::sequence::NoteSequence,
    synth::message::{MessageReceiver, SynthMessage, WaveParams},
};

/*
Control Channel
===============

Two lock-free single-producer/single-consumer queues connect the threads:

    control thread                          audio thread
    ──────────────                          ────────────
    ControlHandle ── SynthMessage ──────→   RenderEndpoint (drained each block)
    ControlHandle ←── RenderFault ───────   RenderEndpoint (on failure only)

Everything that can fail does so here, on the control side: note names are
parsed, numbers checked for NaN, names looked up. The audio thread only ever
sees ready-to-apply values and never waits on the control thread.

A full queue is reported back to the caller rather than dropping the
command.
*/

const FAULT_QUEUE_CAPACITY: usize = 16;

/// Create a connected control/render pair.
pub fn control_channel(capacity: usize) -> (ControlHandle, RenderEndpoint) {
    let (tx, rx) = RingBuffer::<SynthMessage>::new(capacity.max(1));
    let (fault_tx, fault_rx) = RingBuffer::<RenderFault>::new(FAULT_QUEUE_CAPACITY);

    (
        ControlHandle {
            tx,
            faults: fault_rx,
        },
        RenderEndpoint {
            rx,
            faults: fault_tx,
        },
    )
}

/// Render-side end of the control channel, owned by the `AudioProcessor`.
pub struct RenderEndpoint {
    rx: Consumer<SynthMessage>,
    faults: Producer<RenderFault>,
}

impl RenderEndpoint {
    /// Report a fault to the control side. Never blocks; a full fault queue
    /// drops the report.
    pub fn report(&mut self, fault: RenderFault) {
        let _ = self.faults.push(fault);
    }
}

impl MessageReceiver for RenderEndpoint {
    fn pop(&mut self) -> Option<SynthMessage> {
        MessageReceiver::pop(&mut self.rx)
    }
}

/// Control-side handle. Validates, logs and enqueues commands.
pub struct ControlHandle {
    tx: Producer<SynthMessage>,
    faults: Consumer<RenderFault>,
}

impl ControlHandle {
    /// Enqueue a raw message without validation.
    pub fn send(&mut self, message: SynthMessage) -> Result<(), ControlError> {
        self.tx.push(message).map_err(|_| {
            warn!("Control queue full, dropping {:?}", message);
            ControlError::QueueFull
        })
    }

    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), ControlError> {
        check_finite("frequency", frequency)?;
        if frequency < 0.0 {
            return Err(ControlError::InvalidValue {
                name: "frequency",
                value: frequency,
            });
        }
        self.send(SynthMessage::SetFrequency(frequency))?;
        debug!("Set frequency to {} Hz", frequency);
        Ok(())
    }

    pub fn set_wave_type(&mut self, kind: WaveformKind) -> Result<(), ControlError> {
        self.send(SynthMessage::SetWaveType(Some(kind)))?;
        debug!("Set wave type to {}", kind.name());
        Ok(())
    }

    /// Select a waveform by name. Unknown names select silence.
    pub fn set_wave_type_by_name(&mut self, name: &str) -> Result<(), ControlError> {
        match WaveformKind::from_name(name) {
            Some(kind) => self.set_wave_type(kind),
            None => {
                warn!("Unknown wave type '{}', output will be silent", name);
                self.send(SynthMessage::SetWaveType(None))
            }
        }
    }

    /// Set the amp target gain in `[0, 1]`.
    pub fn set_gain(&mut self, gain: f32) -> Result<(), ControlError> {
        check_finite("gain", gain)?;
        if !(0.0..=1.0).contains(&gain) {
            return Err(ControlError::InvalidValue {
                name: "gain",
                value: gain,
            });
        }
        self.send(SynthMessage::SetGain(gain))?;
        debug!("Set gain to {}", gain);
        Ok(())
    }

    /// Update shape parameters by name (`("pulseWidth", 0.3)`).
    ///
    /// Unknown names are skipped with a warning; a non-finite value rejects
    /// the whole update.
    pub fn set_wave_params(&mut self, params: &[(&str, f32)]) -> Result<(), ControlError> {
        let mut update = WaveParams::new();
        for &(name, value) in params {
            let Some(param) = ShapeParam::from_name(name) else {
                warn!("Unknown wave parameter '{}', ignoring", name);
                continue;
            };
            check_finite(param.name(), value)?;
            update.set(param, value);
        }

        if update.is_empty() {
            return Ok(());
        }
        self.send(SynthMessage::SetWaveParams(update))?;
        debug!("Set wave params {:?}", params);
        Ok(())
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) -> Result<(), ControlError> {
        self.send(SynthMessage::SetFilterType(filter_type))?;
        debug!("Set filter type to {}", filter_type.name());
        Ok(())
    }

    /// Select a filter topology by name. Unknown names are a no-op.
    pub fn set_filter_type_by_name(&mut self, name: &str) -> Result<(), ControlError> {
        match FilterType::from_name(name) {
            Some(filter_type) => self.set_filter_type(filter_type),
            None => {
                warn!("Unknown filter type '{}', ignoring", name);
                Ok(())
            }
        }
    }

    /// Set a filter parameter by name (`"cutoff"`, `"resonance"`,
    /// `"frequency"`, `"Q"`). Unknown names are a no-op.
    pub fn set_filter_parameter(&mut self, name: &str, value: f32) -> Result<(), ControlError> {
        let Some(param) = FilterParam::from_name(name) else {
            warn!("Unknown filter parameter '{}', ignoring", name);
            return Ok(());
        };
        check_finite(param.name(), value)?;
        self.send(SynthMessage::SetFilterParameter { param, value })?;
        debug!("Set filter parameter {} to {}", name, value);
        Ok(())
    }

    /// Parse `notes` and start playing them, each with the same envelope.
    pub fn play_sequence<S: AsRef<str>>(
        &mut self,
        notes: &[S],
        attack: f32,
        decay: f32,
    ) -> Result<(), ControlError> {
        let sequence = NoteSequence::from_notes(notes, attack, decay)?;
        self.send(SynthMessage::PlaySequence(sequence))?;
        debug!(
            "Play sequence of {} notes (attack {}s, decay {}s)",
            sequence.len(),
            attack,
            decay
        );
        Ok(())
    }

    pub fn play_frequencies(
        &mut self,
        frequencies: &[f32],
        attack: f32,
        decay: f32,
    ) -> Result<(), ControlError> {
        let sequence = NoteSequence::from_frequencies(frequencies, attack, decay)?;
        self.send(SynthMessage::PlaySequence(sequence))?;
        debug!("Play sequence {:?}", sequence.frequencies());
        Ok(())
    }

    /// Start the free-running drone.
    pub fn start(&mut self) -> Result<(), ControlError> {
        self.send(SynthMessage::Start)?;
        debug!("Start");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ControlError> {
        self.send(SynthMessage::Stop)?;
        debug!("Stop");
        Ok(())
    }

    pub fn bypass_filter(&mut self) -> Result<(), ControlError> {
        self.send(SynthMessage::BypassFilter)?;
        debug!("Bypass filter");
        Ok(())
    }

    /// Take the next fault reported by the render context, if any.
    pub fn poll_fault(&mut self) -> Option<RenderFault> {
        let fault = self.faults.pop().ok()?;
        error!("Audio processor fault: {}", fault);
        Some(fault)
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ControlError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ControlError::NonFinite { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(endpoint: &mut RenderEndpoint) -> Vec<SynthMessage> {
        std::iter::from_fn(|| endpoint.pop()).collect()
    }

    #[test]
    fn commands_arrive_in_order() {
        let (mut handle, mut endpoint) = control_channel(8);
        handle.set_frequency(220.0).unwrap();
        handle.set_wave_type(WaveformKind::Saw).unwrap();
        handle.set_gain(0.25).unwrap();

        assert_eq!(
            drain(&mut endpoint),
            vec![
                SynthMessage::SetFrequency(220.0),
                SynthMessage::SetWaveType(Some(WaveformKind::Saw)),
                SynthMessage::SetGain(0.25),
            ]
        );
    }

    #[test]
    fn full_queue_is_reported() {
        let (mut handle, _endpoint) = control_channel(1);
        handle.start().unwrap();
        assert_eq!(handle.stop(), Err(ControlError::QueueFull));
    }

    #[test]
    fn rejects_non_finite_values() {
        let (mut handle, mut endpoint) = control_channel(8);
        assert!(matches!(
            handle.set_frequency(f32::NAN),
            Err(ControlError::NonFinite { .. })
        ));
        assert!(matches!(
            handle.set_wave_params(&[("morph", f32::INFINITY)]),
            Err(ControlError::NonFinite { name: "morph" })
        ));
        assert!(matches!(
            handle.set_gain(1.5),
            Err(ControlError::InvalidValue { name: "gain", .. })
        ));
        assert!(drain(&mut endpoint).is_empty());
    }

    #[test]
    fn unknown_names_are_soft() {
        let (mut handle, mut endpoint) = control_channel(8);
        handle.set_wave_type_by_name("wobble").unwrap();
        handle.set_filter_type_by_name("comb").unwrap();
        handle.set_filter_parameter("drive", 1.0).unwrap();
        handle.set_wave_params(&[("bogus", 1.0)]).unwrap();

        assert_eq!(drain(&mut endpoint), vec![SynthMessage::SetWaveType(None)]);
    }

    #[test]
    fn wave_params_skip_unknown_names() {
        let (mut handle, mut endpoint) = control_channel(8);
        handle
            .set_wave_params(&[("bogus", 1.0), ("pulseWidth", 0.3)])
            .unwrap();

        let expected = WaveParams::new().with(ShapeParam::PulseWidth, 0.3);
        assert_eq!(
            drain(&mut endpoint),
            vec![SynthMessage::SetWaveParams(expected)]
        );
    }

    #[test]
    fn malformed_sequence_is_not_sent() {
        let (mut handle, mut endpoint) = control_channel(8);
        assert!(matches!(
            handle.play_sequence(&["c4", "4a"], 0.1, 0.1),
            Err(ControlError::Parse(_))
        ));
        assert!(drain(&mut endpoint).is_empty());

        handle.play_sequence(&["c4", "e4"], 0.1, 0.1).unwrap();
        assert!(matches!(
            drain(&mut endpoint).as_slice(),
            [SynthMessage::PlaySequence(sequence)] if sequence.len() == 2
        ));
    }

    #[test]
    fn faults_flow_back_to_the_handle() {
        let (mut handle, mut endpoint) = control_channel(8);
        assert_eq!(handle.poll_fault(), None);
        endpoint.report(RenderFault::NonFiniteOutput);
        assert_eq!(handle.poll_fault(), Some(RenderFault::NonFiniteOutput));
        assert_eq!(handle.poll_fault(), None);
    }
}
