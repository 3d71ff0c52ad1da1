//! Audio host: opens the output device and drives the processor from its callback.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};

use monosynth::{
    control_channel,
    dsp::{filter::FilterType, oscillator::WaveformKind},
    AudioProcessor, BlockParams, ControlHandle, EngineConfig, MAX_BLOCK_SIZE,
};

use super::cli::{DroneArgs, PlayArgs, VoiceArgs};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// Extra time after the last note so its decay and the gate ramp finish.
const TAIL: Duration = Duration::from_millis(100);

/// A running output stream and the handle that controls it.
struct Session {
    handle: ControlHandle,
    _stream: cpal::Stream,
}

impl Session {
    fn open(mut config: EngineConfig) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        config.sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        info!("Output: {} Hz, {} channels", config.sample_rate, channels);

        let (handle, endpoint) = control_channel(config.queue_capacity);
        let mut processor = AudioProcessor::new(&config, endpoint);

        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                for block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    processor.process(block, channels, &BlockParams::NONE);
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            handle,
            _stream: stream,
        })
    }

    fn apply_voice(&mut self, voice: &VoiceArgs) -> EyreResult<()> {
        if let Some(name) = &voice.wave {
            let kind = WaveformKind::from_name(name)
                .ok_or_else(|| eyre!("unknown waveform '{}'", name))?;
            self.handle.set_wave_type(kind)?;
        }
        if let Some(gain) = voice.gain {
            self.handle.set_gain(gain)?;
        }
        if let Some(name) = &voice.filter {
            let filter_type = FilterType::from_name(name)
                .ok_or_else(|| eyre!("unknown filter type '{}'", name))?;
            self.handle.set_filter_type(filter_type)?;

            let [frequency_param, q_param] = filter_type.params();
            if let Some(cutoff) = voice.cutoff {
                self.handle
                    .set_filter_parameter(frequency_param.name(), cutoff)?;
            }
            if let Some(resonance) = voice.resonance {
                self.handle.set_filter_parameter(q_param.name(), resonance)?;
            }
        }
        Ok(())
    }

    /// Keep the stream alive for `duration`, logging any render faults.
    fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now().checked_add(duration);
        while deadline.map_or(true, |deadline| Instant::now() < deadline) {
            while self.handle.poll_fault().is_some() {}
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

pub fn play(config: EngineConfig, args: PlayArgs) -> EyreResult<()> {
    let attack = args.attack.unwrap_or(config.attack);
    let decay = args.decay.unwrap_or(config.decay);

    let mut session = Session::open(config)?;
    session.apply_voice(&args.voice)?;
    session
        .handle
        .play_sequence(&args.notes, attack, decay)
        .wrap_err("failed to start sequence")?;

    println!("Playing {}... ", args.notes.join(" "));
    let total = (attack as f64 + decay as f64) * args.notes.len() as f64;
    session.run_for(seconds(total).saturating_add(TAIL));
    Ok(())
}

pub fn drone(config: EngineConfig, args: DroneArgs) -> EyreResult<()> {
    let frequency = args.frequency.unwrap_or(config.frequency);

    let mut session = Session::open(config)?;
    session.apply_voice(&args.voice)?;
    session.handle.set_frequency(frequency)?;
    session.handle.start()?;

    println!("Droning at {} Hz for {} s... Press Ctrl+C to stop", frequency, args.seconds);
    session.run_for(seconds(args.seconds as f64));

    session.handle.stop()?;
    session.run_for(TAIL);
    Ok(())
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or(Duration::MAX)
}
