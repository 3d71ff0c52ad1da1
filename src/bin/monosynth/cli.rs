use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Monophonic synth engine driven from the command line
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a sequence of notes, e.g. `play c4 e4 g4`
    Play(PlayArgs),
    /// Hold a single tone
    Drone(DroneArgs),
    /// Generate a default config file and exit
    GenerateConfig(ConfigArgs),
}

#[derive(Args)]
pub struct VoiceArgs {
    /// Waveform: sine, square, saw, triangle, pulse, noise, sine-square,
    /// double-sine, fold-sine
    #[arg(long)]
    pub wave: Option<String>,
    /// Output gain in [0, 1]
    #[arg(long)]
    pub gain: Option<f32>,
    /// Filter type: lowpass, highpass, bandpass, notch
    #[arg(long)]
    pub filter: Option<String>,
    /// Filter cutoff / centre frequency in Hz
    #[arg(long, requires = "filter")]
    pub cutoff: Option<f32>,
    /// Filter resonance (dB) or Q, depending on the filter type
    #[arg(long, requires = "filter")]
    pub resonance: Option<f32>,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Note names such as c4, f#3, bb2
    #[arg(required = true, num_args = 1..)]
    pub notes: Vec<String>,
    /// Attack time in seconds
    #[arg(long)]
    pub attack: Option<f32>,
    /// Decay time in seconds
    #[arg(long)]
    pub decay: Option<f32>,
    #[command(flatten)]
    pub voice: VoiceArgs,
}

#[derive(Args)]
pub struct DroneArgs {
    /// Frequency in Hz
    #[arg(long)]
    pub frequency: Option<f32>,
    /// How long to hold the tone
    #[arg(long, default_value_t = 2.0)]
    pub seconds: f32,
    #[command(flatten)]
    pub voice: VoiceArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Output path for the generated configuration
    #[arg(long, default_value = "monosynth.toml")]
    pub out: PathBuf,
}
