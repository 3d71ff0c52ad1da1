//! Engine configuration, loadable from TOML.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ConfigError;
use crate::dsp::{filter::FilterType, oscillator::WaveformKind, smoothing::Smoothing};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingStrategy {
    /// Per-sample exponential approach.
    #[default]
    TimeConstant,
    /// Once-per-block blend by a fixed factor.
    BlockBlend,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingConfig {
    pub strategy: SmoothingStrategy,
    pub time_constant_ms: f32,
    pub blend_factor: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            strategy: SmoothingStrategy::TimeConstant,
            time_constant_ms: 10.0,
            blend_factor: 0.05,
        }
    }
}

impl SmoothingConfig {
    pub fn smoothing(&self) -> Smoothing {
        match self.strategy {
            SmoothingStrategy::TimeConstant => Smoothing::TimeConstant {
                seconds: self.time_constant_ms / 1000.0,
            },
            SmoothingStrategy::BlockBlend => Smoothing::BlockBlend {
                factor: self.blend_factor,
            },
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Offline sample rate; an audio host replaces it with the device rate.
    pub sample_rate: f32,
    /// Slots in the control → render queue.
    pub queue_capacity: usize,
    pub waveform: WaveformKind,
    pub frequency: f32,
    pub gain: f32,
    /// Filter enabled at start-up, if any.
    pub filter: Option<FilterType>,
    /// Default attack (s) for sequences.
    pub attack: f32,
    /// Default decay (s) for sequences.
    pub decay: f32,
    pub noise_seed: u64,
    pub smoothing: SmoothingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            queue_capacity: 1024,
            waveform: WaveformKind::Square,
            frequency: 440.0,
            gain: 0.5,
            filter: None,
            attack: 0.1,
            decay: 0.3,
            noise_seed: 0x5eed,
            smoothing: SmoothingConfig::default(),
        }
    }
}

#[cfg(feature = "serde")]
impl EngineConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Write the configuration as TOML to the provided path
    pub fn write_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Generate a default configuration file at the given path
    pub fn write_default<P: AsRef<std::path::Path>>(path: P) -> Result<(), ConfigError> {
        Self::default().write_to_file(path)
    }
}
