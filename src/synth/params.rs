//! Block-rate parameter table handed to `AudioProcessor::process`.

use crate::dsp::param::ParamSpec;

/// How often a host re-reads a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationRate {
    /// One value per sample.
    Audio,
    /// One value per block.
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub spec: ParamSpec,
    pub rate: AutomationRate,
}

pub const FREQUENCY: ParameterDescriptor = ParameterDescriptor {
    spec: ParamSpec::new("frequency", "Frequency", 20.0, 20_000.0, 440.0, 1.0),
    rate: AutomationRate::Control,
};

pub const GAIN: ParameterDescriptor = ParameterDescriptor {
    spec: ParamSpec::new("gain", "Gain", 0.0, 1.0, 0.5, 0.01),
    rate: AutomationRate::Control,
};

/// Index into `WaveformKind::ALL`.
pub const WAVEFORM: ParameterDescriptor = ParameterDescriptor {
    spec: ParamSpec::new("waveform", "Waveform", 0.0, 8.0, 1.0, 1.0),
    rate: AutomationRate::Control,
};

pub const PARAMETER_DESCRIPTORS: [ParameterDescriptor; 3] = [FREQUENCY, GAIN, WAVEFORM];

/// One block's worth of host parameter values.
///
/// `None` means the host does not drive that parameter; queue messages stay
/// in charge of it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlockParams {
    pub frequency: Option<f32>,
    pub gain: Option<f32>,
    pub waveform: Option<f32>,
}

impl BlockParams {
    pub const NONE: BlockParams = BlockParams {
        frequency: None,
        gain: None,
        waveform: None,
    };
}

/// Clamp a host value into its descriptor range. NaN is dropped.
pub(crate) fn sanitize(descriptor: &ParameterDescriptor, value: Option<f32>) -> Option<f32> {
    value
        .filter(|v| !v.is_nan())
        .map(|v| descriptor.spec.clamp(v))
}
