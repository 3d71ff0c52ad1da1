//! Parameter metadata shared by waveform shapes, filter topologies and the
//! processor's block-rate parameter table.

/// Range and default of a named, user-facing parameter.
///
/// The core never clamps shape or filter values with these; they exist so the
/// control side (UI, CLI, parameter table) has a single source of bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Wire name used in control messages (`"pulseWidth"`, `"cutoff"`, ...).
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
}

impl ParamSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp a value into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}
