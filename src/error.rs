//! Error types shared across the control side of the engine.

use std::fmt;

/// Why a note name could not be turned into a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteParseErrorKind {
    Empty,
    /// First character is not one of a–g.
    InvalidLetter(char),
    MissingOctave,
    /// Octave is not a plain run of digits, or does not fit.
    InvalidOctave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteParseError {
    text: String,
    kind: NoteParseErrorKind,
}

impl NoteParseError {
    pub(crate) fn new(text: &str, kind: NoteParseErrorKind) -> Self {
        Self {
            text: text.to_owned(),
            kind,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> NoteParseErrorKind {
        self.kind
    }
}

impl fmt::Display for NoteParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoteParseErrorKind::Empty => write!(f, "Empty note name"),
            NoteParseErrorKind::InvalidLetter(c) => write!(
                f,
                "Invalid note '{}': '{}' is not a note letter (expected a-g)",
                self.text, c
            ),
            NoteParseErrorKind::MissingOctave => {
                write!(f, "Invalid note '{}': missing octave number", self.text)
            }
            NoteParseErrorKind::InvalidOctave => write!(
                f,
                "Invalid note '{}': expected letter[#|b]?octave, e.g. c#4",
                self.text
            ),
        }
    }
}

impl std::error::Error for NoteParseError {}

/// A control command rejected before it reached the render context.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// The control queue has no free slot; the command was not sent.
    QueueFull,
    Parse(NoteParseError),
    /// A frequency, gain or shape value was NaN or infinite.
    NonFinite { name: &'static str },
    /// A value outside what the engine can use (negative duration, ...).
    InvalidValue { name: &'static str, value: f32 },
    SequenceTooLong { len: usize, max: usize },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::QueueFull => write!(f, "Control queue is full"),
            ControlError::Parse(err) => write!(f, "{}", err),
            ControlError::NonFinite { name } => write!(f, "{} must be a finite number", name),
            ControlError::InvalidValue { name, value } => {
                write!(f, "Invalid value for {}: {}", name, value)
            }
            ControlError::SequenceTooLong { len, max } => write!(
                f,
                "Sequence has {} notes, at most {} are supported",
                len, max
            ),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ControlError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteParseError> for ControlError {
    fn from(err: NoteParseError) -> Self {
        ControlError::Parse(err)
    }
}

/// Failure reading or writing an engine configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    #[cfg(feature = "serde")]
    Parse(toml::de::Error),
    #[cfg(feature = "serde")]
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Config I/O error: {}", err),
            #[cfg(feature = "serde")]
            ConfigError::Parse(err) => write!(f, "Invalid config: {}", err),
            #[cfg(feature = "serde")]
            ConfigError::Serialize(err) => write!(f, "Could not serialize config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            #[cfg(feature = "serde")]
            ConfigError::Parse(err) => Some(err),
            #[cfg(feature = "serde")]
            ConfigError::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Asynchronous failure reported by the render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFault {
    /// A block produced NaN or infinite samples; it was replaced with silence
    /// and the filter and oscillator state were reset.
    NonFiniteOutput,
    /// Rendering panicked. The processor is halted and stays silent.
    Panicked,
}

impl fmt::Display for RenderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFault::NonFiniteOutput => {
                write!(f, "Render produced non-finite samples; block silenced")
            }
            RenderFault::Panicked => write!(f, "Render panicked; processor halted"),
        }
    }
}

impl std::error::Error for RenderFault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_errors_name_the_text() {
        let err = NoteParseError::new("h4", NoteParseErrorKind::InvalidLetter('h'));
        assert!(err.to_string().contains("'h4'"));
    }

    #[test]
    fn control_error_exposes_parse_source() {
        use std::error::Error;

        let err = ControlError::from(NoteParseError::new("", NoteParseErrorKind::Empty));
        assert!(err.source().is_some());
        assert!(ControlError::QueueFull.source().is_none());
    }
}
