use crate::{error::ControlError, sequencing::notes::parse_note};

/// Longest sequence a single `PlaySequence` command can carry.
pub const MAX_SEQUENCE_LEN: usize = 64;

/// An ordered run of notes sharing one attack/decay shape.
///
/// Storage is inline so the whole sequence travels through the control queue
/// by value and is swapped into the processor without touching the allocator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSequence {
    frequencies: [f32; MAX_SEQUENCE_LEN],
    len: usize,
    cursor: usize,
    attack: f32,
    decay: f32,
    playing: bool,
}

impl NoteSequence {
    pub const EMPTY: NoteSequence = NoteSequence {
        frequencies: [0.0; MAX_SEQUENCE_LEN],
        len: 0,
        cursor: 0,
        attack: 0.0,
        decay: 0.0,
        playing: false,
    };

    /// Build a sequence from frequencies in Hz and envelope times in seconds.
    pub fn from_frequencies(
        frequencies: &[f32],
        attack: f32,
        decay: f32,
    ) -> Result<Self, ControlError> {
        if frequencies.len() > MAX_SEQUENCE_LEN {
            return Err(ControlError::SequenceTooLong {
                len: frequencies.len(),
                max: MAX_SEQUENCE_LEN,
            });
        }
        check_duration("attack", attack)?;
        check_duration("decay", decay)?;

        let mut sequence = Self::EMPTY;
        for (slot, &frequency) in sequence.frequencies.iter_mut().zip(frequencies) {
            if !frequency.is_finite() {
                return Err(ControlError::NonFinite { name: "frequency" });
            }
            if frequency <= 0.0 {
                return Err(ControlError::InvalidValue {
                    name: "frequency",
                    value: frequency,
                });
            }
            *slot = frequency;
        }
        sequence.len = frequencies.len();
        sequence.attack = attack;
        sequence.decay = decay;
        sequence.playing = !frequencies.is_empty();
        Ok(sequence)
    }

    /// Build a sequence from note names such as `["c4", "e4", "g4"]`.
    pub fn from_notes<S: AsRef<str>>(
        notes: &[S],
        attack: f32,
        decay: f32,
    ) -> Result<Self, ControlError> {
        if notes.len() > MAX_SEQUENCE_LEN {
            return Err(ControlError::SequenceTooLong {
                len: notes.len(),
                max: MAX_SEQUENCE_LEN,
            });
        }

        let mut frequencies = [0.0; MAX_SEQUENCE_LEN];
        for (slot, note) in frequencies.iter_mut().zip(notes) {
            *slot = parse_note(note.as_ref())?;
        }
        Self::from_frequencies(&frequencies[..notes.len()], attack, decay)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies[..self.len]
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Frequency of the note under the cursor, if still playing.
    pub fn current(&self) -> Option<f32> {
        if self.playing {
            self.frequencies().get(self.cursor).copied()
        } else {
            None
        }
    }

    /// Move to the next note. Returns its frequency, or `None` once the
    /// cursor has passed the last note (playback then stops).
    pub fn advance(&mut self) -> Option<f32> {
        if !self.playing {
            return None;
        }
        self.cursor += 1;
        if self.cursor >= self.len {
            self.playing = false;
            return None;
        }
        Some(self.frequencies[self.cursor])
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }
}

impl Default for NoteSequence {
    fn default() -> Self {
        Self::EMPTY
    }
}

fn check_duration(name: &'static str, seconds: f32) -> Result<(), ControlError> {
    if !seconds.is_finite() {
        return Err(ControlError::NonFinite { name });
    }
    if seconds < 0.0 {
        return Err(ControlError::InvalidValue { name, value: seconds });
    }
    Ok(())
}
