use crate::error::{NoteParseError, NoteParseErrorKind};

/*
Note Names
==========

Sequences are written as note names: a letter, an optional accidental and an
octave number.

    c4    middle C           (MIDI 60, ≈261.63 Hz)
    c#4   C sharp            (MIDI 61, ≈277.18 Hz)
    bb4   B flat             (MIDI 70, ≈466.16 Hz)
    a4    tuning reference   (MIDI 69, 440 Hz)

Letters are case-insensitive. Semitone offsets within an octave:

    C=0, D=2, E=4, F=5, G=7, A=9, B=11       '#' adds one, 'b' subtracts one

The MIDI formula: note_number = semitone + 12 * (octave + 1)
Frequency (equal temperament, A4 = 440 Hz):

    f = 440 · 2^((note_number − 69) / 12)

Anything that is not letter[#|b]?digits is rejected with an error rather than
quietly mapping to 0 Hz.
*/

pub const A4_MIDI: i32 = 69;
pub const A4_FREQ: f32 = 440.0;

/// Parse a note name (`"c#4"`) into its MIDI note number.
pub fn note_to_midi(text: &str) -> Result<i32, NoteParseError> {
    let lower = text.trim().to_ascii_lowercase();
    let mut chars = lower.chars();

    let letter = chars
        .next()
        .ok_or_else(|| NoteParseError::new(text, NoteParseErrorKind::Empty))?;
    let semitone = match letter {
        'c' => 0,
        'd' => 2,
        'e' => 4,
        'f' => 5,
        'g' => 7,
        'a' => 9,
        'b' => 11,
        other => {
            return Err(NoteParseError::new(
                text,
                NoteParseErrorKind::InvalidLetter(other),
            ))
        }
    };

    let rest = chars.as_str();
    let (accidental, octave) = match rest.as_bytes().first() {
        Some(b'#') => (1, &rest[1..]),
        Some(b'b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    if octave.is_empty() {
        return Err(NoteParseError::new(text, NoteParseErrorKind::MissingOctave));
    }
    if !octave.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NoteParseError::new(text, NoteParseErrorKind::InvalidOctave));
    }
    let octave: u8 = octave
        .parse()
        .map_err(|_| NoteParseError::new(text, NoteParseErrorKind::InvalidOctave))?;

    Ok(semitone + accidental + (octave as i32 + 1) * 12)
}

pub fn midi_note_to_freq(note: i32) -> f32 {
    A4_FREQ * 2.0_f32.powf((note - A4_MIDI) as f32 / 12.0)
}

/// Parse a note name straight to its frequency in Hz.
pub fn parse_note(text: &str) -> Result<f32, NoteParseError> {
    note_to_midi(text).map(midi_note_to_freq)
}
