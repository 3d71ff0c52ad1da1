//! Note names and the note sequence driven by the processor.

/// Note-name parsing and MIDI/frequency conversion.
pub mod notes;
/// Fixed-capacity note sequence with a playback cursor.
pub mod sequence;

pub use notes::{midi_note_to_freq, note_to_midi, parse_note};
pub use sequence::{NoteSequence, MAX_SEQUENCE_LEN};
