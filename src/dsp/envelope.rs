/*
AD Envelope
===========

An attack/decay envelope: the level ramps linearly from 0 to 1 over the
attack, then linearly back to 0 over the decay, and stays at 0. There is no
sustain and no release, so a note's length is fully determined by
attack + decay and no note-off is needed.

  Level
    1.0 ┐    ╱╲
        │   ╱  ╲
        │  ╱    ╲
    0.0 └─╱──────╲──────→ time since note start
          Attack Decay

The level is computed from elapsed time rather than accumulated per sample.
That makes it a pure function:

    elapsed = now - note_start

    elapsed < 0                  → 0      (clock jitter, never negative gain)
    elapsed < attack             → elapsed / attack
    elapsed < attack + decay     → 1 - (elapsed - attack) / decay
    otherwise                    → 0

A zero-length stage never divides: a zero attack jumps straight to the
peak, a zero decay drops straight to zero.

A note that takes over from something already sounding can start its attack
from that level instead of from 0:

    level = start + (1 - start) · elapsed / attack        during the attack
*/

/// Envelope level at `now` for a note that started at `note_start`.
///
/// Times are in seconds. The result is always in `[0, 1]`.
pub fn envelope_value(now: f64, note_start: f64, attack: f64, decay: f64) -> f32 {
    let elapsed = now - note_start;
    if !(elapsed >= 0.0) {
        return 0.0;
    }

    let attack = attack.max(0.0);
    let decay = decay.max(0.0);

    let level = if elapsed < attack {
        elapsed / attack
    } else if elapsed < attack + decay {
        1.0 - (elapsed - attack) / decay
    } else {
        0.0
    };

    (level as f32).clamp(0.0, 1.0)
}

/// Envelope state for the single active note.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeState {
    attack: f64,
    decay: f64,
    note_start: f64,
    start_level: f32,
    level: f32,
    playing: bool,
}

impl EnvelopeState {
    pub fn new(attack: f64, decay: f64) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            note_start: 0.0,
            start_level: 0.0,
            level: 0.0,
            playing: false,
        }
    }

    /// Change the shape. Takes effect from the next `level_at` call.
    pub fn set_shape(&mut self, attack: f64, decay: f64) {
        self.attack = attack.max(0.0);
        self.decay = decay.max(0.0);
    }

    /// Start a note at `now`.
    pub fn note_on(&mut self, now: f64) {
        self.note_on_from(now, 0.0);
    }

    /// Start a note at `now` whose attack rises from `level` rather than 0.
    pub fn note_on_from(&mut self, now: f64, level: f32) {
        self.note_start = now;
        self.start_level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.level = self.start_level;
        self.playing = true;
    }

    /// Silence immediately.
    pub fn stop(&mut self) {
        self.start_level = 0.0;
        self.level = 0.0;
        self.playing = false;
    }

    /// Evaluate and remember the level at `now`.
    #[inline]
    pub fn level_at(&mut self, now: f64) -> f32 {
        if !self.playing {
            self.level = 0.0;
            return 0.0;
        }

        let value = envelope_value(now, self.note_start, self.attack, self.decay);
        let elapsed = now - self.note_start;
        self.level = if self.start_level > 0.0 && (0.0..self.attack).contains(&elapsed) {
            self.start_level + (1.0 - self.start_level) * value
        } else {
            value
        };
        self.level
    }

    /// True once the whole attack + decay window has passed.
    pub fn window_elapsed(&self, now: f64) -> bool {
        now - self.note_start >= self.attack + self.decay
    }

    /// Level from the most recent `level_at` call.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_peaks_at_attack_end() {
        let start = 0.0;
        assert_eq!(envelope_value(start, start, 0.1, 0.3), 0.0);
        assert!((envelope_value(start + 0.1, start, 0.1, 0.3) - 1.0).abs() < 1e-6);
        assert_eq!(envelope_value(start + 0.4, start, 0.1, 0.3), 0.0);
    }

    #[test]
    fn peak_holds_for_later_note_starts() {
        let start = 2.5;
        assert!((envelope_value(start + 0.1, start, 0.1, 0.3) - 1.0).abs() < 1e-5);
        assert_eq!(envelope_value(start + 0.5, start, 0.1, 0.3), 0.0);
    }

    #[test]
    fn ramps_are_linear() {
        assert!((envelope_value(0.05, 0.0, 0.1, 0.3) - 0.5).abs() < 1e-6);
        assert!((envelope_value(0.25, 0.0, 0.1, 0.3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn before_note_start_is_exactly_zero() {
        assert_eq!(envelope_value(0.9, 1.0, 0.1, 0.3), 0.0);
        assert_eq!(envelope_value(f64::NAN, 1.0, 0.1, 0.3), 0.0);
    }

    #[test]
    fn zero_attack_jumps_to_peak() {
        assert_eq!(envelope_value(0.0, 0.0, 0.0, 0.3), 1.0);
        assert!(envelope_value(0.15, 0.0, 0.0, 0.3).is_finite());
    }

    #[test]
    fn zero_decay_drops_to_zero() {
        assert!((envelope_value(0.099, 0.0, 0.1, 0.0) - 0.99).abs() < 1e-6);
        assert_eq!(envelope_value(0.1, 0.0, 0.1, 0.0), 0.0);
    }

    #[test]
    fn zero_length_note_is_always_silent() {
        for now in [0.0, 0.001, 1.0] {
            assert_eq!(envelope_value(now, 0.0, 0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn state_tracks_note_window() {
        let mut env = EnvelopeState::new(0.05, 0.1);
        assert_eq!(env.level_at(0.0), 0.0);

        env.note_on(1.0);
        assert!(env.level_at(1.05) > 0.99);
        assert!(!env.window_elapsed(1.1));
        assert_eq!(env.level_at(1.2), 0.0);
        assert!(env.window_elapsed(1.2));

        env.stop();
        assert!(!env.is_playing());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn attack_can_start_from_a_sounding_level() {
        let mut env = EnvelopeState::new(0.05, 0.1);
        env.note_on_from(1.0, 0.5);
        assert_eq!(env.level_at(1.0), 0.5);
        assert!((env.level_at(1.025) - 0.75).abs() < 1e-5);
        assert!(env.level_at(1.05) > 0.99);
        // Decay is unchanged
        assert!((env.level_at(1.1) - 0.5).abs() < 1e-5);
        assert_eq!(env.level_at(1.2), 0.0);

        // The next note starts from silence again
        env.note_on(2.0);
        assert_eq!(env.level_at(2.0), 0.0);
    }
}
