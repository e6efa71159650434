// Core event types shared by every generator stage.
//
// A melody is a sequence of NoteEvents, a progression a sequence of
// ChordEvents. Both carry durations in beats (quarter note = 1.0). A rest
// is a first-class event: it occupies time but sounds nothing. Events are
// immutable once produced — thinning in arrange.rs builds new sequences
// rather than mutating these in place.

use serde::{Deserialize, Serialize};

/// A single melodic event: a MIDI pitch (0-127) or a rest, with a duration
/// in beats. Rests carry a duration like any sounding note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch, or None for a rest.
    pub pitch: Option<u8>,
    /// Duration in beats. Always > 0.
    pub duration: f64,
}

impl NoteEvent {
    pub fn note(pitch: u8, duration: f64) -> Self {
        NoteEvent {
            pitch: Some(pitch),
            duration,
        }
    }

    pub fn rest(duration: f64) -> Self {
        NoteEvent {
            pitch: None,
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    /// The same event with its pitch replaced by a rest, duration kept.
    pub fn silenced(&self) -> Self {
        NoteEvent::rest(self.duration)
    }
}

/// A chord event: a set of simultaneous MIDI pitches with a shared
/// duration. An empty pitch set means a rest of that duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Sounding pitches (root-position voicing). Empty for a rest.
    pub pitches: Vec<u8>,
    /// Duration in beats. Always > 0.
    pub duration: f64,
}

impl ChordEvent {
    pub fn new(pitches: Vec<u8>, duration: f64) -> Self {
        ChordEvent { pitches, duration }
    }

    pub fn rest(duration: f64) -> Self {
        ChordEvent {
            pitches: Vec::new(),
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitches.is_empty()
    }

    /// The same event with all pitches removed, duration kept.
    pub fn silenced(&self) -> Self {
        ChordEvent::rest(self.duration)
    }
}

/// Total duration in beats of a note sequence (rests included).
pub fn total_beats(events: &[NoteEvent]) -> f64 {
    events.iter().map(|e| e.duration).sum()
}

/// Total duration in beats of a chord sequence (rests included).
pub fn chord_total_beats(events: &[ChordEvent]) -> f64 {
    events.iter().map(|e| e.duration).sum()
}

/// Convert a MIDI pitch to a compact note name (e.g., "C4", "F#3").
pub fn pitch_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
    ];
    let octave = (pitch / 12) as i8 - 1;
    format!("{}{}", NAMES[(pitch % 12) as usize], octave)
}
