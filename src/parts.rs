// Derived parts: bassline, rhythm comping, and pad, all read off the
// chord progression with fixed arrangement rules. No randomness here —
// variation comes from the progression itself and from section-level
// thinning in arrange.rs.

use crate::event::{ChordEvent, NoteEvent};

/// How the comping part re-articulates each chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subdivision {
    /// One strum holding the chord's whole duration (intro/bridge/outro).
    Whole,
    /// Quarter-note strums (verse).
    Quarter,
    /// Eighth-note strums (chorus).
    Eighth,
}

/// Build a bassline from a chord progression.
///
/// Three patterns by complexity tier, all an octave below the chord root:
/// low tier holds the root; mid tier splits root and fifth in half; high
/// tier walks root, fifth, and two passing tones in quarters of the
/// chord's duration.
pub fn generate_bassline(progression: &[ChordEvent], complexity: f64) -> Vec<NoteEvent> {
    let mut bassline = Vec::new();

    for chord in progression {
        if chord.is_rest() {
            bassline.push(NoteEvent::rest(chord.duration));
            continue;
        }
        let root = chord.pitches[0];

        if complexity < 0.7 {
            bassline.push(NoteEvent::note(down(root, 12), chord.duration));
        } else if complexity < 1.3 {
            bassline.push(NoteEvent::note(down(root, 12), chord.duration / 2.0));
            bassline.push(NoteEvent::note(down(root, 5), chord.duration / 2.0));
        } else {
            let quarter = chord.duration / 4.0;
            for offset in [12u8, 5, 7, 10] {
                bassline.push(NoteEvent::note(down(root, offset), quarter));
            }
        }
    }

    bassline
}

/// Build the comping part: each chord's full pitch set re-struck at the
/// section's subdivision.
pub fn generate_comping(progression: &[ChordEvent], subdivision: Subdivision) -> Vec<ChordEvent> {
    let mut part = Vec::new();

    for chord in progression {
        match subdivision {
            Subdivision::Whole => part.push(chord.clone()),
            Subdivision::Quarter => {
                for _ in 0..chord.duration as usize {
                    part.push(ChordEvent::new(chord.pitches.clone(), 1.0));
                }
            }
            Subdivision::Eighth => {
                for _ in 0..(chord.duration * 2.0) as usize {
                    part.push(ChordEvent::new(chord.pitches.clone(), 0.5));
                }
            }
        }
    }

    part
}

/// Build the pad part: every chord sustained for its entire duration.
pub fn generate_pad(progression: &[ChordEvent]) -> Vec<ChordEvent> {
    progression.to_vec()
}

fn down(pitch: u8, semitones: u8) -> u8 {
    pitch.saturating_sub(semitones)
}
