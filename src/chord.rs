// Chord progression generation from scale-degree patterns.
//
// A progression is a sequence of root-position triads built on scale
// degrees of the key. Degrees come either from a caller-supplied pattern
// or from a fixed catalogue of common progressions (I-IV-V-I and friends),
// cycled to the requested length. Each triad's quality (major, minor,
// diminished) is fixed per degree by the harmonization table; a seventh is
// stacked on top with probability 0.4.
//
// Only major and minor have distinct harmonization rows. Other scale types
// harmonize with the major row — the documented lookup-miss default.

use crate::event::ChordEvent;
use crate::scale::ScaleType;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Default duration of one chord: a full 4/4 measure.
pub const CHORD_BEATS: f64 = 4.0;

/// Triad quality on a scale degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl Quality {
    /// Semitone offset of the third above the root.
    fn third(self) -> u8 {
        match self {
            Quality::Major => 4,
            Quality::Minor | Quality::Diminished => 3,
        }
    }

    /// Semitone offset of the fifth above the root.
    fn fifth(self) -> u8 {
        match self {
            Quality::Major | Quality::Minor => 7,
            Quality::Diminished => 6,
        }
    }

    /// Semitone offset of the seventh above the root.
    fn seventh(self) -> u8 {
        match self {
            Quality::Major => 11,
            Quality::Minor => 10,
            Quality::Diminished => 9,
        }
    }
}

/// The named progression catalogue (1-based scale degrees).
pub const PROGRESSIONS: [(&str, &[usize]); 5] = [
    ("basic", &[1, 4, 5, 1]),
    ("pop", &[1, 5, 6, 4]),
    ("blues", &[1, 4, 1, 5, 4, 1]),
    ("jazz", &[2, 5, 1, 6]),
    ("epic", &[1, 5, 6, 3, 4, 1, 4, 5]),
];

/// Seven diatonic scale-degree offsets and triad qualities for a scale
/// type. Non-diatonic scale types fall back to the major harmonization.
fn harmonization(scale: ScaleType) -> (&'static [u8; 7], &'static [Quality; 7]) {
    use Quality::{Diminished as D, Major as M, Minor as Mi};
    match scale {
        ScaleType::Minor => (&[0, 2, 3, 5, 7, 8, 10], &[Mi, D, M, Mi, Mi, M, M]),
        _ => (&[0, 2, 4, 5, 7, 9, 11], &[M, Mi, Mi, M, M, Mi, D]),
    }
}

/// Look up a named progression pattern from the catalogue.
/// Unknown names substitute "basic" (I-IV-V-I).
pub fn progression_pattern(name: &str) -> &'static [usize] {
    PROGRESSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, p)| *p)
        .unwrap_or(PROGRESSIONS[0].1)
}

/// Generate `length` chord events in the given key.
///
/// When `pattern` is None a catalogue progression is chosen uniformly at
/// random. The pattern cycles to cover `length` chords. Every emitted chord
/// contains at least root, third, and fifth.
pub fn generate_progression(
    root_pitch: u8,
    scale: ScaleType,
    length: usize,
    pattern: Option<&[usize]>,
    rng: &mut impl Rng,
) -> Vec<ChordEvent> {
    let pattern = match pattern {
        Some(p) if !p.is_empty() => p,
        _ => PROGRESSIONS
            .choose(rng)
            .map(|(_, p)| *p)
            .unwrap_or(PROGRESSIONS[0].1),
    };

    let (offsets, qualities) = harmonization(scale);
    let mut progression = Vec::with_capacity(length);

    for i in 0..length {
        let degree = pattern[i % pattern.len()];
        let idx = (degree.saturating_sub(1)) % 7;
        let root = (root_pitch as i16 + offsets[idx] as i16).clamp(0, 127) as u8;
        let quality = qualities[idx];

        let mut pitches = vec![root];
        pitches.push(add_clamped(root, quality.third()));
        pitches.push(add_clamped(root, quality.fifth()));
        if rng.random_bool(0.4) {
            pitches.push(add_clamped(root, quality.seventh()));
        }

        progression.push(ChordEvent::new(pitches, CHORD_BEATS));
    }

    progression
}

fn add_clamped(pitch: u8, offset: u8) -> u8 {
    (pitch as i16 + offset as i16).clamp(0, 127) as u8
}
