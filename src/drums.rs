// Drum pattern generation on a sixteenth-note step grid.
//
// Modeled like a score grid: rows are drum voices, columns are 16th-note
// steps, cells are hit/rest booleans. Each style is a fixed 16-step grid
// per voice, tiled once per measure. The final measure is always replaced
// by a randomized fill (scattered kick/snare/tom hits plus a mandatory
// crash on the last step); non-final measures may independently receive
// the same fill treatment with probability 0.2 * intensity.
//
// Every voice row always covers exactly measures * 16 steps, so voices
// stay zip-safe against each other and against the timeline.
//
// Silencing (for arrangement thinning) is expressed as pure transforms
// that return a new pattern, leaving the original untouched.

use crate::event::NoteEvent;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Steps per measure: sixteenth notes in 4/4.
pub const STEPS_PER_MEASURE: usize = 16;

/// Duration of one step in beats.
pub const STEP_BEATS: f64 = 0.25;

/// The drum voices, in fixed row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrumVoice {
    Kick = 0,
    Snare = 1,
    HiHat = 2,
    OpenHat = 3,
    Tom1 = 4,
    Tom2 = 5,
    Crash = 6,
    Ride = 7,
}

impl DrumVoice {
    pub const ALL: [DrumVoice; 8] = [
        DrumVoice::Kick,
        DrumVoice::Snare,
        DrumVoice::HiHat,
        DrumVoice::OpenHat,
        DrumVoice::Tom1,
        DrumVoice::Tom2,
        DrumVoice::Crash,
        DrumVoice::Ride,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// General MIDI percussion key for this voice.
    pub fn midi_key(self) -> u8 {
        match self {
            DrumVoice::Kick => 36,
            DrumVoice::Snare => 38,
            DrumVoice::HiHat => 42,
            DrumVoice::OpenHat => 46,
            DrumVoice::Tom1 => 47,
            DrumVoice::Tom2 => 45,
            DrumVoice::Crash => 49,
            DrumVoice::Ride => 51,
        }
    }
}

/// The supported drum styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrumStyle {
    Basic,
    Rock,
    Funk,
    Jazz,
}

impl DrumStyle {
    /// Parse a style name. Unknown names substitute Basic (the documented
    /// lookup-miss default).
    pub fn from_name(name: &str) -> DrumStyle {
        match name.to_lowercase().as_str() {
            "basic" => DrumStyle::Basic,
            "rock" => DrumStyle::Rock,
            "funk" => DrumStyle::Funk,
            "jazz" => DrumStyle::Jazz,
            _ => DrumStyle::Basic,
        }
    }

    /// The style's one-measure grid as (voice, 16-step hit mask) pairs.
    /// Voices not listed are silent in regular measures.
    fn grid(self) -> &'static [(DrumVoice, [u8; 16])] {
        match self {
            DrumStyle::Basic => &[
                (DrumVoice::Kick,  [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]),
                (DrumVoice::Snare, [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]),
                (DrumVoice::HiHat, [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0]),
            ],
            DrumStyle::Rock => &[
                (DrumVoice::Kick,  [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]),
                (DrumVoice::Snare, [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]),
                (DrumVoice::HiHat, [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0]),
            ],
            DrumStyle::Funk => &[
                (DrumVoice::Kick,  [1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0]),
                (DrumVoice::Snare, [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0]),
                (DrumVoice::HiHat, [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]),
            ],
            DrumStyle::Jazz => &[
                (DrumVoice::Kick,  [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0]),
                (DrumVoice::Ride,  [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0]),
                (DrumVoice::HiHat, [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]),
            ],
        }
    }
}

/// A complete drum pattern: one hit/rest row per voice, all rows covering
/// `measures * 16` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumPattern {
    pub measures: usize,
    rows: [Vec<bool>; 8],
}

impl DrumPattern {
    /// An all-rest pattern of the given length.
    pub fn silent(measures: usize) -> Self {
        let steps = measures * STEPS_PER_MEASURE;
        DrumPattern {
            measures,
            rows: std::array::from_fn(|_| vec![false; steps]),
        }
    }

    pub fn num_steps(&self) -> usize {
        self.measures * STEPS_PER_MEASURE
    }

    pub fn hit(&self, voice: DrumVoice, step: usize) -> bool {
        self.rows[voice.index()][step]
    }

    fn set(&mut self, voice: DrumVoice, step: usize, hit: bool) {
        self.rows[voice.index()][step] = hit;
    }

    /// One voice's row as (hit | rest, sixteenth-note duration) events.
    pub fn voice_events(&self, voice: DrumVoice) -> Vec<NoteEvent> {
        self.rows[voice.index()]
            .iter()
            .map(|&hit| {
                if hit {
                    NoteEvent::note(voice.midi_key(), STEP_BEATS)
                } else {
                    NoteEvent::rest(STEP_BEATS)
                }
            })
            .collect()
    }

    /// A copy with every voice silenced inside `[start_step, end_step)`.
    pub fn silenced_steps(&self, start_step: usize, end_step: usize) -> Self {
        let mut out = self.clone();
        let end = end_step.min(out.num_steps());
        for row in &mut out.rows {
            for step in start_step..end {
                row[step] = false;
            }
        }
        out
    }

    /// A copy with every voice silenced for one whole measure.
    pub fn silenced_measure(&self, measure: usize) -> Self {
        self.silenced_steps(measure * STEPS_PER_MEASURE, (measure + 1) * STEPS_PER_MEASURE)
    }

    /// A copy with the final measure silenced on every voice except crash.
    pub fn silenced_final_measure_except_crash(&self) -> Self {
        if self.measures == 0 {
            return self.clone();
        }
        let start = (self.measures - 1) * STEPS_PER_MEASURE;
        let mut out = self.clone();
        for voice in DrumVoice::ALL {
            if voice == DrumVoice::Crash {
                continue;
            }
            for step in start..out.num_steps() {
                out.rows[voice.index()][step] = false;
            }
        }
        out
    }
}

/// Generate a drum pattern of `measures` measures in the given style.
///
/// The style grid tiles each measure. The final measure always gets a
/// fill; earlier measures each get one with probability 0.2 * intensity.
pub fn generate_drum_pattern(
    measures: usize,
    style: DrumStyle,
    intensity: f64,
    rng: &mut impl Rng,
) -> DrumPattern {
    let mut pattern = DrumPattern::silent(measures);

    for measure in 0..measures {
        let is_final = measure + 1 == measures;
        let fill_here = is_final || rng.random_bool((0.2 * intensity).clamp(0.0, 1.0));

        if fill_here {
            write_fill(&mut pattern, measure, intensity, rng);
        } else {
            let base = measure * STEPS_PER_MEASURE;
            for &(voice, mask) in style.grid() {
                for (step, &hit) in mask.iter().enumerate() {
                    if hit != 0 {
                        pattern.set(voice, base + step, true);
                    }
                }
            }
        }
    }

    pattern
}

/// Scatter `5 + intensity * 6` hits across kick/snare/toms in one measure,
/// then land a crash on its last step.
fn write_fill(pattern: &mut DrumPattern, measure: usize, intensity: f64, rng: &mut impl Rng) {
    const FILL_VOICES: [DrumVoice; 4] = [
        DrumVoice::Kick,
        DrumVoice::Snare,
        DrumVoice::Tom1,
        DrumVoice::Tom2,
    ];

    let base = measure * STEPS_PER_MEASURE;
    let hit_count = (5.0 + intensity * 6.0) as usize;

    for _ in 0..hit_count {
        let voice = *FILL_VOICES.choose(rng).unwrap_or(&DrumVoice::Snare);
        let step = rng.random_range(0..STEPS_PER_MEASURE);
        pattern.set(voice, base + step, true);
    }

    pattern.set(DrumVoice::Crash, base + STEPS_PER_MEASURE - 1, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_row_lengths_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let pattern = generate_drum_pattern(2, DrumStyle::Rock, 1.0, &mut rng);
        assert_eq!(pattern.num_steps(), 32);
        for voice in DrumVoice::ALL {
            assert_eq!(pattern.voice_events(voice).len(), 32);
        }
    }

    #[test]
    fn test_final_measure_has_crash_on_last_step() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pattern = generate_drum_pattern(2, DrumStyle::Rock, 1.0, &mut rng);
            assert!(pattern.hit(DrumVoice::Crash, 31), "seed {} missing crash", seed);
        }
    }

    #[test]
    fn test_final_measure_is_fill_not_tile() {
        // With intensity 0, non-final measures are always the plain tile,
        // so measure one differing from measure zero on the fill voices
        // proves the fill replaced the tile.
        let mut rng = StdRng::seed_from_u64(3);
        let pattern = generate_drum_pattern(2, DrumStyle::Rock, 0.0, &mut rng);
        // The rock hi-hat tile covers every even step; fills never write
        // hi-hat, so the final measure's hi-hat row must be empty.
        for step in 16..32 {
            assert!(!pattern.hit(DrumVoice::HiHat, step));
        }
        // The fill draws five scatter positions at intensity 0, but draws
        // can land on the same cell, so only the crash plus at least one
        // distinct scattered hit is guaranteed.
        let hits: usize = (16..32)
            .map(|s| {
                DrumVoice::ALL
                    .iter()
                    .filter(|v| pattern.hit(**v, s))
                    .count()
            })
            .sum();
        assert!(hits >= 2, "fill should scatter hits, got {}", hits);
    }

    #[test]
    fn test_regular_measures_match_style_tile() {
        let mut rng = StdRng::seed_from_u64(4);
        let pattern = generate_drum_pattern(4, DrumStyle::Funk, 0.0, &mut rng);
        // intensity 0 => only the final measure fills
        for measure in 0..3 {
            let base = measure * STEPS_PER_MEASURE;
            for step in 0..STEPS_PER_MEASURE {
                assert!(pattern.hit(DrumVoice::HiHat, base + step)); // funk: all 16
            }
            assert!(pattern.hit(DrumVoice::Snare, base + 2));
            assert!(!pattern.hit(DrumVoice::Snare, base + 1));
        }
    }

    #[test]
    fn test_jazz_uses_ride() {
        let mut rng = StdRng::seed_from_u64(5);
        let pattern = generate_drum_pattern(2, DrumStyle::Jazz, 0.0, &mut rng);
        assert!(pattern.hit(DrumVoice::Ride, 0));
        assert!(!pattern.hit(DrumVoice::Crash, 0));
    }

    #[test]
    fn test_silencing_is_pure() {
        let mut rng = StdRng::seed_from_u64(6);
        let pattern = generate_drum_pattern(2, DrumStyle::Basic, 1.0, &mut rng);
        let before = pattern.clone();
        let silenced = pattern.silenced_measure(0);
        assert_eq!(pattern, before, "silencing must not mutate the source");
        for step in 0..16 {
            for voice in DrumVoice::ALL {
                assert!(!silenced.hit(voice, step));
            }
        }
        // Second measure untouched.
        for step in 16..32 {
            for voice in DrumVoice::ALL {
                assert_eq!(silenced.hit(voice, step), pattern.hit(voice, step));
            }
        }
    }

    #[test]
    fn test_silence_final_keeps_crash() {
        let mut rng = StdRng::seed_from_u64(7);
        let pattern = generate_drum_pattern(2, DrumStyle::Rock, 1.0, &mut rng);
        let out = pattern.silenced_final_measure_except_crash();
        assert!(out.hit(DrumVoice::Crash, 31));
        for voice in DrumVoice::ALL {
            if voice != DrumVoice::Crash {
                for step in 16..32 {
                    assert!(!out.hit(voice, step));
                }
            }
        }
    }

    #[test]
    fn test_style_lookup_miss_defaults_to_basic() {
        assert_eq!(DrumStyle::from_name("metal"), DrumStyle::Basic);
        assert_eq!(DrumStyle::from_name("Jazz"), DrumStyle::Jazz);
    }

    #[test]
    fn test_seed_determinism() {
        let a = generate_drum_pattern(4, DrumStyle::Funk, 1.3, &mut StdRng::seed_from_u64(42));
        let b = generate_drum_pattern(4, DrumStyle::Funk, 1.3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
