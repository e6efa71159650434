// Song arrangement: walks the fixed section structure, drives the
// generators with per-section parameters, applies thinning, and lays every
// part onto the shared measure timeline.
//
// Control flows strictly downward: this module calls the melody, chord,
// parts, and drums generators and appends their output to the Song's
// tracks at the running absolute offset (measures so far * 4 beats). No
// generator calls back up, and no state crosses sections except that
// offset.
//
// Thinning rules are pure: each takes a finished sequence and returns a
// new one with selected events replaced by rests, so the untouched
// originals stay available for inspection and testing.

use crate::chord::generate_progression;
use crate::drums::{DrumPattern, DrumStyle, DrumVoice, generate_drum_pattern};
use crate::event::{ChordEvent, NoteEvent};
use crate::melody::generate_melody;
use crate::parts::{Subdivision, generate_bassline, generate_comping, generate_pad};
use crate::scale::ScaleType;
use crate::song::{Role, Song};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Beats per measure (4/4 throughout).
pub const BEATS_PER_MEASURE: f64 = 4.0;

/// The section kinds a song structure is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Intro,
    Verse,
    Chorus,
    Bridge,
    Outro,
}

/// The fixed verse/chorus song form.
pub const SONG_STRUCTURE: [SectionKind; 8] = [
    SectionKind::Intro,
    SectionKind::Verse,
    SectionKind::Chorus,
    SectionKind::Verse,
    SectionKind::Chorus,
    SectionKind::Bridge,
    SectionKind::Chorus,
    SectionKind::Outro,
];

impl SectionKind {
    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Intro => "intro",
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
            SectionKind::Outro => "outro",
        }
    }

    /// Section length in measures.
    pub fn measures(self) -> usize {
        match self {
            SectionKind::Verse | SectionKind::Chorus => 8,
            SectionKind::Intro | SectionKind::Bridge | SectionKind::Outro => 4,
        }
    }

    /// Complexity parameter driving melody density, bass pattern choice,
    /// and drum fill intensity.
    pub fn complexity(self) -> f64 {
        match self {
            SectionKind::Intro | SectionKind::Outro => 0.7,
            SectionKind::Verse => 1.0,
            SectionKind::Chorus => 1.3,
            SectionKind::Bridge => 1.5,
        }
    }

    /// Harmonic pattern (1-based scale degrees) for this section.
    pub fn harmonic_pattern(self) -> &'static [usize] {
        match self {
            SectionKind::Intro => &[1, 5, 6, 4],
            SectionKind::Verse => &[1, 5, 6, 4, 1, 5, 4, 5],
            SectionKind::Chorus => &[1, 4, 6, 5, 1, 4, 6, 5],
            SectionKind::Bridge => &[6, 5, 4, 5],
            SectionKind::Outro => &[1, 5, 6, 1],
        }
    }

    pub fn drum_style(self) -> DrumStyle {
        match self {
            SectionKind::Intro | SectionKind::Outro => DrumStyle::Basic,
            SectionKind::Verse => DrumStyle::Rock,
            SectionKind::Chorus => DrumStyle::Funk,
            SectionKind::Bridge => DrumStyle::Jazz,
        }
    }

    pub fn comping_subdivision(self) -> Subdivision {
        match self {
            SectionKind::Verse => Subdivision::Quarter,
            SectionKind::Chorus => Subdivision::Eighth,
            _ => Subdivision::Whole,
        }
    }
}

/// Total length in measures of a structure.
pub fn structure_measures(structure: &[SectionKind]) -> usize {
    structure.iter().map(|s| s.measures()).sum()
}

/// Replace every note event starting inside `[from_beat, to_beat)` (beats
/// relative to the sequence start) with a rest of the same duration.
pub fn silence_notes_in(events: &[NoteEvent], from_beat: f64, to_beat: f64) -> Vec<NoteEvent> {
    let mut out = Vec::with_capacity(events.len());
    let mut cursor = 0.0;
    for event in events {
        if cursor >= from_beat && cursor < to_beat {
            out.push(event.silenced());
        } else {
            out.push(*event);
        }
        cursor += event.duration;
    }
    out
}

/// Replace every chord event starting inside `[from_beat, to_beat)` with a
/// rest of the same duration.
pub fn silence_chords_in(events: &[ChordEvent], from_beat: f64, to_beat: f64) -> Vec<ChordEvent> {
    let mut out = Vec::with_capacity(events.len());
    let mut cursor = 0.0;
    for event in events {
        if cursor >= from_beat && cursor < to_beat {
            out.push(event.silenced());
        } else {
            out.push(event.clone());
        }
        cursor += event.duration;
    }
    out
}

/// Fit a note sequence to exactly `budget` beats: drop events past the
/// budget, clip the straddling event, and pad any shortfall with a rest.
pub fn fit_to_beats(events: &[NoteEvent], budget: f64) -> Vec<NoteEvent> {
    let mut out = Vec::with_capacity(events.len());
    let mut cursor = 0.0;

    for event in events {
        if cursor >= budget {
            break;
        }
        let remaining = budget - cursor;
        let mut fitted = *event;
        if fitted.duration > remaining {
            fitted.duration = remaining;
        }
        cursor += fitted.duration;
        out.push(fitted);
    }

    if cursor < budget {
        out.push(NoteEvent::rest(budget - cursor));
    }
    out
}

/// Everything one section generates, after thinning, ready for the
/// timeline. One named field per instrument role — the role set is closed.
#[derive(Debug, Clone)]
pub struct SectionParts {
    pub melody: Vec<NoteEvent>,
    pub pad: Vec<ChordEvent>,
    pub bass: Vec<NoteEvent>,
    pub comping: Vec<ChordEvent>,
    pub drums: DrumPattern,
}

/// Generate one section's parts with its per-kind parameters and apply its
/// thinning rules.
///
/// `pattern_override` replaces the section's own harmonic pattern when
/// given (a song-wide progression chosen by name, say).
pub fn generate_section(
    kind: SectionKind,
    key: u8,
    scale: ScaleType,
    pattern_override: Option<&[usize]>,
    rng: &mut impl Rng,
) -> SectionParts {
    let measures = kind.measures();
    let complexity = kind.complexity();
    let section_beats = measures as f64 * BEATS_PER_MEASURE;

    let progression = generate_progression(
        key,
        scale,
        measures,
        Some(pattern_override.unwrap_or(kind.harmonic_pattern())),
        rng,
    );
    let bass = generate_bassline(&progression, complexity);
    let drums = generate_drum_pattern(measures, kind.drum_style(), complexity, rng);
    let melody_start = (key as i16 + 12).clamp(0, 127) as u8;
    let melody = generate_melody(measures * 16, scale, melody_start, complexity, None, rng);
    let melody = fit_to_beats(&melody, section_beats);
    let comping = generate_comping(&progression, kind.comping_subdivision());
    let pad = generate_pad(&progression);

    apply_thinning(
        kind,
        measures,
        SectionParts {
            melody,
            pad,
            bass,
            comping,
            drums,
        },
        rng,
    )
}

/// Section-specific thinning: deterministic (or bounded-random) rests that
/// vary the arrangement density.
fn apply_thinning(
    kind: SectionKind,
    measures: usize,
    parts: SectionParts,
    rng: &mut impl Rng,
) -> SectionParts {
    let mut parts = parts;
    match kind {
        // Open with the melody alone: everything else rests for the first
        // two measures.
        SectionKind::Intro => {
            if measures > 2 {
                let cut = 2.0 * BEATS_PER_MEASURE;
                parts.pad = silence_chords_in(&parts.pad, 0.0, cut);
                parts.comping = silence_chords_in(&parts.comping, 0.0, cut);
                parts.bass = silence_notes_in(&parts.bass, 0.0, cut);
                parts.drums = parts.drums.silenced_steps(0, 32);
            }
        }
        // Drop the drums for one measure, most of the time.
        SectionKind::Verse => {
            if rng.random_bool(0.7) {
                let break_measure = rng.random_range(0..measures);
                parts.drums = parts.drums.silenced_measure(break_measure);
            }
        }
        // Pull comping and drums for the first measure.
        SectionKind::Bridge => {
            parts.comping = silence_chords_in(&parts.comping, 0.0, BEATS_PER_MEASURE);
            parts.drums = parts.drums.silenced_steps(0, 16);
        }
        // Wind down: final measure keeps only melody, bass, pad, and the
        // closing crash.
        SectionKind::Outro => {
            let last = (measures - 1) as f64 * BEATS_PER_MEASURE;
            parts.comping = silence_chords_in(&parts.comping, last, f64::INFINITY);
            parts.drums = parts.drums.silenced_final_measure_except_crash();
        }
        SectionKind::Chorus => {}
    }
    parts
}

/// Arrange a complete song over the given structure.
///
/// Walks the sections in order, generating and thinning each one, then
/// appends every part to its track at the running measure offset. All five
/// tracks are padded to the full song length before the Song is returned.
/// A `progression` overrides every section's harmonic pattern.
pub fn arrange_song(
    title: &str,
    composer: &str,
    tempo_bpm: u16,
    key: u8,
    scale: ScaleType,
    structure: &[SectionKind],
    progression: Option<&[usize]>,
    rng: &mut impl Rng,
) -> Song {
    let mut song = Song::new(title, composer, tempo_bpm);
    let mut measures_so_far = 0usize;

    for &kind in structure {
        let offset = measures_so_far as f64 * BEATS_PER_MEASURE;
        let parts = generate_section(kind, key, scale, progression, rng);

        let (lead_lo, lead_hi) = Role::Lead.velocity_range();
        song.lead
            .append_notes(offset, &parts.melody, || rng.random_range(lead_lo..=lead_hi));

        let (pad_lo, pad_hi) = Role::Pad.velocity_range();
        song.pad
            .append_chords(offset, &parts.pad, || rng.random_range(pad_lo..=pad_hi));

        let (bass_lo, bass_hi) = Role::Bass.velocity_range();
        song.bass
            .append_notes(offset, &parts.bass, || rng.random_range(bass_lo..=bass_hi));

        let (rhythm_lo, rhythm_hi) = Role::Rhythm.velocity_range();
        song.rhythm
            .append_chords(offset, &parts.comping, || {
                rng.random_range(rhythm_lo..=rhythm_hi)
            });

        let (drum_lo, drum_hi) = Role::Drums.velocity_range();
        for voice in DrumVoice::ALL {
            let events = parts.drums.voice_events(voice);
            song.drums
                .append_notes(offset, &events, || rng.random_range(drum_lo..=drum_hi));
        }

        measures_so_far += kind.measures();
    }

    let total_beats = measures_so_far as f64 * BEATS_PER_MEASURE;
    for role in Role::ALL {
        song.track_mut(role).pad_to(total_beats);
    }

    song
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_structure_measures() {
        assert_eq!(structure_measures(&SONG_STRUCTURE), 52);
    }

    #[test]
    fn test_fit_to_beats_truncates_and_clips() {
        let events = vec![
            NoteEvent::note(60, 2.0),
            NoteEvent::note(62, 2.0),
            NoteEvent::note(64, 2.0),
        ];
        let fitted = fit_to_beats(&events, 3.0);
        assert_eq!(crate::event::total_beats(&fitted), 3.0);
        assert_eq!(fitted.len(), 2);
        assert_eq!(fitted[1].duration, 1.0); // clipped
    }

    #[test]
    fn test_fit_to_beats_pads_shortfall() {
        let events = vec![NoteEvent::note(60, 1.0)];
        let fitted = fit_to_beats(&events, 4.0);
        assert_eq!(crate::event::total_beats(&fitted), 4.0);
        assert!(fitted.last().unwrap().is_rest());
    }

    #[test]
    fn test_silence_notes_in_is_pure_and_windowed() {
        let events = vec![
            NoteEvent::note(60, 4.0),
            NoteEvent::note(62, 4.0),
            NoteEvent::note(64, 4.0),
        ];
        let out = silence_notes_in(&events, 0.0, 8.0);
        assert!(out[0].is_rest());
        assert!(out[1].is_rest());
        assert_eq!(out[2], events[2]);
        // Source unchanged.
        assert!(!events[0].is_rest());
        // Durations preserved.
        assert_eq!(
            crate::event::total_beats(&out),
            crate::event::total_beats(&events)
        );
    }

    #[test]
    fn test_section_melody_fits_budget() {
        let mut rng = StdRng::seed_from_u64(8);
        for kind in [SectionKind::Intro, SectionKind::Verse, SectionKind::Chorus] {
            let parts = generate_section(kind, 60, ScaleType::Major, None, &mut rng);
            let budget = kind.measures() as f64 * BEATS_PER_MEASURE;
            assert_eq!(crate::event::total_beats(&parts.melody), budget);
        }
    }

    #[test]
    fn test_intro_opens_melody_only() {
        let mut rng = StdRng::seed_from_u64(9);
        let parts = generate_section(SectionKind::Intro, 60, ScaleType::Major, None, &mut rng);
        // First two measures: no pad/comping/bass/drum events sound.
        let mut cursor = 0.0;
        for chord in &parts.pad {
            if cursor < 8.0 {
                assert!(chord.is_rest());
            }
            cursor += chord.duration;
        }
        let mut cursor = 0.0;
        for note in &parts.bass {
            if cursor < 8.0 {
                assert!(note.is_rest());
            }
            cursor += note.duration;
        }
        for step in 0..32 {
            for voice in DrumVoice::ALL {
                assert!(!parts.drums.hit(voice, step));
            }
        }
        // The melody still sounds somewhere in the opening.
        assert!(parts.melody.iter().take(8).any(|e| !e.is_rest()));
    }

    #[test]
    fn test_verse_drum_drop_silences_one_full_measure() {
        // Tiled measures always have hits and fill measures always place a
        // crash, so a measure silent across every voice can only come from
        // the verse drop rule, which covers exactly one measure.
        let measures = SectionKind::Verse.measures();
        let mut dropped = 0;
        let mut kept = 0;
        for seed in 0..40u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let parts = generate_section(SectionKind::Verse, 60, ScaleType::Major, None, &mut rng);
            let silent_measures = (0..measures)
                .filter(|&m| {
                    (m * 16..(m + 1) * 16)
                        .all(|step| DrumVoice::ALL.iter().all(|&v| !parts.drums.hit(v, step)))
                })
                .count();
            assert!(silent_measures <= 1, "seed {}: {} silent measures", seed, silent_measures);
            if silent_measures == 1 {
                dropped += 1;
            } else {
                kept += 1;
            }
        }
        // The drop fires with probability 0.7, so across 40 seeds both
        // outcomes appear and drops dominate.
        assert!(dropped >= 15, "only {}/40 seeds dropped a measure", dropped);
        assert!(kept > 0, "every seed dropped a measure");
    }

    #[test]
    fn test_progression_override_replaces_section_pattern() {
        let mut rng = StdRng::seed_from_u64(14);
        let pattern = crate::chord::progression_pattern("pop");
        let parts =
            generate_section(SectionKind::Verse, 60, ScaleType::Major, Some(pattern), &mut rng);
        // Pad chords carry the progression verbatim: pop is 1-5-6-4,
        // cycled over the verse's eight measures.
        let roots: Vec<u8> = parts.pad.iter().map(|c| c.pitches[0]).collect();
        assert_eq!(roots, vec![60, 67, 69, 65, 60, 67, 69, 65]);
    }

    #[test]
    fn test_bridge_first_measure_thinned() {
        let mut rng = StdRng::seed_from_u64(10);
        let parts = generate_section(SectionKind::Bridge, 60, ScaleType::Major, None, &mut rng);
        let mut cursor = 0.0;
        for chord in &parts.comping {
            if cursor < 4.0 {
                assert!(chord.is_rest());
            }
            cursor += chord.duration;
        }
        for step in 0..16 {
            for voice in DrumVoice::ALL {
                assert!(!parts.drums.hit(voice, step));
            }
        }
    }

    #[test]
    fn test_outro_final_measure_keeps_only_crash() {
        let mut rng = StdRng::seed_from_u64(11);
        let parts = generate_section(SectionKind::Outro, 60, ScaleType::Major, None, &mut rng);
        let measures = SectionKind::Outro.measures();
        let last_start = (measures - 1) * 16;
        for step in last_start..measures * 16 {
            for voice in DrumVoice::ALL {
                if voice != DrumVoice::Crash {
                    assert!(!parts.drums.hit(voice, step));
                }
            }
        }
        assert!(parts.drums.hit(DrumVoice::Crash, measures * 16 - 1));
        // Comping rests in the final measure.
        let mut cursor = 0.0;
        for chord in &parts.comping {
            if cursor >= (measures - 1) as f64 * 4.0 {
                assert!(chord.is_rest());
            }
            cursor += chord.duration;
        }
    }

    #[test]
    fn test_end_to_end_structure() {
        let mut rng = StdRng::seed_from_u64(12);
        let song = arrange_song(
            "Test Song",
            "songsmith",
            110,
            60,
            ScaleType::Major,
            &SONG_STRUCTURE,
            None,
            &mut rng,
        );

        let expected_beats = 52.0 * BEATS_PER_MEASURE;
        for (role, track) in song.tracks() {
            assert_eq!(
                track.end_beats, expected_beats,
                "{:?} track spans wrong duration",
                role
            );
            assert!(track.note_count() > 0, "{:?} track is empty", role);
        }

        // Events appear in timeline order per track append discipline.
        for (_, track) in song.tracks() {
            for event in &track.events {
                assert!(event.onset >= 0.0 && event.onset < expected_beats);
                assert!(!event.pitches.is_empty());
            }
        }
    }

    #[test]
    fn test_end_to_end_seed_determinism() {
        let make = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            arrange_song(
                "T",
                "c",
                100,
                60,
                ScaleType::Major,
                &SONG_STRUCTURE,
                None,
                &mut rng,
            )
        };
        let a = make(42);
        let b = make(42);
        for ((ra, ta), (_, tb)) in a.tracks().into_iter().zip(b.tracks()) {
            assert_eq!(ta.events, tb.events, "{:?} differs across same seed", ra);
        }
    }

    #[test]
    fn test_velocities_within_role_bounds() {
        let mut rng = StdRng::seed_from_u64(13);
        let song = arrange_song(
            "T",
            "c",
            100,
            60,
            ScaleType::Minor,
            &SONG_STRUCTURE,
            None,
            &mut rng,
        );
        for (role, track) in song.tracks() {
            let (lo, hi) = role.velocity_range();
            for event in &track.events {
                assert!(
                    (lo..=hi).contains(&event.velocity),
                    "{:?} velocity {} outside [{}, {}]",
                    role,
                    event.velocity,
                    lo,
                    hi
                );
            }
        }
    }
}
