// LilyPond sheet music output: a two-staff lead sheet (lead melody plus
// bassline) from an arranged Song.
//
// The Song's absolute-time events are quantized to a sixteenth-note grid,
// then serialized staff by staff. LilyPond wants durations as power-of-two
// note values with optional dots, so each event's length is decomposed
// into valid values, and notes crossing barlines are split into tied
// segments. Gaps between events become rests, split the same way (rests
// just don't tie).
//
// Chordal tracks (pad, rhythm) and drums are not engraved — the lead
// sheet is for reading the tune, the MIDI file carries the full band.

use crate::scale::ScaleType;
use crate::song::{Song, Track};
use std::fmt::Write as _;
use std::path::Path;

/// Pitch class names in LilyPond notation (indexed by pitch class 0-11).
const LY_PITCH_NAMES: [&str; 12] = [
    "c", "cis", "d", "ees", "e", "f", "fis", "g", "aes", "a", "bes", "b",
];

/// Sixteenth-note steps per 4/4 bar.
const STEPS_PER_BAR: usize = 16;

/// Convert a MIDI pitch number to a LilyPond absolute pitch string.
/// LilyPond's bare `c` is MIDI 48 (C3); `'` raises and `,` lowers octaves.
pub fn midi_to_ly_note(midi_pitch: u8) -> String {
    let pc = (midi_pitch % 12) as usize;
    let octave = (midi_pitch / 12) as i8 - 4;
    let mut result = LY_PITCH_NAMES[pc].to_string();
    for _ in 0..octave.max(0) {
        result.push('\'');
    }
    for _ in 0..(-octave).max(0) {
        result.push(',');
    }
    result
}

/// Valid LilyPond durations in sixteenth-note steps, largest first.
const DURATION_TABLE: [(usize, &str); 8] = [
    (16, "1"),  // whole
    (12, "2."), // dotted half
    (8, "2"),   // half
    (6, "4."),  // dotted quarter
    (4, "4"),   // quarter
    (3, "8."),  // dotted eighth
    (2, "8"),   // eighth
    (1, "16"),  // sixteenth
];

/// Decompose a duration in sixteenth steps into LilyPond duration strings,
/// largest first. Multi-part results are joined with ties by the caller.
pub fn decompose_duration(mut steps: usize) -> Vec<&'static str> {
    let mut parts = Vec::new();
    for &(value, name) in &DURATION_TABLE {
        while steps >= value {
            parts.push(name);
            steps -= value;
        }
    }
    parts
}

/// Split a duration at barlines. A note starting at `start_step` lasting
/// `duration` steps is cut into pieces that each fit within one bar.
pub fn split_at_barlines(start_step: usize, duration: usize) -> Vec<usize> {
    let mut fragments = Vec::new();
    let mut remaining = duration;
    let mut pos = start_step;

    while remaining > 0 {
        let bar_end = ((pos / STEPS_PER_BAR) + 1) * STEPS_PER_BAR;
        let frag = remaining.min(bar_end - pos);
        fragments.push(frag);
        remaining -= frag;
        pos += frag;
    }
    fragments
}

/// Map a scale type and key pitch class to a LilyPond \key command.
/// Pentatonic and blues have no LilyPond mode; they engrave as major.
pub fn key_command(scale: ScaleType, key: u8) -> String {
    let pitch = LY_PITCH_NAMES[(key % 12) as usize];
    let mode = match scale {
        ScaleType::Major | ScaleType::Pentatonic | ScaleType::Blues => "major",
        ScaleType::Minor => "minor",
        ScaleType::Dorian => "dorian",
    };
    format!("\\key {} \\{}", pitch, mode)
}

/// Render one monophonic track as a LilyPond note sequence.
fn track_music(track: &Track) -> String {
    let total_steps = (track.end_beats * 4.0).round() as usize;
    let mut out = String::new();
    let mut cursor = 0usize;

    for event in &track.events {
        let start = (event.onset * 4.0).round() as usize;
        let mut steps = ((event.duration * 4.0).round() as usize).max(1);
        let start = start.max(cursor);
        if start >= total_steps {
            break;
        }
        steps = steps.min(total_steps - start);

        if start > cursor {
            emit_rest(&mut out, cursor, start - cursor);
        }

        let name = midi_to_ly_note(*event.pitches.first().unwrap_or(&60));
        let fragments = split_at_barlines(start, steps);
        let mut parts = Vec::new();
        for frag in fragments {
            for dur in decompose_duration(frag) {
                parts.push(dur);
            }
        }
        for (i, dur) in parts.iter().enumerate() {
            let tie = if i + 1 < parts.len() { "~" } else { "" };
            let _ = write!(out, "{}{}{} ", name, dur, tie);
        }

        cursor = start + steps;
    }

    if cursor < total_steps {
        emit_rest(&mut out, cursor, total_steps - cursor);
    }

    out.trim_end().to_string()
}

fn emit_rest(out: &mut String, start: usize, steps: usize) {
    for frag in split_at_barlines(start, steps) {
        for dur in decompose_duration(frag) {
            let _ = write!(out, "r{} ", dur);
        }
    }
}

/// Render the whole lead sheet as LilyPond source.
pub fn song_to_lilypond(song: &Song, scale: ScaleType, key: u8) -> String {
    let key_cmd = key_command(scale, key);
    let mut out = String::new();

    let _ = writeln!(out, "\\version \"2.24.0\"");
    let _ = writeln!(out, "\\header {{");
    let _ = writeln!(out, "  title = \"{}\"", song.title);
    let _ = writeln!(out, "  composer = \"{}\"", song.composer);
    let _ = writeln!(out, "}}");
    let _ = writeln!(out, "\\score {{");
    let _ = writeln!(out, "  <<");
    let _ = writeln!(out, "    \\new Staff {{");
    let _ = writeln!(out, "      \\clef treble");
    let _ = writeln!(out, "      {}", key_cmd);
    let _ = writeln!(out, "      \\tempo 4 = {}", song.tempo_bpm);
    let _ = writeln!(out, "      {}", track_music(&song.lead));
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "    \\new Staff {{");
    let _ = writeln!(out, "      \\clef bass");
    let _ = writeln!(out, "      {}", key_cmd);
    let _ = writeln!(out, "      {}", track_music(&song.bass));
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "  >>");
    let _ = writeln!(out, "  \\layout {{}}");
    let _ = writeln!(out, "}}");

    out
}

/// Write the lead sheet to a .ly file.
pub fn write_lilypond(
    song: &Song,
    scale: ScaleType,
    key: u8,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, song_to_lilypond(song, scale, key))?;
    Ok(())
}
