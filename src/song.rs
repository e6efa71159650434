// Song and track assembly: the aggregate handed to the output writers.
//
// A Track is one instrument's ordered sequence of absolute-time events
// spanning the whole song. Tracks are appended to monotonically as the
// arranger advances measure by measure, then padded to the song's full
// length and never touched again. The instrument role set is closed, so
// the Song holds five named tracks rather than a string-keyed map.

use crate::event::{ChordEvent, NoteEvent};
use serde::{Deserialize, Serialize};

/// The five instrument roles of the fixed arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lead,
    Pad,
    Bass,
    Rhythm,
    Drums,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Lead, Role::Pad, Role::Bass, Role::Rhythm, Role::Drums];

    pub fn name(self) -> &'static str {
        match self {
            Role::Lead => "Lead",
            Role::Pad => "Pad",
            Role::Bass => "Bass",
            Role::Rhythm => "Rhythm",
            Role::Drums => "Drums",
        }
    }

    /// General MIDI program for this role (ignored for drums, which live
    /// on the percussion channel).
    pub fn midi_program(self) -> u8 {
        match self {
            Role::Lead => 0,    // acoustic grand piano
            Role::Pad => 89,    // pad 2 (warm)
            Role::Bass => 33,   // electric bass (finger)
            Role::Rhythm => 27, // electric guitar (clean)
            Role::Drums => 0,
        }
    }

    pub fn midi_channel(self) -> u8 {
        match self {
            Role::Lead => 0,
            Role::Pad => 1,
            Role::Bass => 2,
            Role::Rhythm => 3,
            Role::Drums => 9,
        }
    }

    /// Bounded velocity range for this role's events.
    pub fn velocity_range(self) -> (u8, u8) {
        match self {
            Role::Lead | Role::Bass => (90, 110),
            Role::Rhythm => (70, 85),
            Role::Pad => (60, 75),
            Role::Drums => (80, 100),
        }
    }
}

/// One sounding event on a track: pitches at an absolute beat offset.
/// Rests are not stored — silence is the absence of events; the track's
/// duration cursor accounts for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Absolute onset in beats from the start of the song.
    pub onset: f64,
    /// Sounding pitches (one for a note, several for a chord). Non-empty.
    pub pitches: Vec<u8>,
    /// Duration in beats.
    pub duration: f64,
    /// MIDI velocity.
    pub velocity: u8,
    /// Lyric syllable sung on this event (lead track only).
    pub lyric: Option<String>,
}

/// One instrument's full event sequence for the song.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub events: Vec<TimedEvent>,
    /// Total spanned duration in beats, including trailing silence.
    pub end_beats: f64,
}

impl Track {
    /// Append a melodic sequence starting at `start_beat`. Rests advance
    /// the cursor without producing events.
    pub fn append_notes(&mut self, start_beat: f64, events: &[NoteEvent], velocity: impl FnMut() -> u8) {
        let mut velocity = velocity;
        let mut cursor = start_beat;
        for event in events {
            if let Some(pitch) = event.pitch {
                self.events.push(TimedEvent {
                    onset: cursor,
                    pitches: vec![pitch],
                    duration: event.duration,
                    velocity: velocity(),
                    lyric: None,
                });
            }
            cursor += event.duration;
        }
        self.end_beats = self.end_beats.max(cursor);
    }

    /// Append a chordal sequence starting at `start_beat`. Rest chords
    /// advance the cursor without producing events.
    pub fn append_chords(&mut self, start_beat: f64, events: &[ChordEvent], velocity: impl FnMut() -> u8) {
        let mut velocity = velocity;
        let mut cursor = start_beat;
        for event in events {
            if !event.is_rest() {
                self.events.push(TimedEvent {
                    onset: cursor,
                    pitches: event.pitches.clone(),
                    duration: event.duration,
                    velocity: velocity(),
                    lyric: None,
                });
            }
            cursor += event.duration;
        }
        self.end_beats = self.end_beats.max(cursor);
    }

    /// Extend the track's spanned duration to at least `beats`.
    pub fn pad_to(&mut self, beats: f64) {
        self.end_beats = self.end_beats.max(beats);
    }

    pub fn note_count(&self) -> usize {
        self.events.len()
    }
}

/// The complete song: five tracks plus global metadata. Owns its tracks
/// exclusively; they have no identity outside the song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub composer: String,
    pub tempo_bpm: u16,
    pub lead: Track,
    pub pad: Track,
    pub bass: Track,
    pub rhythm: Track,
    pub drums: Track,
}

impl Song {
    pub fn new(title: &str, composer: &str, tempo_bpm: u16) -> Self {
        Song {
            title: title.to_string(),
            composer: composer.to_string(),
            tempo_bpm,
            lead: Track::default(),
            pad: Track::default(),
            bass: Track::default(),
            rhythm: Track::default(),
            drums: Track::default(),
        }
    }

    pub fn track(&self, role: Role) -> &Track {
        match role {
            Role::Lead => &self.lead,
            Role::Pad => &self.pad,
            Role::Bass => &self.bass,
            Role::Rhythm => &self.rhythm,
            Role::Drums => &self.drums,
        }
    }

    pub fn track_mut(&mut self, role: Role) -> &mut Track {
        match role {
            Role::Lead => &mut self.lead,
            Role::Pad => &mut self.pad,
            Role::Bass => &mut self.bass,
            Role::Rhythm => &mut self.rhythm,
            Role::Drums => &mut self.drums,
        }
    }

    /// All tracks in role order.
    pub fn tracks(&self) -> [(Role, &Track); 5] {
        Role::ALL.map(|role| (role, self.track(role)))
    }
}
