// Standard MIDI File output from an arranged Song.
//
// Converts a Song into an SMF Format 1 (multi-track) file: a conductor
// track with tempo and title, then one track per instrument role. Beat
// offsets map to ticks at 480 per quarter note. Drums go to channel 9
// (GM percussion); other roles get a program change for their GM patch.
// Lyrics attached to lead events are emitted as lyric meta-events at the
// note's onset.
//
// Uses the `midly` crate for MIDI writing. The Song is the source of
// truth; this module only serializes.

use crate::song::{Role, Song, Track as SongTrack};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Convert a Song to MIDI and write to a file.
pub fn write_midi(song: &Song, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let smf = song_to_smf(song);
    let mut buf = Vec::new();
    smf.write(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

fn beats_to_ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_QUARTER as f64).round() as u32
}

/// Convert a Song to an in-memory SMF borrowing its strings.
pub fn song_to_smf(song: &Song) -> Smf<'_> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Conductor track: title, composer, tempo.
    let mut conductor: Track<'_> = Vec::new();
    conductor.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(song.title.as_bytes())),
    });
    conductor.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Text(song.composer.as_bytes())),
    });
    let tempo_microseconds = 60_000_000 / song.tempo_bpm.max(1) as u32;
    conductor.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    conductor.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(conductor);

    for (role, track) in song.tracks() {
        smf.tracks.push(role_track(role, track));
    }

    smf
}

/// One message in absolute-tick form, before delta encoding.
/// `order` breaks ties at the same tick: note-offs, then lyrics, then
/// note-ons, so re-struck pitches never overlap themselves.
struct AbsMessage<'a> {
    tick: u32,
    order: u8,
    kind: TrackEventKind<'a>,
}

fn role_track<'a>(role: Role, track: &'a SongTrack) -> Track<'a> {
    let channel = u4::new(role.midi_channel());
    let mut out: Track<'a> = Vec::new();

    out.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(role.name().as_bytes())),
    });
    if role != Role::Drums {
        out.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(role.midi_program()),
                },
            },
        });
    }

    let mut messages: Vec<AbsMessage<'a>> = Vec::new();
    for event in &track.events {
        let on_tick = beats_to_ticks(event.onset);
        let off_tick = beats_to_ticks(event.onset + event.duration);

        if let Some(lyric) = &event.lyric {
            messages.push(AbsMessage {
                tick: on_tick,
                order: 1,
                kind: TrackEventKind::Meta(MetaMessage::Lyric(lyric.as_bytes())),
            });
        }
        for &pitch in &event.pitches {
            messages.push(AbsMessage {
                tick: on_tick,
                order: 2,
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(pitch.min(127)),
                        vel: u7::new(event.velocity.min(127)),
                    },
                },
            });
            messages.push(AbsMessage {
                tick: off_tick.max(on_tick + 1),
                order: 0,
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(pitch.min(127)),
                        vel: u7::new(0),
                    },
                },
            });
        }
    }

    messages.sort_by_key(|m| (m.tick, m.order));

    let mut last_tick = 0u32;
    for message in messages {
        out.push(TrackEvent {
            delta: u28::new(message.tick - last_tick),
            kind: message.kind,
        });
        last_tick = message.tick;
    }

    out.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChordEvent, NoteEvent};
    use crate::lyrics::apply_lyrics;

    fn small_song() -> Song {
        let mut song = Song::new("Test", "songsmith", 120);
        song.lead.append_notes(
            0.0,
            &[NoteEvent::note(72, 1.0), NoteEvent::note(74, 1.0)],
            || 100,
        );
        song.pad
            .append_chords(0.0, &[ChordEvent::new(vec![60, 64, 67], 4.0)], || 70);
        song
    }

    #[test]
    fn test_song_to_smf_track_count() {
        let song = small_song();
        let smf = song_to_smf(&song);
        // 1 conductor track + 5 instrument tracks.
        assert_eq!(smf.tracks.len(), 6);
    }

    #[test]
    fn test_note_on_off_pairing() {
        let song = small_song();
        let smf = song_to_smf(&song);
        // Lead track is index 1 (after the conductor).
        let ons = count_kind(&smf.tracks[1], true);
        let offs = count_kind(&smf.tracks[1], false);
        assert_eq!(ons, 2);
        assert_eq!(offs, 2);

        // Pad chord: three simultaneous note-ons.
        assert_eq!(count_kind(&smf.tracks[2], true), 3);
    }

    #[test]
    fn test_lyrics_become_meta_events() {
        let mut song = small_song();
        let words = crate::lyrics::split_words("la di");
        apply_lyrics(&mut song, &words);
        let smf = song_to_smf(&song);
        let lyric_count = smf.tracks[1]
            .iter()
            .filter(|e| matches!(e.kind, TrackEventKind::Meta(MetaMessage::Lyric(_))))
            .count();
        assert_eq!(lyric_count, 2);
    }

    #[test]
    fn test_deltas_are_monotone_safe() {
        // Sorting by (tick, order) must never produce a negative delta;
        // building the SMF would panic on u28 underflow if it did.
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        let song = crate::arrange::arrange_song(
            "T",
            "c",
            110,
            60,
            crate::scale::ScaleType::Major,
            &crate::arrange::SONG_STRUCTURE,
            None,
            &mut rng,
        );
        let smf = song_to_smf(&song);
        assert_eq!(smf.tracks.len(), 6);
        let mut buf = Vec::new();
        smf.write(&mut buf).expect("SMF should serialize");
        assert!(!buf.is_empty());
    }

    fn count_kind(track: &Track<'_>, ons: bool) -> usize {
        track
            .iter()
            .filter(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                } => ons,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { .. },
                    ..
                } => !ons,
                _ => false,
            })
            .count()
    }
}
