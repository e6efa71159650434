// Songsmith
//
// A procedural multi-instrument song generator. Given a key, a scale, and
// a seed, it arranges a fixed verse/chorus song form for five instruments
// (lead, pad, bass, rhythm guitar, drums) and writes the result as a
// Standard MIDI File and an optional LilyPond lead sheet.
//
// Architecture — a strictly downward pipeline of pure data transforms:
// - scale.rs: scale tables and the bounded multi-octave pitch pool
// - melody.rs: stochastic step-walk melody over the pitch pool, rhythm
//   cells and interval distributions indexed by a complexity parameter
// - chord.rs: scale-degree progressions, triad/seventh construction
// - parts.rs: bassline, rhythm comping, and pad derived from the chords
// - drums.rs: style grids on a 16th-note step grid, randomized fills
// - arrange.rs: section walker, thinning rules, timeline assembly
// - song.rs: Track/Song aggregate handed to the writers
// - lyrics.rs: word-per-note lyric alignment on the lead track
// - midi.rs: SMF output via midly
// - lilypond.rs: lead-sheet engraving source output
// - config.rs: JSON-loadable generation parameters
//
// All randomness flows through a caller-supplied rand::Rng, so output is
// fully deterministic given a seed. Nothing in the pipeline fails:
// unknown names substitute documented defaults and out-of-range pitches
// snap to the nearest valid one.

pub mod arrange;
pub mod chord;
pub mod config;
pub mod drums;
pub mod event;
pub mod lilypond;
pub mod lyrics;
pub mod melody;
pub mod midi;
pub mod parts;
pub mod scale;
pub mod song;
