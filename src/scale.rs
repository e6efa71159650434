// Scale definitions and pitch-pool construction.
//
// A scale is an ordered set of semitone offsets from a root, spanning one
// octave (always starting at 0 and ending at 12). The melody generator
// walks a "pitch pool": the scale unrolled across four octaves around the
// starting pitch, filtered to a fixed playable register.
//
// Unknown scale names substitute the major scale rather than fail — the
// design philosophy throughout is "always produce a playable result".

use serde::{Deserialize, Serialize};

/// Lowest pitch admitted to a melody pitch pool (G3).
pub const REGISTER_LOW: u8 = 55;
/// Highest pitch admitted to a melody pitch pool (C6).
pub const REGISTER_HIGH: u8 = 84;

/// The supported scale types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Major,
    Minor,
    Pentatonic,
    Blues,
    Dorian,
}

impl ScaleType {
    /// Semitone offsets from the root, one octave span.
    /// Strictly increasing, always containing 0 and 12.
    pub fn offsets(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11, 12],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 10, 12],
            ScaleType::Pentatonic => &[0, 2, 4, 7, 9, 12],
            ScaleType::Blues => &[0, 3, 5, 6, 7, 10, 12],
            ScaleType::Dorian => &[0, 2, 3, 5, 7, 9, 10, 12],
        }
    }

    /// Parse a scale name. Unknown names substitute Major (the documented
    /// lookup-miss default).
    pub fn from_name(name: &str) -> ScaleType {
        match name.to_lowercase().as_str() {
            "major" => ScaleType::Major,
            "minor" => ScaleType::Minor,
            "pentatonic" => ScaleType::Pentatonic,
            "blues" => ScaleType::Blues,
            "dorian" => ScaleType::Dorian,
            _ => ScaleType::Major,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
            ScaleType::Pentatonic => "pentatonic",
            ScaleType::Blues => "blues",
            ScaleType::Dorian => "dorian",
        }
    }
}

/// Build the melodic pitch pool for a scale rooted near `start_pitch`.
///
/// The scale's offsets are unrolled across a four-octave window (one below
/// the starting octave through two above), then filtered to the playable
/// register [REGISTER_LOW, REGISTER_HIGH]. The result is ordered ascending
/// (octave boundaries duplicate the octave pitch, which is harmless for
/// index-space walking).
pub fn build_pitch_pool(scale: ScaleType, start_pitch: u8) -> Vec<u8> {
    let root_pc = (start_pitch % 12) as i16;
    let octave = (start_pitch / 12) as i16 - 1;

    let mut pool = Vec::new();
    for octave_offset in -1..3i16 {
        for &off in scale.offsets() {
            let pitch = root_pc + off as i16 + (octave + octave_offset) * 12;
            if (REGISTER_LOW as i16..=REGISTER_HIGH as i16).contains(&pitch) {
                pool.push(pitch as u8);
            }
        }
    }
    if pool.is_empty() {
        // Start pitch so far outside the register that the four-octave
        // window missed it entirely; re-center on middle C.
        return build_pitch_pool(scale, 60);
    }
    pool
}

/// Index of `pitch` in the pool, falling back to the nearest pool pitch by
/// absolute distance when absent. Never fails on a non-empty pool.
pub fn pool_position(pool: &[u8], pitch: u8) -> usize {
    if let Some(idx) = pool.iter().position(|&p| p == pitch) {
        return idx;
    }
    pool.iter()
        .enumerate()
        .min_by_key(|&(_, &p)| (p as i16 - pitch as i16).unsigned_abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}
