// Melody generation: a stochastic step-walk over a scale's pitch pool.
//
// The walk draws intervals (in pool-index space, not semitones) from one of
// three distributions selected by a complexity tier — low complexity favors
// small steps, high complexity allows wide leaps. Durations cycle through a
// rhythm cell chosen from a fixed catalogue, again indexed by complexity.
// Pool-index clamping at the edges keeps the line inside the playable
// register with no wraparound jumps.
//
// The contract is exact: `generate_melody(length, ...)` always yields
// exactly `length` events, whatever the complexity, scale, or rest draws.

use crate::event::NoteEvent;
use crate::scale::{ScaleType, build_pitch_pool, pool_position};
use rand::Rng;
use rand::seq::IndexedRandom;

/// The rhythm-cell catalogue, ordered from simple to dense/syncopated.
/// Durations are in beats (quarter note = 1.0).
pub const RHYTHM_CELLS: [&[f64]; 5] = [
    &[1.0, 1.0, 1.0, 1.0],                     // plain quarters
    &[0.5, 0.5, 1.0, 0.5, 0.5, 1.0],           // eighth-quarter mix
    &[0.25, 0.25, 0.25, 0.25, 0.5, 0.5, 1.0],  // sixteenth runs
    &[0.5, 0.25, 0.25, 1.0, 0.5, 0.5],         // syncopated
    &[1.5, 0.5, 1.0, 1.0],                     // dotted quarter + eighth
];

/// Pick a rhythm cell for a complexity value in [0, 2].
/// Index is floor(complexity * catalogue size), clamped to the last cell.
pub fn rhythm_cell_for(complexity: f64) -> &'static [f64] {
    let idx = ((complexity * RHYTHM_CELLS.len() as f64) as usize).min(RHYTHM_CELLS.len() - 1);
    RHYTHM_CELLS[idx]
}

/// Interval distribution (pool-index steps) for a complexity tier.
fn intervals_for(complexity: f64) -> &'static [i32] {
    if complexity < 0.7 {
        &[-1, 0, 0, 1, 1]
    } else if complexity < 1.3 {
        &[-2, -1, -1, 0, 0, 1, 1, 2]
    } else {
        &[-3, -2, -1, 0, 1, 2, 3, 4]
    }
}

/// Generate a melody of exactly `length` events.
///
/// The first event always sounds `start_pitch` with the cell's first
/// duration. Each subsequent step walks the pool from the previous pitch
/// (recovering via nearest-pool-pitch if it isn't in the pool), and with
/// probability `0.05 * complexity` emits a rest instead of the stepped
/// pitch, preserving the drawn duration. The walk itself advances even on
/// rest steps, so the line resumes where it would have been.
pub fn generate_melody(
    length: usize,
    scale: ScaleType,
    start_pitch: u8,
    complexity: f64,
    rhythm_cell: Option<&[f64]>,
    rng: &mut impl Rng,
) -> Vec<NoteEvent> {
    if length == 0 {
        return Vec::new();
    }

    let pool = build_pitch_pool(scale, start_pitch);
    let cell = rhythm_cell
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| rhythm_cell_for(complexity));
    let intervals = intervals_for(complexity);
    let rest_probability = 0.05 * complexity;

    let mut melody = Vec::with_capacity(length);
    let mut current = start_pitch;
    melody.push(NoteEvent::note(current, cell[0]));

    for i in 1..length {
        let interval = *intervals.choose(rng).unwrap_or(&0);
        let pos = pool_position(&pool, current) as i32;
        let new_pos = (pos + interval).clamp(0, pool.len() as i32 - 1) as usize;
        current = pool[new_pos];

        let duration = cell[i % cell.len()];
        if rng.random_bool(rest_probability.clamp(0.0, 1.0)) {
            melody.push(NoteEvent::rest(duration));
        } else {
            melody.push(NoteEvent::note(current, duration));
        }
    }

    melody
}
