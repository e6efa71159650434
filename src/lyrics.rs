// Lyric-to-melody alignment: zips a word list onto the lead track's
// sounding notes, one word per note.
//
// Length mismatches are never an error: a short word list repeats from the
// top, a long one is truncated at the last note. Aligned words ride along
// into the MIDI writer as lyric meta-events on the lead track.

use crate::song::Song;

/// Attach `words` to the song's lead track, one word per sounding event.
///
/// Returns the number of events that received a word (every lead event,
/// unless the word list is empty).
pub fn apply_lyrics(song: &mut Song, words: &[String]) -> usize {
    if words.is_empty() {
        return 0;
    }
    let mut assigned = 0;
    for (i, event) in song.lead.events.iter_mut().enumerate() {
        event.lyric = Some(words[i % words.len()].clone());
        assigned += 1;
    }
    assigned
}

/// Split raw lyrics text into words, whitespace-separated.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_string()).collect()
}
