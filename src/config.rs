// Song configuration: global generation parameters, loadable from JSON.
//
// The defaults reproduce the stock song (C major, 110 BPM, the fixed
// verse/chorus structure). A config file overrides whichever fields it
// names; loading failures fall back to defaults at the call site — a bad
// config never prevents generation.

use crate::arrange::{SONG_STRUCTURE, SectionKind};
use crate::scale::ScaleType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global parameters for one song generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongConfig {
    pub title: String,
    pub composer: String,
    /// Tempo in BPM (quarter notes per minute).
    pub tempo_bpm: u16,
    /// MIDI pitch of the key's root.
    pub key: u8,
    pub scale: ScaleType,
    /// Section order. Repeats allowed.
    pub structure: Vec<SectionKind>,
    /// Named catalogue progression applied to every section. None keeps
    /// each section's own harmonic pattern.
    pub progression: Option<String>,
    /// RNG seed. None draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SongConfig {
    fn default() -> Self {
        SongConfig {
            title: "Generated Multi-Instrument Song".to_string(),
            composer: "songsmith".to_string(),
            tempo_bpm: 110,
            key: 60,
            scale: ScaleType::Major,
            structure: SONG_STRUCTURE.to_vec(),
            progression: None,
            seed: None,
        }
    }
}

impl SongConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<SongConfig, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}
