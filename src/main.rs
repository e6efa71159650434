// Songsmith — CLI entry point.
//
// Generates a multi-instrument verse/chorus song and writes it to MIDI
// (plus an optional LilyPond lead sheet).
//
// Usage:
//   cargo run -- [output.mid] [--seed N] [--tempo BPM] [--key N]
//     [--scale NAME] [--progression NAME] [--title TEXT] [--config FILE]
//     [--lyrics FILE] [--ly FILE]
//
// Scales: major, minor, pentatonic, blues, dorian
// Progressions: basic, pop, blues, jazz, epic (default: per-section)

use rand::SeedableRng;
use rand::rngs::StdRng;
use songsmith::arrange::{arrange_song, structure_measures};
use songsmith::chord::progression_pattern;
use songsmith::config::SongConfig;
use songsmith::event::pitch_name;
use songsmith::lilypond::write_lilypond;
use songsmith::lyrics::{apply_lyrics, split_words};
use songsmith::midi::write_midi;
use songsmith::scale::ScaleType;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("song.mid");

    // Config file first, then flags override.
    let mut config = match parse_flag::<String>(&args, "--config") {
        Some(path) => match SongConfig::load(Path::new(&path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config '{}': {}. Using defaults.", path, e);
                SongConfig::default()
            }
        },
        None => SongConfig::default(),
    };

    if let Some(seed) = parse_flag(&args, "--seed") {
        config.seed = Some(seed);
    }
    if let Some(tempo) = parse_flag(&args, "--tempo") {
        config.tempo_bpm = tempo;
    }
    if let Some(key) = parse_flag(&args, "--key") {
        config.key = key;
    }
    if let Some(scale) = parse_flag::<String>(&args, "--scale") {
        config.scale = ScaleType::from_name(&scale);
    }
    if let Some(name) = parse_flag::<String>(&args, "--progression") {
        config.progression = Some(name);
    }
    if let Some(title) = parse_flag::<String>(&args, "--title") {
        config.title = title;
    }

    println!("=== Songsmith ===");
    println!("Output: {}", output_path);
    println!(
        "Key: {} {} | Tempo: {} BPM",
        pitch_name(config.key),
        config.scale.name(),
        config.tempo_bpm
    );
    println!(
        "Structure: {} sections, {} measures",
        config.structure.len(),
        structure_measures(&config.structure)
    );
    if let Some(name) = &config.progression {
        println!("Progression: {}", name);
    }
    if let Some(s) = config.seed {
        println!("Seed: {}", s);
    }
    println!();

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    println!("[1/3] Arranging...");
    let progression = config.progression.as_deref().map(progression_pattern);
    let mut song = arrange_song(
        &config.title,
        &config.composer,
        config.tempo_bpm,
        config.key,
        config.scale,
        &config.structure,
        progression,
        &mut rng,
    );
    for (role, track) in song.tracks() {
        println!(
            "  {:>6}: {} notes over {:.0} beats",
            role.name(),
            track.note_count(),
            track.end_beats
        );
    }

    println!("[2/3] Attaching lyrics...");
    match parse_flag::<String>(&args, "--lyrics") {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => {
                let words = split_words(&text);
                let assigned = apply_lyrics(&mut song, &words);
                println!("  {} words aligned to {} lead notes.", words.len(), assigned);
            }
            Err(e) => eprintln!("  Failed to read lyrics '{}': {}. Skipping.", path, e),
        },
        None => println!("  No lyrics file given."),
    }

    println!("[3/3] Writing MIDI to {}...", output_path);
    if let Err(e) = write_midi(&song, Path::new(output_path)) {
        eprintln!("  Error writing MIDI: {}", e);
        std::process::exit(1);
    }
    let beats = structure_measures(&config.structure) as f64 * 4.0;
    let seconds = beats * 60.0 / config.tempo_bpm as f64;
    println!("  Done! Duration: {:.0}s ({} measures)", seconds, beats as usize / 4);

    if let Some(ly_path) = parse_flag::<String>(&args, "--ly") {
        println!("Writing lead sheet to {}...", ly_path);
        if let Err(e) = write_lilypond(&song, config.scale, config.key, Path::new(&ly_path)) {
            eprintln!("  Error writing LilyPond: {}", e);
            std::process::exit(1);
        }
    }

    println!();
    println!("Play with: timidity {} (or any MIDI player)", output_path);
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
