use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use org_parser::{OrgFile, OrgValidator, ParserConfig, TrackId, TrackKind, ValidationConfig};
use tracing_subscriber::EnvFilter;

/// Inspect and edit Organya (.org) songs
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the header and instrument table
    Inspect { path: PathBuf },

    /// Print the raw bytes of a file in hex
    Hexdump { path: PathBuf },

    /// Print the decoded song as JSON
    Json {
        path: PathBuf,

        #[arg(long)]
        pretty: bool,
    },

    /// Write an empty song
    New {
        #[arg(default_value = OrgFile::DEFAULT_FILE_NAME)]
        path: PathBuf,
    },

    /// Decode strictly and report every problem found
    Check { path: PathBuf },

    /// Change header fields or instruments and write the song back
    Edit {
        path: PathBuf,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Milliseconds per tick
        #[arg(long)]
        tempo: Option<u32>,

        #[arg(long)]
        steps: Option<u32>,

        #[arg(long)]
        beats: Option<u32>,

        #[arg(long)]
        loop_start: Option<u64>,

        #[arg(long)]
        loop_end: Option<u64>,

        /// TRACK=VALUE, where TRACK is m0-m7, p0-p7 or a slot number
        #[arg(long, value_parser = parse_track_value)]
        pitch: Vec<(TrackId, u32)>,

        #[arg(long, value_parser = parse_track_value)]
        wave: Vec<(TrackId, u32)>,

        #[arg(long, value_parser = parse_track_value)]
        pi: Vec<(TrackId, u32)>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Inspect { path } => inspect(&path),
        Commands::Hexdump { path } => hexdump(&path),
        Commands::Json { path, pretty } => json(&path, pretty),
        Commands::New { path } => new(&path),
        Commands::Check { path } => check(&path),
        Commands::Edit {
            path,
            output,
            tempo,
            steps,
            beats,
            loop_start,
            loop_end,
            pitch,
            wave,
            pi,
        } => {
            let mut song = load(&path)?;
            let header = &mut song.header;

            if let Some(tempo) = tempo {
                header.set_tempo_wait_ms(tempo)?;
            }
            if let Some(steps) = steps {
                header.set_steps_per_bar(steps)?;
            }
            if let Some(beats) = beats {
                header.set_beats_per_step(beats)?;
            }
            if loop_start.is_some() || loop_end.is_some() {
                let start = loop_start.unwrap_or(header.loop_start_tick.into());
                let end = loop_end.unwrap_or(header.loop_end_tick.into());
                header.set_loop_range(start, end)?;
            }

            for (id, value) in pitch {
                song.track_mut(id)
                    .instrument
                    .set_pitch(value)
                    .with_context(|| format!("Setting pitch of {id}"))?;
            }
            for (id, value) in wave {
                song.track_mut(id)
                    .instrument
                    .set_waveform_id(value)
                    .with_context(|| format!("Setting waveform of {id}"))?;
            }
            for (id, value) in pi {
                song.track_mut(id)
                    .instrument
                    .set_pi(value)
                    .with_context(|| format!("Setting pi of {id}"))?;
            }

            let output = output.unwrap_or(path);
            song.to_path(&output)
                .with_context(|| format!("Writing {} failed", output.display()))?;
            tracing::info!(path = %output.display(), "song written");
            Ok(())
        }
    }
}

fn parse_track_value(input: &str) -> Result<(TrackId, u32), String> {
    let (track, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected TRACK=VALUE, got '{input}'"))?;
    let track = track.parse::<TrackId>().map_err(|e| e.to_string())?;
    let value = value.trim().parse::<u32>().map_err(|e| format!("'{value}': {e}"))?;
    Ok((track, value))
}

fn load(path: &Path) -> Result<OrgFile> {
    OrgFile::from_path(path).with_context(|| format!("Parsing {} failed", path.display()))
}

fn inspect(path: &Path) -> Result<()> {
    let song = load(path)?;
    let header = &song.header;

    println!("version    {}", header.version);
    println!("tempo      {} ms/tick", header.tempo_wait_ms);
    println!(
        "bar        {} steps x {} beats = {} ticks",
        header.steps_per_bar,
        header.beats_per_step,
        header.bar_length_ticks()
    );
    println!(
        "loop       {}..{} ({} ms)",
        header.loop_start_tick,
        header.loop_end_tick,
        header.loop_duration_ms()
    );
    println!();

    for (id, track) in song.tracks() {
        let kind = match id.kind() {
            TrackKind::Melody => "wave",
            TrackKind::Percussion => "drum",
        };
        println!(
            "{id:<3}| pitch {:>5} | {kind} {:>3} | pi {} | {:>5} notes",
            track.instrument.pitch,
            track.instrument.waveform_id,
            track.instrument.pi,
            track.note_count()
        );
    }

    if !song.trailing.is_empty() {
        println!("\n{} bytes of trailing data", song.trailing.len());
    }

    Ok(())
}

fn hexdump(path: &Path) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Opening {} failed", path.display()))?;

    for (row, chunk) in data.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|byte| format!("{byte:02X}")).collect();
        println!("{:08X}  {}", row * 16, hex.join(" "));
    }

    Ok(())
}

fn json(path: &Path, pretty: bool) -> Result<()> {
    let song = load(path)?;
    let text = if pretty {
        serde_json::to_string_pretty(&song)?
    } else {
        serde_json::to_string(&song)?
    };
    println!("{text}");
    Ok(())
}

fn new(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    OrgFile::new()
        .to_path(path)
        .with_context(|| format!("Writing {} failed", path.display()))?;
    tracing::info!(path = %path.display(), "created empty song");
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let decoded = OrgFile::from_path_with_config(path, &ParserConfig::strict())
        .with_context(|| format!("Parsing {} failed", path.display()))?;

    let issues = OrgValidator::new(ValidationConfig::strict()).collect_issues(&decoded.song);
    if issues.is_empty() {
        println!("{}: ok", path.display());
        return Ok(());
    }

    for issue in &issues {
        println!(
            "[{}] {} {}\n        {}",
            issue.category(),
            issue.code(),
            issue,
            issue.suggested_action()
        );
    }

    bail!("{} problem(s) found", issues.len())
}
