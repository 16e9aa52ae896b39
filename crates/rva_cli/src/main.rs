//! RVA timeline command-line interface.
//!
//! Builds a composition timeline from a script, captions and an asset
//! manifest and dumps it as JSON. Nothing is rendered.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// RVA - Timeline composition for short narrated videos
#[derive(Parser, Debug)]
#[command(name = "rva-timeline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a timeline and write it as JSON
    Build(BuildArgs),
    /// Split a script into segments
    Segments {
        /// Script text file with [VIDEO_BREAK: ...] markers
        script: PathBuf,
    },
    /// Detect beats and keyword matches in an SRT file
    Beats {
        /// Caption file (SRT)
        captions: PathBuf,
    },
    /// List the strategy presets
    Presets,
    /// Write a default config file, or clean an existing one
    InitConfig {
        /// Config file path
        #[arg(default_value = "rva.toml")]
        path: PathBuf,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Asset manifest (JSON)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Script text file
    #[arg(short, long, required_unless_present = "segments", conflicts_with = "segments")]
    script: Option<PathBuf>,

    /// Pre-segmented script (JSON list of segments)
    #[arg(long)]
    segments: Option<PathBuf>,

    /// Caption file (SRT); defaults to the manifest's captions entry
    #[arg(long)]
    captions: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy preset: action_packed, storytelling, educational, dramatic
    #[arg(short, long)]
    preset: Option<String>,

    /// Narration tempo override
    #[arg(long)]
    tempo: Option<f64>,

    /// Write the timeline JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export output-time captions as SRT
    #[arg(long)]
    srt: Option<PathBuf>,

    /// Directory for the run log file
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Run name used in logs
    #[arg(long, default_value = "timeline")]
    name: String,

    /// Do not call ffprobe for missing durations
    #[arg(long)]
    no_probe: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::build(args, cli.verbose),
        Commands::Segments { script } => commands::segments(&script),
        Commands::Beats { captions } => commands::beats(&captions),
        Commands::Presets => commands::presets(),
        Commands::InitConfig { path } => commands::init_config(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
