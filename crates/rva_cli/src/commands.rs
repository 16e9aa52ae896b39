//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::BuildArgs;
use rva_core::analysis::{detect_beats, KeywordTable};
use rva_core::captions::{load_captions, load_captions_or_empty, save_captions, CaptionTrack};
use rva_core::catalog::{normalize_catalog, CatalogManifest, DurationProbe, FfprobeProbe, NoProbe};
use rva_core::config::{ConfigManager, Settings};
use rva_core::logging::{init_tracing, LogConfig, LogLevel, RunLogger};
use rva_core::script::{load_script, load_segments};
use rva_core::strategy::StrategyPreset;
use rva_core::{produce_timeline, TimelineRequest};

/// Build a timeline and write it as JSON.
pub fn build(args: BuildArgs, verbose: bool) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => {
            let mut manager = ConfigManager::new(path);
            manager
                .load()
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            manager.settings().clone()
        }
        None => Settings::default(),
    };

    init_tracing(if verbose {
        LogLevel::Debug
    } else {
        settings.logging.level
    });

    if let Some(preset) = &args.preset {
        let preset: StrategyPreset = preset.parse()?;
        settings.strategy.preset = Some(preset.name().to_string());
    }
    if let Some(tempo) = args.tempo {
        settings.strategy.tempo = Some(tempo);
    }

    let parsed = match (&args.script, &args.segments) {
        (Some(path), _) => load_script(path)?,
        (None, Some(path)) => load_segments(path)?,
        (None, None) => bail!("either --script or --segments is required"),
    };
    let required_tags: Vec<String> = parsed.break_types().iter().map(|t| t.to_string()).collect();

    let manifest = CatalogManifest::from_json_file(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;
    let probe: &dyn DurationProbe = if args.no_probe { &NoProbe } else { &FfprobeProbe };
    let normalized = normalize_catalog(&manifest, &required_tags, probe);
    tracing::info!(
        "Catalog completeness {:.0}%",
        normalized.report.completeness * 100.0
    );

    let captions_path = args.captions.clone().or_else(|| manifest.captions.clone());
    let (captions, caption_error) = match &captions_path {
        Some(path) => load_captions_or_empty(path),
        None => (CaptionTrack::default(), None),
    };

    let log_config = LogConfig::from(&settings.logging);
    let logger = match &args.log_dir {
        Some(dir) => RunLogger::new(&args.name, dir, log_config, None)
            .with_context(|| format!("Failed to create run log in {}", dir.display()))?,
        None => RunLogger::detached(&args.name, log_config),
    };

    let mut request = TimelineRequest::from_segments(parsed.segments, normalized.catalog)
        .with_run_name(&args.name)
        .with_captions(captions)
        .with_settings(settings)
        .with_catalog_issues(normalized.report.issues)
        .with_logger(Arc::new(logger));
    if let Some(message) = caption_error {
        request = request.with_caption_error(message);
    }

    let plan = produce_timeline(request)?;

    if let Some(path) = &args.srt {
        save_captions(path, &plan.timeline.caption_entries())?;
    }

    let rendered = serde_json::to_string_pretty(&plan)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}: {:.2}s, {} layers, {} skipped items",
                path.display(),
                plan.timeline.total_duration,
                plan.timeline.metadata.layer_count,
                plan.timeline.trace.len()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Print the segments of a script file.
pub fn segments(script: &Path) -> Result<()> {
    let parsed = load_script(script)?;
    println!("{}", serde_json::to_string_pretty(&parsed.segments)?);
    Ok(())
}

/// Print the beats and keyword matches of a caption file.
pub fn beats(captions: &Path) -> Result<()> {
    let track = load_captions(captions)?;
    let beats = detect_beats(&track.entries);
    let matches = KeywordTable::default().match_words(&track.words());
    let out = json!({
        "caption_entries": track.len(),
        "duration": track.duration(),
        "beats": beats,
        "keyword_matches": matches,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Print every strategy preset.
pub fn presets() -> Result<()> {
    for preset in StrategyPreset::ALL {
        let config = preset.config();
        println!(
            "{:<14} tempo {:.2}  image {:.1}s  ducking {}  target volume {:.2}",
            preset.name(),
            config.tempo,
            config.image_duration,
            config.ducking_curve,
            config.duck_target_volume
        );
    }
    Ok(())
}

/// Create or clean a config file.
pub fn init_config(path: &Path) -> Result<()> {
    let mut manager = ConfigManager::new(path);
    manager
        .load_or_create()
        .with_context(|| format!("Failed to initialize config {}", path.display()))?;
    println!("Config ready at {}", manager.path().display());
    Ok(())
}
