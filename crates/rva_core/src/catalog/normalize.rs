//! Manifest normalization into [`AssetCatalog`].
//!
//! Every file is checked for existence once and every missing duration is
//! probed once. The engine only ever sees the resulting records.

use std::path::Path;

use super::manifest::CatalogManifest;
use super::probe::DurationProbe;
use super::report::QualityReport;
use crate::models::{AssetCatalog, AssetKind, AssetRecord};

/// Clips shorter than this lose part of their quality score.
pub const MIN_CLIP_DURATION: f64 = 2.0;

const IMAGE_SCORE: f64 = 0.8;
const POST_SCREENSHOT_SCORE: f64 = 1.0;
const COMMENT_SCREENSHOT_SCORE: f64 = 0.9;
const SFX_SCORE: f64 = 0.8;

/// Result of normalizing a manifest.
#[derive(Debug, Clone)]
pub struct NormalizedCatalog {
    pub catalog: AssetCatalog,
    pub report: QualityReport,
}

/// Normalize a manifest.
///
/// `required_tags` are the break tags the script asks for; they raise clip
/// scores and drive the missing-clip issue.
pub fn normalize_catalog(
    manifest: &CatalogManifest,
    required_tags: &[String],
    probe: &dyn DurationProbe,
) -> NormalizedCatalog {
    let mut issues = Vec::new();
    let mut catalog = AssetCatalog::new();

    if let Some(narration) = &manifest.narration {
        let mut record = AssetRecord::new(AssetKind::Narration, narration.path())
            .with_available(exists(narration.path()))
            .with_quality(1.0);
        if record.available {
            record.duration = narration.duration().or_else(|| {
                probe_or_note(probe, narration.path(), "Narration", &mut issues)
            });
        }
        catalog.narration = Some(record);
    }

    if let Some(background) = &manifest.background {
        let mut record = AssetRecord::new(AssetKind::Background, background.path())
            .with_available(exists(background.path()))
            .with_quality(1.0);
        if record.available {
            // Background duration is informational; it loops anyway.
            record.duration = background
                .duration()
                .or_else(|| probe.probe_duration(background.path()).ok());
        }
        catalog.background = Some(record);
    }

    for (tag, clip) in &manifest.clips {
        let mut record = AssetRecord::new(AssetKind::Clip, clip.path()).with_tag(tag);
        record.description = clip.description().map(str::to_string);

        if !exists(clip.path()) {
            issues.push(format!("Clip '{}': file not found", tag));
            catalog.clips.push(record.with_available(false));
            continue;
        }

        let duration = clip.duration().or_else(|| {
            probe_or_note(probe, clip.path(), &format!("Clip '{}'", tag), &mut issues)
        });
        let Some(duration) = duration else {
            catalog.clips.push(record.with_available(false));
            continue;
        };

        let required = required_tags.iter().any(|t| t == tag);
        let mut score = 0.5;
        if required {
            score += 0.3;
        }
        if duration >= MIN_CLIP_DURATION {
            score += 0.2;
        } else {
            issues.push(format!("Clip '{}': duration too short", tag));
        }
        catalog
            .clips
            .push(record.with_duration(duration).with_quality(score));
    }

    catalog.images = manifest
        .images
        .iter()
        .map(|path| {
            AssetRecord::new(AssetKind::Image, path)
                .with_available(exists(path))
                .with_quality(IMAGE_SCORE)
        })
        .collect();

    catalog.post_screenshot = manifest.post_screenshot.as_ref().map(|path| {
        AssetRecord::new(AssetKind::PostScreenshot, path)
            .with_available(exists(path))
            .with_quality(POST_SCREENSHOT_SCORE)
    });

    catalog.comment_screenshots = manifest
        .comment_screenshots
        .iter()
        .map(|path| {
            AssetRecord::new(AssetKind::CommentScreenshot, path)
                .with_available(exists(path))
                .with_quality(COMMENT_SCREENSHOT_SCORE)
        })
        .collect();

    catalog.sound_effects = manifest
        .sound_effects
        .iter()
        .map(|sfx| {
            AssetRecord::new(AssetKind::SoundEffect, sfx.path())
                .with_tag(sfx.sfx_type())
                .with_available(exists(sfx.path()))
                .with_quality(SFX_SCORE)
        })
        .collect();

    let report = QualityReport::assess(&catalog, required_tags, issues);
    tracing::info!(
        "Catalog normalized: {} available assets, completeness {:.0}%",
        report.total_assets,
        report.completeness * 100.0
    );
    for issue in &report.issues {
        tracing::warn!("Catalog issue: {}", issue);
    }

    NormalizedCatalog { catalog, report }
}

fn exists(path: &Path) -> bool {
    path.exists()
}

fn probe_or_note(
    probe: &dyn DurationProbe,
    path: &Path,
    label: &str,
    issues: &mut Vec<String>,
) -> Option<f64> {
    match probe.probe_duration(path) {
        Ok(duration) => Some(duration),
        Err(e) => {
            issues.push(format!("{}: duration unavailable ({})", label, e));
            None
        }
    }
}
