//! Catalog quality report.

use serde::{Deserialize, Serialize};

use crate::models::AssetCatalog;

/// Completeness below which a catalog is not considered ready.
pub const READY_THRESHOLD: f64 = 0.7;

/// Summary of how usable a normalized catalog is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Mean quality score over scored, available assets.
    pub completeness: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    /// Number of available assets of every kind.
    pub total_assets: usize,
}

impl QualityReport {
    /// Build the report for a catalog, given issues found while normalizing.
    ///
    /// Narration, clips, images and background contribute to completeness.
    pub fn assess(catalog: &AssetCatalog, required_tags: &[String], mut issues: Vec<String>) -> Self {
        let mut scores: Vec<f64> = Vec::new();

        match catalog.narration.as_ref().filter(|n| n.available) {
            Some(narration) => scores.push(narration.quality_score),
            None => issues.push("Voiceover file missing".to_string()),
        }

        let missing_required = required_tags
            .iter()
            .filter(|tag| {
                !catalog
                    .clips
                    .iter()
                    .any(|c| c.available && c.tag.as_deref() == Some(tag.as_str()))
            })
            .count();
        if missing_required > 0 {
            issues.push(format!("Missing {} required video clips", missing_required));
        }
        scores.extend(catalog.clips.iter().filter(|c| c.available).map(|c| c.quality_score));

        let images: Vec<f64> = catalog.available_images().map(|i| i.quality_score).collect();
        if images.is_empty() {
            issues.push("No images available".to_string());
        }
        scores.extend(images);

        match catalog.available_background() {
            Some(background) => scores.push(background.quality_score),
            None => issues.push("Background video missing".to_string()),
        }

        let completeness = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        let mut suggestions = Vec::new();
        if catalog.narration.as_ref().map_or(true, |n| !n.available) {
            suggestions.push("Generate voiceover audio".to_string());
        }
        if catalog.available_images().count() < 3 {
            suggestions.push("Generate more images for visual variety".to_string());
        }
        if catalog.available_background().is_none() {
            suggestions.push("Use solid color background as fallback".to_string());
        }

        Self {
            completeness,
            issues,
            suggestions,
            total_assets: count_available(catalog),
        }
    }

    pub fn ready_for_composition(&self) -> bool {
        self.completeness >= READY_THRESHOLD
    }
}

fn count_available(catalog: &AssetCatalog) -> usize {
    let singles = [
        &catalog.narration,
        &catalog.background,
        &catalog.post_screenshot,
    ]
    .into_iter()
    .filter(|asset| matches!(asset, Some(record) if record.available))
    .count();

    singles
        + catalog
            .clips
            .iter()
            .chain(&catalog.images)
            .chain(&catalog.comment_screenshots)
            .chain(&catalog.sound_effects)
            .filter(|a| a.available)
            .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetKind, AssetRecord};

    #[test]
    fn empty_catalog_reports_everything_missing() {
        let report = QualityReport::assess(&AssetCatalog::new(), &[], Vec::new());
        assert_eq!(report.completeness, 0.0);
        assert!(report.issues.contains(&"Voiceover file missing".to_string()));
        assert!(report.issues.contains(&"No images available".to_string()));
        assert_eq!(report.suggestions.len(), 3);
        assert_eq!(report.total_assets, 0);
        assert!(!report.ready_for_composition());
    }

    #[test]
    fn completeness_is_mean_of_scores() {
        let mut catalog = AssetCatalog::new();
        catalog.narration =
            Some(AssetRecord::new(AssetKind::Narration, "v.wav").with_quality(1.0));
        catalog.background =
            Some(AssetRecord::new(AssetKind::Background, "bg.mp4").with_quality(1.0));
        catalog.clips.push(
            AssetRecord::new(AssetKind::Clip, "c.mp4")
                .with_tag("action")
                .with_quality(0.5),
        );
        catalog
            .images
            .push(AssetRecord::new(AssetKind::Image, "i.png").with_quality(0.8));

        let required = vec!["action".to_string(), "reaction".to_string()];
        let report = QualityReport::assess(&catalog, &required, Vec::new());

        assert!((report.completeness - 0.825).abs() < 1e-9);
        assert!(report.ready_for_composition());
        assert_eq!(report.issues, vec!["Missing 1 required video clips".to_string()]);
        assert_eq!(report.total_assets, 4);
    }
}
