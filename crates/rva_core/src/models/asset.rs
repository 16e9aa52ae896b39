//! Normalized asset records.
//!
//! Raw inputs (paths, loose JSON objects) are normalized into these records
//! by the `catalog` module before the engine ever sees them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Category of a catalogued asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Narration,
    Background,
    Clip,
    Image,
    PostScreenshot,
    CommentScreenshot,
    SoundEffect,
}

/// A single normalized asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub kind: AssetKind,
    pub path: PathBuf,
    /// Whether the file existed when the catalog was built.
    pub available: bool,
    /// Media duration in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Clip break tag or sound-effect type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tie-breaker only.
    pub quality_score: f64,
}

impl AssetRecord {
    /// Create an available record with no duration.
    pub fn new(kind: AssetKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            available: true,
            duration: None,
            tag: None,
            description: None,
            quality_score: 0.0,
        }
    }

    /// Set the duration (builder pattern).
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set the tag (builder pattern).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark availability (builder pattern).
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Set the quality score (builder pattern).
    pub fn with_quality(mut self, score: f64) -> Self {
        self.quality_score = score;
        self
    }

    /// Stable reference used in layers and the used-asset set.
    pub fn asset_ref(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Lowercased file name, used for name-based matching.
    pub fn file_name_lower(&self) -> String {
        file_name_lower(&self.path)
    }

    /// Whether the lowercased file name contains any of `needles`.
    pub fn name_contains_any(&self, needles: &[&str]) -> bool {
        let name = self.file_name_lower();
        needles.iter().any(|n| name.contains(n))
    }
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Everything the engine may place on a timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    pub narration: Option<AssetRecord>,
    pub background: Option<AssetRecord>,
    /// Clip candidates in deterministic (tag) order.
    #[serde(default)]
    pub clips: Vec<AssetRecord>,
    #[serde(default)]
    pub images: Vec<AssetRecord>,
    pub post_screenshot: Option<AssetRecord>,
    #[serde(default)]
    pub comment_screenshots: Vec<AssetRecord>,
    #[serde(default)]
    pub sound_effects: Vec<AssetRecord>,
}

impl AssetCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a clip for a break tag.
    ///
    /// Exact tag match first, then the first available clip of any tag.
    pub fn resolve_clip(&self, break_type: &str) -> Option<&AssetRecord> {
        self.clips
            .iter()
            .find(|c| c.available && c.tag.as_deref() == Some(break_type))
            .or_else(|| self.clips.iter().find(|c| c.available))
    }

    /// Number of clips that are available.
    pub fn available_clip_count(&self) -> usize {
        self.clips.iter().filter(|c| c.available).count()
    }

    /// Available images in catalog order.
    pub fn available_images(&self) -> impl Iterator<Item = &AssetRecord> {
        self.images.iter().filter(|i| i.available)
    }

    /// Available background, if any.
    pub fn available_background(&self) -> Option<&AssetRecord> {
        self.background.as_ref().filter(|b| b.available)
    }

    /// Available post screenshot, if any.
    pub fn available_post_screenshot(&self) -> Option<&AssetRecord> {
        self.post_screenshot.as_ref().filter(|s| s.available)
    }

    /// First available sound effect whose file name or type contains `needle`.
    pub fn find_sound_effect(&self, needle: &str) -> Option<&AssetRecord> {
        self.sound_effects.iter().find(|s| {
            s.available
                && (s.file_name_lower().contains(needle)
                    || s.tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(needle)))
        })
    }

    /// First available sound effect.
    pub fn first_sound_effect(&self) -> Option<&AssetRecord> {
        self.sound_effects.iter().find(|s| s.available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(tag: &str, available: bool) -> AssetRecord {
        AssetRecord::new(AssetKind::Clip, format!("/clips/{}.mp4", tag))
            .with_tag(tag)
            .with_duration(10.0)
            .with_available(available)
    }

    #[test]
    fn resolve_clip_prefers_exact_tag() {
        let catalog = AssetCatalog {
            clips: vec![clip("intro", true), clip("action", true)],
            ..Default::default()
        };
        assert_eq!(
            catalog.resolve_clip("action").unwrap().tag.as_deref(),
            Some("action")
        );
    }

    #[test]
    fn resolve_clip_falls_back_to_first_available() {
        let catalog = AssetCatalog {
            clips: vec![clip("action", false), clip("punchline", true)],
            ..Default::default()
        };
        assert_eq!(
            catalog.resolve_clip("action").unwrap().tag.as_deref(),
            Some("punchline")
        );
    }

    #[test]
    fn resolve_clip_none_when_nothing_available() {
        let catalog = AssetCatalog {
            clips: vec![clip("action", false)],
            ..Default::default()
        };
        assert!(catalog.resolve_clip("action").is_none());
        assert_eq!(catalog.available_clip_count(), 0);
    }

    #[test]
    fn sound_effect_lookup_by_name() {
        let catalog = AssetCatalog {
            sound_effects: vec![
                AssetRecord::new(AssetKind::SoundEffect, "/sfx/Whoosh_01.mp3"),
                AssetRecord::new(AssetKind::SoundEffect, "/sfx/boom.mp3").with_tag("impact"),
            ],
            ..Default::default()
        };
        assert!(catalog.find_sound_effect("whoosh").is_some());
        assert!(catalog.find_sound_effect("impact").is_some());
        assert!(catalog.find_sound_effect("pop").is_none());
    }
}
