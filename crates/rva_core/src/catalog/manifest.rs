//! Raw asset manifest as produced by upstream collaborators.
//!
//! Clips may be listed as a bare path or as an object with metadata, and
//! sound effects as a bare path or `{path, type}`. Both shapes are accepted
//! here and flattened by [`super::normalize_catalog`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// A media file given either as a path or with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaRef {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        duration: Option<f64>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl MediaRef {
    pub fn path(&self) -> &Path {
        match self {
            MediaRef::Path(path) => path,
            MediaRef::Detailed { path, .. } => path,
        }
    }

    /// Declared duration; zero or negative counts as unknown.
    pub fn duration(&self) -> Option<f64> {
        match self {
            MediaRef::Path(_) => None,
            MediaRef::Detailed { duration, .. } => duration.filter(|d| *d > 0.0),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            MediaRef::Path(_) => None,
            MediaRef::Detailed { description, .. } => description.as_deref(),
        }
    }

    fn path_mut(&mut self) -> &mut PathBuf {
        match self {
            MediaRef::Path(path) => path,
            MediaRef::Detailed { path, .. } => path,
        }
    }
}

/// A sound effect given either as a path or as `{path, type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SfxRef {
    Path(PathBuf),
    Typed {
        path: PathBuf,
        #[serde(rename = "type", default = "default_sfx_type")]
        sfx_type: String,
    },
}

fn default_sfx_type() -> String {
    "generic".to_string()
}

impl SfxRef {
    pub fn path(&self) -> &Path {
        match self {
            SfxRef::Path(path) => path,
            SfxRef::Typed { path, .. } => path,
        }
    }

    pub fn sfx_type(&self) -> &str {
        match self {
            SfxRef::Path(_) => "generic",
            SfxRef::Typed { sfx_type, .. } => sfx_type,
        }
    }

    fn path_mut(&mut self) -> &mut PathBuf {
        match self {
            SfxRef::Path(path) => path,
            SfxRef::Typed { path, .. } => path,
        }
    }
}

/// Everything the engine may consume, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub narration: Option<MediaRef>,
    #[serde(default)]
    pub captions: Option<PathBuf>,
    #[serde(default)]
    pub background: Option<MediaRef>,
    /// Clip candidates keyed by break tag.
    #[serde(default)]
    pub clips: BTreeMap<String, MediaRef>,
    #[serde(default)]
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub post_screenshot: Option<PathBuf>,
    #[serde(default)]
    pub comment_screenshots: Vec<PathBuf>,
    #[serde(default)]
    pub sound_effects: Vec<SfxRef>,
}

impl CatalogManifest {
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a manifest file, resolving relative paths against its directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let mut manifest = Self::from_json(&content)?;
        if let Some(base) = path.parent() {
            manifest.resolve_relative(base);
        }
        Ok(manifest)
    }

    /// Prefix every relative path with `base`.
    pub fn resolve_relative(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(narration) = self.narration.as_mut() {
            fix(narration.path_mut());
        }
        if let Some(captions) = self.captions.as_mut() {
            fix(captions);
        }
        if let Some(background) = self.background.as_mut() {
            fix(background.path_mut());
        }
        for clip in self.clips.values_mut() {
            fix(clip.path_mut());
        }
        self.images.iter_mut().for_each(fix);
        if let Some(post) = self.post_screenshot.as_mut() {
            fix(post);
        }
        self.comment_screenshots.iter_mut().for_each(fix);
        for sfx in &mut self.sound_effects {
            fix(sfx.path_mut());
        }
    }
}
