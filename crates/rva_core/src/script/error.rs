//! Script loading errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Pre-segmented JSON that does not describe valid segments, including
    /// unknown segment types.
    #[error("Invalid segment list in '{path}': {source}")]
    InvalidSegments {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ScriptError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }
}
