//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or probing catalog inputs.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Probe failed for '{path}': {message}")]
    ProbeFailed { path: PathBuf, message: String },

    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },
}

impl CatalogError {
    pub fn probe_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
