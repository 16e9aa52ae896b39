//! Caption error types.

use std::path::PathBuf;

/// Errors that can occur while loading captions.
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    /// Failed to read caption file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write caption file.
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Parse error.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

/// Errors that can occur during caption parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid or malformed time format.
    #[error("Invalid time format at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },

    /// Entry whose end precedes its start.
    #[error("Invalid entry at line {line}: {message}")]
    InvalidEntry { line: usize, message: String },

    /// Block with text but no timing line.
    #[error("Missing timing line in block starting at line {line}")]
    MissingTiming { line: usize },
}

impl CaptionError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl ParseError {
    /// Create an invalid time error.
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }

    /// Create an invalid entry error.
    pub fn invalid_entry(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            line,
            message: message.into(),
        }
    }
}
