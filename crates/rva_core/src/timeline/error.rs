//! Fatal timeline build errors.

use thiserror::Error;

/// Conditions under which no timeline can be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Narration audio source is missing")]
    MissingNarration,

    #[error("No narration audio duration available")]
    NoNarrationDuration,

    #[error("Malformed segment {order}: {reason}")]
    MalformedSegment { order: usize, reason: String },
}

impl BuildError {
    pub fn malformed(order: usize, reason: impl Into<String>) -> Self {
        Self::MalformedSegment {
            order,
            reason: reason.into(),
        }
    }
}
