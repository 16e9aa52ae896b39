//! Script segmentation.
//!
//! Splits raw narration scripts on `[VIDEO_BREAK: ...]` markers into typed
//! segments. Scripts may also arrive pre-segmented as a JSON list.

mod error;
mod segmenter;

use std::path::Path;

pub use error::ScriptError;
pub use segmenter::{parse_break_duration, parse_script, split_sentences, ParsedScript};

pub(crate) use segmenter::check_well_formed;

use crate::models::Segment;

/// Read a script file and segment it.
pub fn load_script(path: impl AsRef<Path>) -> Result<ParsedScript, ScriptError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ScriptError::read(path, e))?;
    Ok(parse_script(&text))
}

/// Read a JSON list of already-segmented script parts.
///
/// Segments are returned sorted by `order`.
pub fn load_segments(path: impl AsRef<Path>) -> Result<ParsedScript, ScriptError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ScriptError::read(path, e))?;
    let mut segments: Vec<Segment> =
        serde_json::from_str(&text).map_err(|source| ScriptError::InvalidSegments {
            path: path.to_path_buf(),
            source,
        })?;
    segments.sort_by_key(|s| s.order);

    Ok(ParsedScript {
        has_breaks: segments.iter().any(|s| s.break_type.is_some()),
        segments,
    })
}
