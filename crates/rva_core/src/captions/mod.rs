//! Caption store.
//!
//! Loads a SubRip caption stream into [`CaptionEntry`] values in narration
//! audio time and derives word-level timestamps by even subdivision.

mod error;
mod parser;
mod types;
mod writer;

use std::path::Path;

pub use error::{CaptionError, ParseError};
pub use parser::{parse_srt, parse_srt_time};
pub use types::{CaptionEntry, CaptionTrack, Word};
pub use writer::{format_srt_time, write_srt};

/// Load a caption file from disk.
pub fn load_captions(path: impl AsRef<Path>) -> Result<CaptionTrack, CaptionError> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| CaptionError::read(path, e))?;

    let mut track = parse_srt(&content)?;
    track.source_path = Some(path.to_path_buf());

    tracing::debug!(
        "Loaded {} caption entries from {}",
        track.len(),
        path.display()
    );
    Ok(track)
}

/// Load captions, degrading to an empty track on any failure.
///
/// Returns the track and the error message when loading failed.
pub fn load_captions_or_empty(path: impl AsRef<Path>) -> (CaptionTrack, Option<String>) {
    match load_captions(path.as_ref()) {
        Ok(track) => (track, None),
        Err(e) => {
            tracing::warn!("Captions unavailable, using word-count estimation: {}", e);
            (CaptionTrack::default(), Some(e.to_string()))
        }
    }
}

/// Save entries as SRT.
pub fn save_captions(path: impl AsRef<Path>, entries: &[CaptionEntry]) -> Result<(), CaptionError> {
    let path = path.as_ref();
    std::fs::write(path, write_srt(entries)).map_err(|e| CaptionError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_reads_and_records_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("captions.srt");
        std::fs::write(&path, "1\n00:00:00,000 --> 00:00:02,000\nhalo guys\n").unwrap();

        let track = load_captions(&path).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(track.words().len(), 2);
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let (track, err) = load_captions_or_empty(dir.path().join("nope.srt"));
        assert!(track.is_empty());
        assert!(err.is_some());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.srt");
        save_captions(&path, &[CaptionEntry::new(1, 1.0, 2.0, "x")]).unwrap();
        assert_eq!(load_captions(&path).unwrap().len(), 1);
    }
}
