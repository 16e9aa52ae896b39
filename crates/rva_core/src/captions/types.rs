//! Caption data types.
//!
//! All times are `f64` seconds in narration-audio coordinates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One timed caption entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// 1-based position in the source file.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionEntry {
    /// Create an entry.
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the text ends a sentence.
    pub fn ends_sentence(&self) -> bool {
        self.text
            .trim_end()
            .ends_with(|c: char| matches!(c, '.' | '!' | '?'))
    }

    /// Derive word timestamps by evenly subdividing the entry span.
    ///
    /// Word `i` of `k` occupies `[start + i*d, start + (i+1)*d)` with
    /// `d = (end - start) / k`. Entries with no words yield nothing.
    pub fn words(&self) -> Vec<Word> {
        let tokens: Vec<&str> = self.text.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let step = self.duration() / tokens.len() as f64;
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| Word {
                text: (*token).to_string(),
                start: self.start + i as f64 * step,
                end: self.start + (i + 1) as f64 * step,
            })
            .collect()
    }
}

/// A word with a derived timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    /// Lowercased text for matching.
    pub fn normalized(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Parsed caption stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionTrack {
    /// Entries in source order.
    pub entries: Vec<CaptionEntry>,
    /// Source file path (if loaded from file).
    pub source_path: Option<PathBuf>,
}

impl CaptionTrack {
    /// Create a track from entries.
    pub fn new(entries: Vec<CaptionEntry>) -> Self {
        Self {
            entries,
            source_path: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// End of the last entry.
    pub fn duration(&self) -> f64 {
        self.entries.iter().map(|e| e.end).fold(0.0, f64::max)
    }

    /// Word-level timestamps across all entries.
    pub fn words(&self) -> Vec<Word> {
        self.entries.iter().flat_map(|e| e.words()).collect()
    }

    /// Truncate entries to the real narration-audio length.
    ///
    /// Entries starting at or after `audio_len` are dropped; entries running
    /// past it are clamped. Returns the number of entries affected.
    pub fn truncate_to(&mut self, audio_len: f64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.start < audio_len);
        let mut affected = before - self.entries.len();

        for entry in &mut self.entries {
            if entry.end > audio_len {
                entry.end = audio_len;
                affected += 1;
            }
        }
        affected
    }
}
