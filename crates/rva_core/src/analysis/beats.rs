//! Narrative beat detection from caption punctuation and pauses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::captions::CaptionEntry;

/// Strength assigned to sentence-end beats.
pub const SENTENCE_END_STRENGTH: f64 = 0.8;

/// Minimum gap (seconds) between entries that counts as a pause.
pub const PAUSE_THRESHOLD: f64 = 0.3;

/// Gap length at which a pause reaches full strength.
const FULL_PAUSE: f64 = 0.5;

/// Dedup bucket width in seconds.
const BUCKET: f64 = 0.1;

/// What produced a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeatKind {
    SentenceEnd,
    Pause,
}

/// A likely point for visual emphasis, in narration-audio seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub time: f64,
    pub kind: BeatKind,
    /// In `[0, 1]`.
    pub strength: f64,
}

/// Detect beats across caption entries.
///
/// Beats are deduplicated per 0.1s bucket keeping the strictly stronger one,
/// and returned in ascending time order.
pub fn detect_beats(entries: &[CaptionEntry]) -> Vec<Beat> {
    let mut buckets: BTreeMap<i64, Beat> = BTreeMap::new();

    let mut offer = |beat: Beat| {
        let key = (beat.time / BUCKET).round() as i64;
        match buckets.get(&key) {
            Some(existing) if existing.strength >= beat.strength => {}
            _ => {
                buckets.insert(key, beat);
            }
        }
    };

    for (i, entry) in entries.iter().enumerate() {
        if entry.ends_sentence() {
            offer(Beat {
                time: entry.end,
                kind: BeatKind::SentenceEnd,
                strength: SENTENCE_END_STRENGTH,
            });
        }

        if let Some(next) = entries.get(i + 1) {
            let gap = next.start - entry.end;
            if gap > PAUSE_THRESHOLD {
                offer(Beat {
                    time: entry.end,
                    kind: BeatKind::Pause,
                    strength: (gap / FULL_PAUSE).min(1.0),
                });
            }
        }
    }

    let beats: Vec<Beat> = buckets.into_values().collect();
    tracing::debug!("Detected {} beats from {} caption entries", beats.len(), entries.len());
    beats
}
