//! Narration duration estimation.

use crate::captions::CaptionEntry;

/// Fallback speaking rate in words per minute.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Fraction of the segment text that accumulated captions must cover.
const COVERAGE: f64 = 0.8;

/// Tolerance when comparing caption starts with the audio cursor.
const EPS: f64 = 1e-6;

/// How an estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSource {
    Captions,
    WordCount,
}

/// Estimated narration duration in source-audio seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimate {
    pub seconds: f64,
    pub source: EstimateSource,
}

/// Estimate how long `text` takes to speak starting at `audio_position`.
///
/// Walks caption entries starting at or after the cursor, accumulating their
/// text until it covers 80% of the segment text length; the duration runs to
/// the end of the last accumulated entry. Falls back to 150 wpm.
pub fn estimate_duration(text: &str, captions: &[CaptionEntry], audio_position: f64) -> DurationEstimate {
    let target_len = text.trim().chars().count() as f64 * COVERAGE;
    let mut covered = String::new();

    for entry in captions.iter().filter(|e| e.start >= audio_position - EPS) {
        if !covered.is_empty() {
            covered.push(' ');
        }
        covered.push_str(entry.text.trim());

        if covered.chars().count() as f64 >= target_len {
            let seconds = entry.end - audio_position;
            if seconds > 0.0 {
                return DurationEstimate {
                    seconds,
                    source: EstimateSource::Captions,
                };
            }
            break;
        }
    }

    DurationEstimate {
        seconds: word_count_duration(text),
        source: EstimateSource::WordCount,
    }
}

/// `words / 150 × 60` seconds.
pub fn word_count_duration(text: &str) -> f64 {
    text.split_whitespace().count() as f64 / WORDS_PER_MINUTE * 60.0
}
