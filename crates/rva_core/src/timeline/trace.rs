//! Recoverable conditions recorded while producing a timeline.

use serde::{Deserialize, Serialize};

use super::types::TrackKind;
use crate::analysis::AssetCategory;

/// Why a unit of work was skipped, clamped or trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No clip for the break tag and no fallback clip.
    ClipUnavailable { segment: usize, break_type: String },
    /// Video break with a non-positive duration.
    EmptyBreak { segment: usize },
    /// Background video missing; recorded once per build.
    MissingBackground,
    /// Narration estimate exceeded the remaining audio.
    NarrationClamped {
        segment: usize,
        requested: f64,
        granted: f64,
    },
    /// Narration audio was already used up.
    NarrationExhausted { segment: usize },
    /// Caption entries ran past the real audio length.
    CaptionsTruncated { affected: usize, audio_length: f64 },
    /// Caption stream could not be loaded.
    CaptionsUnavailable { message: String },
    /// Caption entry fell outside every narration window.
    CaptionUnmapped { index: usize },
    /// Referenced asset file is not available.
    AssetMissing { asset_ref: String },
    /// Keyword matched but every candidate asset was used or absent.
    NoCandidateAsset {
        keyword: String,
        category: AssetCategory,
    },
    /// Audio-time point (beat, keyword) outside every narration window.
    OutsideNarration { label: String, time: f64 },
    /// Sound-effect cue with no matching sound file.
    SfxUnmatched { cue: String },
    /// Layer end clamped to the timeline duration.
    LayerClamped {
        track: TrackKind,
        original_end: f64,
        clamped_end: f64,
    },
    /// Layer start moved past the previous layer on the same track.
    LayerTrimmed {
        track: TrackKind,
        original_start: f64,
        new_start: f64,
    },
    /// Layer removed as too short after trimming or clamping.
    LayerDropped {
        track: TrackKind,
        start: f64,
        end: f64,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ClipUnavailable {
                segment,
                break_type,
            } => write!(
                f,
                "segment {}: no clip available for '{}', break skipped",
                segment, break_type
            ),
            SkipReason::EmptyBreak { segment } => {
                write!(f, "segment {}: video break has no duration", segment)
            }
            SkipReason::MissingBackground => write!(f, "background video missing"),
            SkipReason::NarrationClamped {
                segment,
                requested,
                granted,
            } => write!(
                f,
                "segment {}: narration estimate {:.2}s exceeds remaining audio, capped to {:.2}s",
                segment, requested, granted
            ),
            SkipReason::NarrationExhausted { segment } => {
                write!(f, "segment {}: narration audio exhausted", segment)
            }
            SkipReason::CaptionsTruncated {
                affected,
                audio_length,
            } => write!(
                f,
                "{} caption entries truncated to audio length {:.2}s",
                affected, audio_length
            ),
            SkipReason::CaptionsUnavailable { message } => {
                write!(f, "captions unavailable ({}), using word-count estimates", message)
            }
            SkipReason::CaptionUnmapped { index } => {
                write!(f, "caption {} outside every narration window", index)
            }
            SkipReason::AssetMissing { asset_ref } => write!(f, "asset missing: {}", asset_ref),
            SkipReason::NoCandidateAsset { keyword, category } => write!(
                f,
                "keyword '{}' ({}): no unused candidate asset",
                keyword, category
            ),
            SkipReason::OutsideNarration { label, time } => {
                write!(f, "{} at {:.2}s is outside narration", label, time)
            }
            SkipReason::SfxUnmatched { cue } => write!(f, "no sound effect for cue '{}'", cue),
            SkipReason::LayerClamped {
                track,
                original_end,
                clamped_end,
            } => write!(
                f,
                "{} layer end {:.2}s clamped to {:.2}s",
                track, original_end, clamped_end
            ),
            SkipReason::LayerTrimmed {
                track,
                original_start,
                new_start,
            } => write!(
                f,
                "{} layer start {:.2}s trimmed to {:.2}s",
                track, original_start, new_start
            ),
            SkipReason::LayerDropped { track, start, end } => write!(
                f,
                "{} layer [{:.2}, {:.2}] dropped",
                track, start, end
            ),
        }
    }
}

/// A recorded [`SkipReason`] with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub stage: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.reason)
    }
}
