//! Script segment model.

use serde::{Deserialize, Serialize};

/// Type of script segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Regular spoken narration.
    Narration,
    /// Short punchy sentence right before a video break.
    AttentionCue,
    /// Inserted source clip.
    VideoBreak,
}

impl SegmentKind {
    /// Whether the segment is voiced by the narration track.
    pub fn is_spoken(&self) -> bool {
        matches!(self, SegmentKind::Narration | SegmentKind::AttentionCue)
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentKind::Narration => write!(f, "narration"),
            SegmentKind::AttentionCue => write!(f, "attention_cue"),
            SegmentKind::VideoBreak => write!(f, "video_break"),
        }
    }
}

/// One typed unit of the script.
///
/// Spoken segments carry `text`; video breaks carry `duration` (seconds) and
/// `break_type` (the clip tag to look up in the catalog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_type: Option<String>,
}

impl Segment {
    /// Create a narration segment.
    pub fn narration(order: usize, text: impl Into<String>) -> Self {
        Self::spoken(SegmentKind::Narration, order, text)
    }

    /// Create an attention-cue segment.
    pub fn attention_cue(order: usize, text: impl Into<String>) -> Self {
        Self::spoken(SegmentKind::AttentionCue, order, text)
    }

    /// Create a video-break segment.
    pub fn video_break(order: usize, duration: f64, break_type: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::VideoBreak,
            order,
            text: None,
            duration: Some(duration),
            break_type: Some(break_type.into()),
        }
    }

    fn spoken(kind: SegmentKind, order: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            order,
            text: Some(text.into()),
            duration: None,
            break_type: None,
        }
    }

    /// Text of a spoken segment (empty for video breaks).
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Number of whitespace-separated words in the text.
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }
}
