//! Break-marker aware script segmenter.
//!
//! # Marker format
//!
//! ```text
//! [VIDEO_BREAK: duration=10s, clip=action]
//! [VIDEO_BREAK: duration=10-15s, type=reaction]
//! ```
//!
//! The duration may be a single value or a range (midpoint is used); the tag
//! key may be `clip` or `type`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Segment, SegmentKind};

static BREAK_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[VIDEO_BREAK:\s*duration=(\d+(?:\.\d+)?(?:-\d+(?:\.\d+)?)?)s?,\s*(?:clip|type)=([\w-]+)\s*\]")
        .expect("break marker pattern is valid")
});

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]*[.!?]+\s*").expect("sentence pattern is valid"));

/// Result of segmenting a script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedScript {
    /// Whether any break marker was found.
    pub has_breaks: bool,
    /// Segments in order (`order` is a dense 0-based index).
    pub segments: Vec<Segment>,
}

impl ParsedScript {
    /// Spoken segments (narration and attention cues), for speech synthesis.
    pub fn narration_parts(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.kind.is_spoken())
    }

    /// Break tags requested by the script, in order of appearance.
    pub fn break_types(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| s.break_type.as_deref())
            .collect()
    }

    /// Spoken text with markers removed.
    pub fn spoken_text(&self) -> String {
        self.narration_parts()
            .map(|s| s.text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse a script into ordered segments.
///
/// Without markers the whole (trimmed) text becomes one narration segment.
/// With markers, the text before each marker is split into sentences; when
/// there is more than one and the last one ends in terminal punctuation, that
/// last sentence becomes an attention cue. Empty text between markers emits
/// nothing.
pub fn parse_script(script: &str) -> ParsedScript {
    let markers: Vec<_> = BREAK_MARKER.captures_iter(script).collect();

    if markers.is_empty() {
        let text = script.trim();
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::narration(0, text)]
        };
        return ParsedScript {
            has_breaks: false,
            segments,
        };
    }

    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in &markers {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_spoken(&mut segments, &script[last_end..whole.start()]);

        let duration = parse_break_duration(&caps[1]).unwrap_or(0.0);
        let order = segments.len();
        segments.push(Segment::video_break(order, duration, &caps[2]));

        last_end = whole.end();
    }

    let tail = script[last_end..].trim();
    if !tail.is_empty() {
        let order = segments.len();
        segments.push(Segment::narration(order, tail));
    }

    tracing::debug!(
        "Segmented script into {} segments ({} breaks)",
        segments.len(),
        markers.len()
    );

    ParsedScript {
        has_breaks: true,
        segments,
    }
}

/// Push the narration (and optional attention cue) preceding a marker.
fn push_spoken(segments: &mut Vec<Segment>, raw: &str) {
    let text = raw.trim();
    if text.is_empty() {
        return;
    }

    let sentences = split_sentences(text);
    let last_is_terminal = sentences
        .last()
        .is_some_and(|s| s.ends_with(|c: char| matches!(c, '.' | '!' | '?')));

    if sentences.len() > 1 && last_is_terminal {
        let cue = sentences[sentences.len() - 1].clone();
        let main = sentences[..sentences.len() - 1].join(" ");

        if !main.is_empty() {
            let order = segments.len();
            segments.push(Segment::narration(order, main));
        }
        let order = segments.len();
        segments.push(Segment::attention_cue(order, cue));
    } else {
        let order = segments.len();
        segments.push(Segment::narration(order, text));
    }
}

/// Split text into trimmed sentences.
///
/// A sentence runs up to and including a run of `.`, `!` or `?`. A trailing
/// fragment without terminal punctuation is kept as its own sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut consumed = 0;

    for m in SENTENCE.find_iter(text) {
        let sentence = m.as_str().trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        consumed = m.end();
    }

    let rest = text[consumed..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

/// Parse a marker duration (`"10"`, `"10s"`, `"10-15"`, `"10-15s"`).
///
/// Ranges resolve to their midpoint.
pub fn parse_break_duration(raw: &str) -> Option<f64> {
    let raw = raw.trim().trim_end_matches('s');
    match raw.split_once('-') {
        Some((lo, hi)) => {
            let lo: f64 = lo.trim().parse().ok()?;
            let hi: f64 = hi.trim().parse().ok()?;
            Some((lo + hi) / 2.0)
        }
        None => raw.parse().ok(),
    }
}

/// Check a segment for the fields the timeline builder relies on.
pub(crate) fn check_well_formed(segment: &Segment) -> Result<(), &'static str> {
    match segment.kind {
        SegmentKind::Narration | SegmentKind::AttentionCue => {
            if segment.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
                return Err("spoken segment without text");
            }
        }
        SegmentKind::VideoBreak => {
            if segment.duration.is_none() {
                return Err("video break without duration");
            }
            if segment.break_type.as_deref().map_or(true, str::is_empty) {
                return Err("video break without break type");
            }
        }
    }
    Ok(())
}
