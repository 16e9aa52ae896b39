//! Timeline data types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ducking::DuckingEnvelope;
use super::trace::{SkipReason, TraceEntry};
use crate::captions::CaptionEntry;
use crate::models::{PanDirection, ScreenPosition, TransitionHint};

/// Semantic channel a layer lives on.
///
/// Declaration order is the serialization order of `Timeline::tracks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    NarrationAudio,
    ClipAudio,
    Sfx,
    BackgroundVideo,
    ClipVideo,
    OverlayImages,
    Captions,
}

impl TrackKind {
    pub const ALL: [TrackKind; 7] = [
        TrackKind::NarrationAudio,
        TrackKind::ClipAudio,
        TrackKind::Sfx,
        TrackKind::BackgroundVideo,
        TrackKind::ClipVideo,
        TrackKind::OverlayImages,
        TrackKind::Captions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::NarrationAudio => "narration_audio",
            TrackKind::ClipAudio => "clip_audio",
            TrackKind::Sfx => "sfx",
            TrackKind::BackgroundVideo => "background_video",
            TrackKind::ClipVideo => "clip_video",
            TrackKind::OverlayImages => "overlay_images",
            TrackKind::Captions => "captions",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            TrackKind::NarrationAudio | TrackKind::ClipAudio | TrackKind::Sfx
        )
    }

    /// Visual tracks whose layers must never overlap each other.
    pub fn is_exclusive(&self) -> bool {
        matches!(
            self,
            TrackKind::BackgroundVideo | TrackKind::ClipVideo | TrackKind::OverlayImages
        )
    }

    /// Fixed compositing priority; `None` for audio tracks.
    pub fn render_priority(&self) -> Option<i32> {
        match self {
            TrackKind::BackgroundVideo => Some(0),
            TrackKind::OverlayImages => Some(5),
            TrackKind::ClipVideo => Some(10),
            TrackKind::Captions => Some(100),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a layer shows or plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    NarrationAudio,
    ClipAudio,
    SoundEffect,
    BackgroundVideo,
    ClipVideo,
    Image,
    Screenshot,
    Caption,
}

/// One placed element on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub track: TrackKind,
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_ref: Option<String>,
    /// Caption text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub timeline_start: f64,
    pub timeline_end: f64,
    pub source_start: f64,
    pub source_end: f64,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ScreenPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<PanDirection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
    #[serde(default, rename = "loop", skip_serializing_if = "std::ops::Not::not")]
    pub looped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ducking: Option<DuckingEnvelope>,
    /// Order of the script segment that produced this layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<usize>,
    pub reason: String,
}

impl Layer {
    /// Create a layer spanning `[start, end)` with source time `[0, end - start)`.
    pub fn new(
        track: TrackKind,
        kind: LayerKind,
        start: f64,
        end: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            track,
            kind,
            asset_ref: None,
            text: None,
            timeline_start: start,
            timeline_end: end,
            source_start: 0.0,
            source_end: end - start,
            z_index: track.render_priority().unwrap_or(0),
            volume: None,
            speed: None,
            position: None,
            transition: None,
            pan: None,
            effects: Vec::new(),
            looped: false,
            ducking: None,
            segment: None,
            reason: reason.into(),
        }
    }

    pub fn with_asset(mut self, asset_ref: impl Into<String>) -> Self {
        self.asset_ref = Some(asset_ref.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_source(mut self, start: f64, end: f64) -> Self {
        self.source_start = start;
        self.source_end = end;
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_position(mut self, position: ScreenPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_transition(mut self, transition: TransitionHint) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn with_pan(mut self, pan: PanDirection) -> Self {
        self.pan = Some(pan);
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effects.push(effect.into());
        self
    }

    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn with_ducking(mut self, envelope: DuckingEnvelope) -> Self {
        self.ducking = Some(envelope);
        self
    }

    pub fn with_segment(mut self, order: usize) -> Self {
        self.segment = Some(order);
        self
    }

    pub fn duration(&self) -> f64 {
        self.timeline_end - self.timeline_start
    }

    /// Strict interval overlap.
    pub fn overlaps(&self, other: &Layer) -> bool {
        self.timeline_start < other.timeline_end && other.timeline_start < self.timeline_end
    }

    /// Move the start later by `delta`, advancing source time to match.
    pub(crate) fn trim_start(&mut self, new_start: f64) {
        let delta = new_start - self.timeline_start;
        self.timeline_start = new_start;
        self.source_start += delta * self.speed.unwrap_or(1.0);
    }

    /// Move the end earlier, shortening source time to match.
    pub(crate) fn trim_end(&mut self, new_end: f64) {
        let delta = self.timeline_end - new_end;
        self.timeline_end = new_end;
        self.source_end -= delta * self.speed.unwrap_or(1.0);
    }
}

/// Kind of cut between a narration segment and an inserted clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Crossfade,
    Cut,
}

/// Transition from a narration segment into a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    pub from_segment: Option<usize>,
    pub to_segment: Option<usize>,
    pub timeline_start: f64,
    pub duration: f64,
}

/// Summary numbers for debugging output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineMetadata {
    pub strategy: String,
    pub segment_count: usize,
    pub beat_count: usize,
    pub layer_count: usize,
    /// Real length of the narration audio source, in seconds.
    pub narration_duration: f64,
}

/// Fully resolved multi-track plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub total_duration: f64,
    pub tracks: BTreeMap<TrackKind, Vec<Layer>>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Recoverable conditions met while building, in order.
    #[serde(default)]
    pub trace: Vec<TraceEntry>,
    #[serde(default)]
    pub metadata: TimelineMetadata,
}

impl Timeline {
    /// Empty timeline with every track present.
    pub fn new() -> Self {
        Self {
            tracks: TrackKind::ALL.iter().map(|k| (*k, Vec::new())).collect(),
            ..Default::default()
        }
    }

    pub fn track(&self, kind: TrackKind) -> &[Layer] {
        self.tracks.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn track_mut(&mut self, kind: TrackKind) -> &mut Vec<Layer> {
        self.tracks.entry(kind).or_default()
    }

    /// Add a layer to its track.
    pub fn push(&mut self, layer: Layer) {
        self.track_mut(layer.track).push(layer);
    }

    /// All layers, track by track.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.tracks.values().flatten()
    }

    pub fn layer_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }

    /// Record a recoverable condition and mirror it to the log.
    pub fn record(&mut self, stage: &str, reason: SkipReason) {
        tracing::warn!("[{}] {}", stage, reason);
        self.trace.push(TraceEntry {
            stage: stage.to_string(),
            reason,
        });
    }

    /// Whether any trace entry satisfies `predicate`.
    pub fn has_trace(&self, predicate: impl Fn(&SkipReason) -> bool) -> bool {
        self.trace.iter().any(|entry| predicate(&entry.reason))
    }

    /// Caption layers as entries in output-timeline time, for SRT export.
    pub fn caption_entries(&self) -> Vec<CaptionEntry> {
        self.track(TrackKind::Captions)
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                CaptionEntry::new(
                    i + 1,
                    layer.timeline_start,
                    layer.timeline_end,
                    layer.text.clone().unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Refresh `metadata.layer_count`.
    pub fn refresh_layer_count(&mut self) {
        self.metadata.layer_count = self.layer_count();
    }
}
