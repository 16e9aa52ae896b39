//! Mapping from narration-audio time to output-timeline time.

use serde::{Deserialize, Serialize};

use super::types::{Timeline, TrackKind};

/// One narration layer's span in both time domains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrationWindow {
    pub audio_start: f64,
    pub audio_end: f64,
    pub timeline_start: f64,
    pub timeline_end: f64,
    pub tempo: f64,
}

impl NarrationWindow {
    fn project(&self, audio_time: f64) -> f64 {
        self.timeline_start + (audio_time - self.audio_start) / self.tempo
    }
}

/// Piecewise-linear map built from the narration layers of a timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTimeMap {
    windows: Vec<NarrationWindow>,
}

impl SourceTimeMap {
    pub fn new(windows: Vec<NarrationWindow>) -> Self {
        Self { windows }
    }

    /// Windows of every `narration_audio` layer, in track order.
    pub fn from_timeline(timeline: &Timeline) -> Self {
        let windows = timeline
            .track(TrackKind::NarrationAudio)
            .iter()
            .map(|layer| NarrationWindow {
                audio_start: layer.source_start,
                audio_end: layer.source_end,
                timeline_start: layer.timeline_start,
                timeline_end: layer.timeline_end,
                tempo: layer.speed.filter(|s| *s > 0.0).unwrap_or(1.0),
            })
            .collect();
        Self { windows }
    }

    pub fn windows(&self) -> &[NarrationWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Map a caption span.
    ///
    /// The window is chosen by `audio_start <= start < audio_end`; the end is
    /// clamped to that window before mapping. `None` if no window contains
    /// `start`.
    pub fn map_span(&self, start: f64, end: f64) -> Option<(f64, f64)> {
        let window = self
            .windows
            .iter()
            .find(|w| w.audio_start <= start && start < w.audio_end)?;
        Some((window.project(start), window.project(end.min(window.audio_end))))
    }

    /// Map a single audio-time point (beat, keyword).
    ///
    /// Window ends are inclusive so a beat at the end of a sentence maps to
    /// the end of its narration layer. An empty map is the identity.
    pub fn map_point(&self, audio_time: f64) -> Option<f64> {
        if self.windows.is_empty() {
            return Some(audio_time);
        }
        self.windows
            .iter()
            .find(|w| w.audio_start <= audio_time && audio_time <= w.audio_end)
            .map(|w| w.project(audio_time))
    }
}
