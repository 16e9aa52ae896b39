//! Clamp and trim pass over a placed timeline.

use thiserror::Error;

use crate::config::ValidationSettings;
use crate::timeline::{Layer, SkipReason, Timeline, TrackKind};

/// Trace stage name for entries recorded by the validator.
pub const STAGE: &str = "validate";

/// Float tolerance for start/end comparisons.
const EPS: f64 = 1e-9;

/// Two layers on an exclusive track still overlap.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{track} layers overlap: [{first_start:.3}, {first_end:.3}] and [{second_start:.3}, {second_end:.3}]")]
pub struct OverlapError {
    pub track: TrackKind,
    pub first_start: f64,
    pub first_end: f64,
    pub second_start: f64,
    pub second_end: f64,
}

/// What one validation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub clamped: usize,
    pub trimmed: usize,
    pub dropped: usize,
}

impl ValidationReport {
    /// Whether the pass left the timeline untouched.
    pub fn is_clean(&self) -> bool {
        self.clamped == 0 && self.trimmed == 0 && self.dropped == 0
    }
}

/// Enforces the timeline's span and non-overlap invariants.
///
/// 1. Every layer is clamped to `[0, total_duration]`; layers left empty
///    are dropped.
/// 2. Each exclusive visual track is sorted by start and walked pairwise;
///    a layer starting before its predecessor ends is trimmed to start
///    there, and dropped if the rest is shorter than `min_layer_duration`.
///
/// Running it twice changes nothing the second time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineValidator {
    min_layer_duration: f64,
}

impl Default for TimelineValidator {
    fn default() -> Self {
        Self::new(&ValidationSettings::default())
    }
}

impl TimelineValidator {
    pub fn new(settings: &ValidationSettings) -> Self {
        Self {
            min_layer_duration: settings.min_layer_duration.max(0.0),
        }
    }

    pub fn validate(&self, timeline: &mut Timeline) -> ValidationReport {
        let mut report = ValidationReport::default();

        for track in TrackKind::ALL {
            self.clamp_track(timeline, track, &mut report);
        }
        for track in TrackKind::ALL.into_iter().filter(TrackKind::is_exclusive) {
            self.trim_track(timeline, track, &mut report);
        }

        timeline.refresh_layer_count();
        if !report.is_clean() {
            tracing::debug!(
                "Validation: {} clamped, {} trimmed, {} dropped",
                report.clamped,
                report.trimmed,
                report.dropped
            );
        }
        report
    }

    fn clamp_track(&self, timeline: &mut Timeline, track: TrackKind, report: &mut ValidationReport) {
        let total = timeline.total_duration;
        let layers = std::mem::take(timeline.track_mut(track));
        let mut kept = Vec::with_capacity(layers.len());

        for mut layer in layers {
            if layer.timeline_start < 0.0 {
                layer.trim_start(0.0);
            }
            if layer.timeline_end > total + EPS {
                let original_end = layer.timeline_end;
                if total - layer.timeline_start <= EPS {
                    timeline.record(STAGE, dropped(&layer));
                    report.dropped += 1;
                    continue;
                }
                clamp_end(&mut layer, total);
                timeline.record(
                    STAGE,
                    SkipReason::LayerClamped {
                        track,
                        original_end,
                        clamped_end: total,
                    },
                );
                report.clamped += 1;
            }
            kept.push(layer);
        }
        *timeline.track_mut(track) = kept;
    }

    fn trim_track(&self, timeline: &mut Timeline, track: TrackKind, report: &mut ValidationReport) {
        let mut layers = std::mem::take(timeline.track_mut(track));
        layers.sort_by(|a, b| a.timeline_start.total_cmp(&b.timeline_start));

        let mut kept: Vec<Layer> = Vec::with_capacity(layers.len());
        for mut layer in layers {
            let previous_end = kept.last().map(|l| l.timeline_end);
            match previous_end {
                Some(previous_end) if layer.timeline_start < previous_end - EPS => {
                    if layer.timeline_end - previous_end < self.min_layer_duration {
                        timeline.record(STAGE, dropped(&layer));
                        report.dropped += 1;
                        continue;
                    }
                    let original_start = layer.timeline_start;
                    layer.trim_start(previous_end);
                    timeline.record(
                        STAGE,
                        SkipReason::LayerTrimmed {
                            track,
                            original_start,
                            new_start: previous_end,
                        },
                    );
                    report.trimmed += 1;
                    kept.push(layer);
                }
                _ => kept.push(layer),
            }
        }
        *timeline.track_mut(track) = kept;
    }
}

fn dropped(layer: &Layer) -> SkipReason {
    SkipReason::LayerDropped {
        track: layer.track,
        start: layer.timeline_start,
        end: layer.timeline_end,
    }
}

/// Shorten a layer to end at `end`, pulling its ducking window in with it.
fn clamp_end(layer: &mut Layer, end: f64) {
    layer.trim_end(end);
    if let Some(envelope) = layer.ducking.as_mut() {
        envelope.end = envelope.end.min(end);
        envelope.start = envelope.start.min(envelope.end);
    }
}

/// Verify no two layers on an exclusive track overlap.
pub fn check_non_overlap(timeline: &Timeline) -> Result<(), OverlapError> {
    for track in TrackKind::ALL.into_iter().filter(TrackKind::is_exclusive) {
        let mut layers: Vec<&Layer> = timeline.track(track).iter().collect();
        layers.sort_by(|a, b| a.timeline_start.total_cmp(&b.timeline_start));

        for pair in layers.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.timeline_start < a.timeline_end - EPS {
                return Err(OverlapError {
                    track,
                    first_start: a.timeline_start,
                    first_end: a.timeline_end,
                    second_start: b.timeline_start,
                    second_end: b.timeline_end,
                });
            }
        }
    }
    Ok(())
}
