//! Intro screenshot and beat-synchronized images.

use super::{AssetPlanner, STAGE};
use crate::analysis::Beat;
use crate::models::{PanDirection, ScreenPosition, TransitionHint};
use crate::timeline::{Layer, LayerKind, SkipReason, Timeline, TrackKind};

/// Greedily select beats at least `min_spacing` apart, up to `limit`.
///
/// The first beat is always eligible.
pub fn select_beats(beats: &[Beat], min_spacing: f64, limit: usize) -> Vec<Beat> {
    let mut selected: Vec<Beat> = Vec::new();

    for beat in beats {
        if selected.len() >= limit {
            break;
        }
        let eligible = selected
            .last()
            .map_or(true, |last| beat.time - last.time >= min_spacing);
        if eligible {
            selected.push(*beat);
        }
    }
    selected
}

impl AssetPlanner<'_> {
    /// Place the post screenshot over the reserved intro window.
    pub(super) fn place_intro(&mut self, timeline: &mut Timeline) -> bool {
        let Some(post) = self.catalog.available_post_screenshot() else {
            return false;
        };
        let asset_ref = post.asset_ref();
        if !self.is_unused(&asset_ref) {
            return false;
        }

        let layer = Layer::new(
            TrackKind::OverlayImages,
            LayerKind::Screenshot,
            0.0,
            self.settings.intro_duration,
            "intro post screenshot",
        )
        .with_asset(asset_ref)
        .with_position(ScreenPosition::CenterTop);
        self.commit(timeline, Ok(layer))
    }

    /// Pair unused images with selected beats in catalog order.
    ///
    /// Returns the placed layers' start times for the whoosh pass.
    pub(super) fn place_beat_images(&mut self, timeline: &mut Timeline, beats: &[Beat]) -> Vec<f64> {
        let duration = self.strategy.image_duration;
        let images: Vec<String> = self
            .catalog
            .available_images()
            .map(|i| i.asset_ref())
            .filter(|r| self.is_unused(r))
            .collect();
        if images.is_empty() || beats.is_empty() || duration <= 0.0 {
            return Vec::new();
        }

        let spacing = self.settings.beat_spacing_factor * duration;
        let selected = select_beats(beats, spacing, images.len());

        let mut starts = Vec::new();
        let mut images = images.into_iter();
        for beat in selected {
            let attempt = self
                .time_map
                .map_point(beat.time)
                .ok_or_else(|| SkipReason::OutsideNarration {
                    label: "beat".to_string(),
                    time: beat.time,
                });
            let start = match attempt {
                Ok(start) => start,
                Err(reason) => {
                    timeline.record(STAGE, reason);
                    continue;
                }
            };
            let Some(asset_ref) = images.next() else {
                break;
            };

            let layer = Layer::new(
                TrackKind::OverlayImages,
                LayerKind::Image,
                start,
                start + duration,
                format!("beat at {:.2}s ({:?})", beat.time, beat.kind),
            )
            .with_asset(asset_ref)
            .with_position(ScreenPosition::Center)
            .with_transition(TransitionHint::Fade)
            .with_pan(PanDirection::alternating(starts.len()));
            if self.commit(timeline, Ok(layer)) {
                starts.push(start);
            }
        }
        starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BeatKind;
    use crate::config::PlacementSettings;
    use crate::models::{AssetCatalog, AssetKind, AssetRecord};
    use crate::placement::tests::{image, narrated_timeline};
    use crate::placement::PlacementInputs;
    use crate::strategy::StrategyConfig;

    fn beat(time: f64) -> Beat {
        Beat {
            time,
            kind: BeatKind::SentenceEnd,
            strength: 0.8,
        }
    }

    #[test]
    fn selection_respects_spacing_and_limit() {
        let beats = [beat(1.0), beat(2.0), beat(3.5), beat(4.0), beat(6.0)];
        let selected = select_beats(&beats, 2.4, 10);
        let times: Vec<f64> = selected.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![1.0, 3.5, 6.0]);

        assert_eq!(select_beats(&beats, 2.4, 2).len(), 2);
        assert!(select_beats(&[], 1.0, 3).is_empty());
    }

    #[test]
    fn intro_screenshot_takes_reserved_window() {
        let catalog = AssetCatalog {
            post_screenshot: Some(AssetRecord::new(AssetKind::PostScreenshot, "/run/post.png")),
            ..Default::default()
        };
        let strategy = StrategyConfig::default();
        let settings = PlacementSettings::default();
        let mut timeline = narrated_timeline(20.0);

        let summary =
            AssetPlanner::new(&catalog, &strategy, &settings).plan(&mut timeline, PlacementInputs::default());

        assert!(summary.intro);
        let intro = &timeline.track(TrackKind::OverlayImages)[0];
        assert_eq!(intro.timeline_start, 0.0);
        assert_eq!(intro.timeline_end, 5.0);
        assert_eq!(intro.z_index, 5);
        assert_eq!(intro.position, Some(ScreenPosition::CenterTop));
    }

    #[test]
    fn images_follow_beats_with_alternating_pan() {
        let catalog = AssetCatalog {
            images: vec![image("one.png"), image("two.png"), image("three.png")],
            ..Default::default()
        };
        let strategy = StrategyConfig {
            image_duration: 2.0,
            ..Default::default()
        };
        let settings = PlacementSettings {
            fill_gaps: false,
            ..Default::default()
        };
        let mut timeline = narrated_timeline(30.0);
        let beats = [beat(6.0), beat(6.5), beat(9.0), beat(12.0), beat(15.0)];

        let summary = AssetPlanner::new(&catalog, &strategy, &settings).plan(
            &mut timeline,
            PlacementInputs {
                beats: &beats,
                ..Default::default()
            },
        );

        assert_eq!(summary.beat_images, 3);
        let overlays = timeline.track(TrackKind::OverlayImages);
        let starts: Vec<f64> = overlays.iter().map(|l| l.timeline_start).collect();
        assert_eq!(starts, vec![6.0, 9.0, 12.0]);
        assert_eq!(overlays[0].pan, Some(PanDirection::LeftToRight));
        assert_eq!(overlays[1].pan, Some(PanDirection::RightToLeft));
        assert!(overlays.iter().all(|l| l.volume.is_none()));
        assert_eq!(overlays[0].asset_ref.as_deref(), Some("/run/images/one.png"));
    }

    #[test]
    fn beats_outside_narration_are_skipped() {
        let catalog = AssetCatalog {
            images: vec![image("one.png")],
            ..Default::default()
        };
        let strategy = StrategyConfig::default();
        let settings = PlacementSettings {
            fill_gaps: false,
            ..Default::default()
        };
        let mut timeline = narrated_timeline(10.0);
        let beats = [beat(40.0)];

        let summary = AssetPlanner::new(&catalog, &strategy, &settings).plan(
            &mut timeline,
            PlacementInputs {
                beats: &beats,
                ..Default::default()
            },
        );

        assert_eq!(summary.beat_images, 0);
        assert!(timeline.has_trace(|r| matches!(r, SkipReason::OutsideNarration { .. })));
    }
}
