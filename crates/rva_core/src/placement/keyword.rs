//! Keyword-triggered overlays.

use super::AssetPlanner;
use crate::analysis::{select_transition, AssetCategory, KeywordMatch};
use crate::models::{AssetRecord, ScreenPosition};
use crate::timeline::{Layer, LayerKind, SkipReason, Timeline, TrackKind};

/// Track and layer kind an asset of `category` is placed as.
fn placement_for(category: AssetCategory) -> (TrackKind, LayerKind) {
    match category {
        AssetCategory::ActionClip => (TrackKind::ClipVideo, LayerKind::ClipVideo),
        AssetCategory::CommentScreenshot => (TrackKind::OverlayImages, LayerKind::Screenshot),
        _ => (TrackKind::OverlayImages, LayerKind::Image),
    }
}

impl AssetPlanner<'_> {
    /// First unused, available asset serving `category`.
    fn candidate(&self, category: AssetCategory) -> Option<&AssetRecord> {
        let unused = |a: &&AssetRecord| a.available && self.is_unused(&a.asset_ref());
        match category {
            AssetCategory::ActionClip => self.catalog.clips.iter().find(unused),
            AssetCategory::CommentScreenshot => {
                self.catalog.comment_screenshots.iter().find(unused)
            }
            _ => {
                let hints = category.image_name_hints().unwrap_or_default();
                self.catalog
                    .images
                    .iter()
                    .filter(unused)
                    .find(|img| hints.is_empty() || img.name_contains_any(hints))
            }
        }
    }

    /// Build the overlay for one keyword match.
    fn keyword_layer(&self, m: &KeywordMatch) -> Result<Layer, SkipReason> {
        let spoken_at = self
            .time_map
            .map_point(m.time)
            .ok_or_else(|| SkipReason::OutsideNarration {
                label: format!("keyword '{}'", m.keyword),
                time: m.time,
            })?;
        let asset = self
            .candidate(m.category)
            .ok_or_else(|| SkipReason::NoCandidateAsset {
                keyword: m.keyword.clone(),
                category: m.category,
            })?;

        let start = (spoken_at - self.settings.keyword_lead).max(self.settings.intro_duration);
        let mut display = self.settings.keyword_display;
        if m.category == AssetCategory::ActionClip {
            if let Some(clip_len) = asset.duration.filter(|d| *d > 0.0) {
                display = display.min(clip_len);
            }
        }

        let (track, kind) = placement_for(m.category);
        Ok(Layer::new(
            track,
            kind,
            start,
            start + display,
            format!("keyword '{}' ({})", m.keyword, m.category),
        )
        .with_asset(asset.asset_ref())
        .with_position(ScreenPosition::Center)
        .with_transition(select_transition(&m.keyword)))
    }

    /// Place one overlay per keyword match, in word order.
    pub(super) fn place_keyword_overlays(
        &mut self,
        timeline: &mut Timeline,
        matches: &[KeywordMatch],
    ) -> usize {
        let mut placed = 0;
        for m in matches {
            let attempt = self.keyword_layer(m);
            if self.commit(timeline, attempt) {
                placed += 1;
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementSettings;
    use crate::models::{AssetCatalog, AssetKind, TransitionHint};
    use crate::placement::tests::{image, narrated_timeline};
    use crate::placement::PlacementInputs;
    use crate::strategy::StrategyConfig;

    fn keyword(word: &str, category: AssetCategory, time: f64) -> KeywordMatch {
        KeywordMatch {
            keyword: word.to_string(),
            category,
            time,
            end: time + 0.3,
        }
    }

    fn run(catalog: &AssetCatalog, matches: &[KeywordMatch]) -> Timeline {
        let strategy = StrategyConfig::default();
        let settings = PlacementSettings {
            fill_gaps: false,
            ..Default::default()
        };
        let mut timeline = narrated_timeline(30.0);
        AssetPlanner::new(catalog, &strategy, &settings).plan(
            &mut timeline,
            PlacementInputs {
                keyword_matches: matches,
                ..Default::default()
            },
        );
        timeline
    }

    #[test]
    fn surprise_keyword_spins_in_after_lead() {
        let catalog = AssetCatalog {
            images: vec![image("calm.png"), image("shock_face.png")],
            ..Default::default()
        };
        let timeline = run(&catalog, &[keyword("gila", AssetCategory::ReactionImage, 12.3)]);

        let overlay = &timeline.track(TrackKind::OverlayImages)[0];
        assert!((overlay.timeline_start - 11.8).abs() < 1e-9);
        assert!((overlay.timeline_end - 15.8).abs() < 1e-9);
        assert_eq!(overlay.transition, Some(TransitionHint::Spin));
        assert_eq!(overlay.asset_ref.as_deref(), Some("/run/images/shock_face.png"));
    }

    #[test]
    fn never_placed_inside_intro() {
        let catalog = AssetCatalog {
            images: vec![image("physics.png")],
            ..Default::default()
        };
        let timeline = run(&catalog, &[keyword("fisika", AssetCategory::TechnicalImage, 2.0)]);
        let overlay = &timeline.track(TrackKind::OverlayImages)[0];
        assert_eq!(overlay.timeline_start, 5.0);
        assert_eq!(overlay.transition, Some(TransitionHint::ZoomIn));
    }

    #[test]
    fn each_asset_is_used_once() {
        let catalog = AssetCatalog {
            images: vec![image("katana_sword.png")],
            ..Default::default()
        };
        let timeline = run(
            &catalog,
            &[
                keyword("pedang", AssetCategory::SwordVisual, 8.0),
                keyword("katana", AssetCategory::SwordVisual, 16.0),
            ],
        );
        assert_eq!(timeline.track(TrackKind::OverlayImages).len(), 1);
        assert!(timeline.has_trace(|r| matches!(
            r,
            SkipReason::NoCandidateAsset { keyword, .. } if keyword == "katana"
        )));
    }

    #[test]
    fn action_keyword_places_unused_clip() {
        let catalog = AssetCatalog {
            clips: vec![AssetRecord::new(AssetKind::Clip, "/run/clips/slice.mp4")
                .with_tag("slice")
                .with_duration(2.5)],
            ..Default::default()
        };
        let timeline = run(&catalog, &[keyword("potong", AssetCategory::ActionClip, 10.0)]);
        let clip = &timeline.track(TrackKind::ClipVideo)[0];
        assert!((clip.duration() - 2.5).abs() < 1e-9);
        assert_eq!(clip.transition, Some(TransitionHint::Shake));
        assert_eq!(clip.z_index, 10);
    }

    #[test]
    fn comment_keyword_uses_comment_screenshot() {
        let catalog = AssetCatalog {
            comment_screenshots: vec![AssetRecord::new(
                AssetKind::CommentScreenshot,
                "/run/comment_1.png",
            )],
            ..Default::default()
        };
        let timeline = run(
            &catalog,
            &[keyword("netizen", AssetCategory::CommentScreenshot, 9.0)],
        );
        let shot = &timeline.track(TrackKind::OverlayImages)[0];
        assert_eq!(shot.kind, LayerKind::Screenshot);
        assert_eq!(shot.transition, Some(TransitionHint::Popup));
    }
}
