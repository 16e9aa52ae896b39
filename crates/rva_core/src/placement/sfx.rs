//! Sound-effect placement.

use super::{AssetPlanner, STAGE};
use crate::analysis::sfx_cue_for;
use crate::captions::Word;
use crate::models::AssetRecord;
use crate::timeline::{Layer, LayerKind, SkipReason, Timeline, TrackKind};

/// Length used when a sound effect's duration is unknown.
const DEFAULT_SFX_LENGTH: f64 = 1.0;

/// Sound-effect file-name fragment placed on beat images.
const WHOOSH: &str = "whoosh";

/// Reason recorded on the sfx at each inserted clip.
pub const VIDEO_BREAK_START: &str = "video_break_start";

fn sfx_layer(sfx: &AssetRecord, start: f64, volume: f64, reason: impl Into<String>) -> Layer {
    let length = sfx.duration.filter(|d| *d > 0.0).unwrap_or(DEFAULT_SFX_LENGTH);
    Layer::new(TrackKind::Sfx, LayerKind::SoundEffect, start, start + length, reason)
        .with_asset(sfx.asset_ref())
        .with_volume(volume)
}

impl AssetPlanner<'_> {
    /// Place clip-start, whoosh and keyword-cue sound effects.
    pub(super) fn place_sound_effects(
        &mut self,
        timeline: &mut Timeline,
        beat_image_starts: &[f64],
        words: &[Word],
    ) -> usize {
        let catalog = self.catalog;
        let mut placed = 0;

        if let Some(sfx) = catalog.first_sound_effect() {
            let clip_starts: Vec<f64> = timeline
                .track(TrackKind::ClipVideo)
                .iter()
                .filter(|clip| clip.segment.is_some())
                .map(|clip| clip.timeline_start)
                .collect();
            for start in clip_starts {
                let layer = sfx_layer(sfx, start, self.settings.sfx_volume, VIDEO_BREAK_START);
                placed += usize::from(self.commit(timeline, Ok(layer)));
            }
        }

        if let Some(whoosh) = catalog.find_sound_effect(WHOOSH) {
            for &start in beat_image_starts {
                let layer = sfx_layer(whoosh, start, self.settings.whoosh_volume, "beat image whoosh");
                placed += usize::from(self.commit(timeline, Ok(layer)));
            }
        }

        for word in words {
            let Some(cue) = sfx_cue_for(&word.text) else {
                continue;
            };
            let attempt = catalog
                .find_sound_effect(cue.as_str())
                .ok_or_else(|| SkipReason::SfxUnmatched {
                    cue: cue.as_str().to_string(),
                })
                .and_then(|sfx| {
                    let start = self.time_map.map_point(word.start).ok_or_else(|| {
                        SkipReason::OutsideNarration {
                            label: format!("sfx cue '{}'", word.text),
                            time: word.start,
                        }
                    })?;
                    Ok(sfx_layer(
                        sfx,
                        start,
                        self.settings.sfx_volume,
                        format!("{} cue on '{}'", cue.as_str(), word.text),
                    ))
                });
            placed += usize::from(self.commit(timeline, attempt));
        }

        if placed > 0 {
            tracing::debug!("[{}] placed {} sound effects", STAGE, placed);
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementSettings;
    use crate::models::{AssetCatalog, AssetKind};
    use crate::placement::tests::narrated_timeline;
    use crate::placement::PlacementInputs;
    use crate::strategy::StrategyConfig;

    fn sfx(name: &str) -> AssetRecord {
        AssetRecord::new(AssetKind::SoundEffect, format!("/run/sfx/{}", name)).with_duration(0.8)
    }

    fn word(text: &str, start: f64) -> Word {
        Word {
            text: text.to_string(),
            start,
            end: start + 0.3,
        }
    }

    #[test]
    fn clip_starts_get_first_sfx() {
        let catalog = AssetCatalog {
            sound_effects: vec![sfx("boom.wav"), sfx("whoosh.wav")],
            ..Default::default()
        };
        let strategy = StrategyConfig::default();
        let settings = PlacementSettings::default();
        let mut timeline = narrated_timeline(20.0);
        timeline.push(
            Layer::new(TrackKind::ClipVideo, LayerKind::ClipVideo, 6.0, 12.0, "clip")
                .with_asset("/run/clips/a.mp4")
                .with_segment(1),
        );

        AssetPlanner::new(&catalog, &strategy, &settings).plan(&mut timeline, PlacementInputs::default());

        let sfx = timeline.track(TrackKind::Sfx);
        assert_eq!(sfx.len(), 1);
        assert_eq!(sfx[0].timeline_start, 6.0);
        assert_eq!(sfx[0].volume, Some(0.7));
        assert_eq!(sfx[0].reason, VIDEO_BREAK_START);
        assert_eq!(sfx[0].asset_ref.as_deref(), Some("/run/sfx/boom.wav"));
    }

    #[test]
    fn keyword_cues_match_by_file_name() {
        let catalog = AssetCatalog {
            sound_effects: vec![sfx("impact_hit.wav")],
            ..Default::default()
        };
        let strategy = StrategyConfig::default();
        let settings = PlacementSettings::default();
        let mut timeline = narrated_timeline(20.0);
        let words = [word("Wow!", 7.0), word("lucu", 9.0), word("biasa", 10.0)];

        AssetPlanner::new(&catalog, &strategy, &settings).plan(
            &mut timeline,
            PlacementInputs {
                words: &words,
                ..Default::default()
            },
        );

        let sfx = timeline.track(TrackKind::Sfx);
        assert_eq!(sfx.len(), 1);
        assert_eq!(sfx[0].timeline_start, 7.0);
        assert!(timeline.has_trace(|r| matches!(
            r,
            SkipReason::SfxUnmatched { cue } if cue == "funny"
        )));
    }
}
