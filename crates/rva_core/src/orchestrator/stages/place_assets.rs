//! Overlay and sound-effect placement stage.

use crate::orchestrator::errors::{StageError, StageResult};
use crate::orchestrator::stage::TimelineStage;
use crate::orchestrator::types::{RunState, StageContext, StageOutcome};
use crate::placement::{AssetPlanner, PlacementInputs};
use crate::timeline::TrackKind;

/// Runs the [`AssetPlanner`] over the built timeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceAssets;

impl PlaceAssets {
    pub fn new() -> Self {
        Self
    }
}

impl TimelineStage for PlaceAssets {
    fn name(&self) -> &str {
        "PlaceAssets"
    }

    fn description(&self) -> &str {
        "Place overlays and sound effects"
    }

    fn validate_input(&self, _ctx: &StageContext<'_>, _state: &RunState) -> StageResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &StageContext<'_>, state: &mut RunState) -> StageResult<StageOutcome> {
        // Every placement pass is anchored to narration windows.
        if state.timeline.track(TrackKind::NarrationAudio).is_empty() {
            return Ok(StageOutcome::Skipped("no narration windows".to_string()));
        }

        let placement = &ctx.settings.placement;
        if !(placement.beat_sync
            || placement.keyword_triggers
            || placement.fill_gaps
            || placement.sound_effects)
            && ctx.catalog.available_post_screenshot().is_none()
        {
            return Ok(StageOutcome::Skipped(
                "all placement passes disabled".to_string(),
            ));
        }

        let inputs = PlacementInputs {
            beats: ctx.beats,
            keyword_matches: ctx.keyword_matches,
            words: ctx.words,
        };
        let summary =
            AssetPlanner::new(ctx.catalog, ctx.strategy, placement).plan(&mut state.timeline, inputs);

        ctx.logger.info(&format!(
            "Placed {} layers (intro: {}, beat images: {}, keyword overlays: {}, gap fills: {}, sfx: {})",
            summary.total(),
            if summary.intro { "yes" } else { "no" },
            summary.beat_images,
            summary.keyword_overlays,
            summary.gap_fills,
            summary.sound_effects
        ));
        for layer in state
            .timeline
            .track(TrackKind::OverlayImages)
            .iter()
            .chain(state.timeline.track(TrackKind::Sfx))
        {
            ctx.logger.detail(&format!(
                "{} [{:.2}, {:.2}] {}",
                layer.track, layer.timeline_start, layer.timeline_end, layer.reason
            ));
        }

        state.placement = Some(summary);
        Ok(StageOutcome::Success)
    }

    fn validate_output(&self, _ctx: &StageContext<'_>, state: &RunState) -> StageResult<()> {
        match state
            .timeline
            .layers()
            .find(|l| l.timeline_end <= l.timeline_start)
        {
            Some(layer) => Err(StageError::invalid_output(format!(
                "empty {} layer at {:.2}s ({})",
                layer.track, layer.timeline_start, layer.reason
            ))),
            None => Ok(()),
        }
    }
}
