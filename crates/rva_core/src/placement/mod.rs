//! Asset placement planner.
//!
//! Runs on a built timeline and adds overlays and sound effects in a fixed
//! order:
//!
//! 1. intro post screenshot at `[0, intro_duration]`
//! 2. beat-synchronized images
//! 3. keyword-triggered overlays
//! 4. gap fillers from the remaining images
//! 5. sound effects (clip starts, beat whooshes, keyword cues)
//!
//! Every visual asset is used at most once across the whole plan; clips
//! already placed by the builder count as used. Beat and keyword times are
//! narration-audio times and are mapped onto the output timeline first.

mod beat_sync;
mod gaps;
mod keyword;
mod sfx;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::{Beat, KeywordMatch};
use crate::captions::Word;
use crate::config::PlacementSettings;
use crate::models::AssetCatalog;
use crate::strategy::StrategyConfig;
use crate::timeline::{Layer, SkipReason, SourceTimeMap, Timeline, TrackKind};

pub use beat_sync::select_beats;
pub use gaps::find_gaps;

/// Trace stage name for entries recorded by the planner.
pub const STAGE: &str = "place";

/// Analysis results the planner consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementInputs<'a> {
    pub beats: &'a [Beat],
    pub keyword_matches: &'a [KeywordMatch],
    pub words: &'a [Word],
}

/// Counts of what each pass placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub intro: bool,
    pub beat_images: usize,
    pub keyword_overlays: usize,
    pub gap_fills: usize,
    pub sound_effects: usize,
}

impl PlacementSummary {
    /// Total number of layers added.
    pub fn total(&self) -> usize {
        usize::from(self.intro)
            + self.beat_images
            + self.keyword_overlays
            + self.gap_fills
            + self.sound_effects
    }
}

/// Places overlays and sound effects on a built timeline.
pub struct AssetPlanner<'a> {
    catalog: &'a AssetCatalog,
    strategy: &'a StrategyConfig,
    settings: &'a PlacementSettings,
    used: HashSet<String>,
    time_map: SourceTimeMap,
}

impl<'a> AssetPlanner<'a> {
    pub fn new(
        catalog: &'a AssetCatalog,
        strategy: &'a StrategyConfig,
        settings: &'a PlacementSettings,
    ) -> Self {
        Self {
            catalog,
            strategy,
            settings,
            used: HashSet::new(),
            time_map: SourceTimeMap::default(),
        }
    }

    /// Run every enabled pass over `timeline`.
    pub fn plan(&mut self, timeline: &mut Timeline, inputs: PlacementInputs<'_>) -> PlacementSummary {
        self.time_map = SourceTimeMap::from_timeline(timeline);
        self.used = timeline
            .track(TrackKind::ClipVideo)
            .iter()
            .filter_map(|l| l.asset_ref.clone())
            .collect();
        self.report_missing(timeline);

        let mut summary = PlacementSummary {
            intro: self.place_intro(timeline),
            ..Default::default()
        };

        let beat_layers = if self.settings.beat_sync {
            self.place_beat_images(timeline, inputs.beats)
        } else {
            Vec::new()
        };
        summary.beat_images = beat_layers.len();

        if self.settings.keyword_triggers {
            summary.keyword_overlays = self.place_keyword_overlays(timeline, inputs.keyword_matches);
        }

        if self.settings.fill_gaps {
            summary.gap_fills = self.fill_gaps(timeline);
        }

        if self.settings.sound_effects {
            summary.sound_effects = self.place_sound_effects(timeline, &beat_layers, inputs.words);
        }

        timeline.refresh_layer_count();
        tracing::debug!(
            "Placement: intro={}, beats={}, keywords={}, gaps={}, sfx={}",
            summary.intro,
            summary.beat_images,
            summary.keyword_overlays,
            summary.gap_fills,
            summary.sound_effects
        );
        summary
    }

    /// Assets referenced by the plan so far.
    pub fn used_assets(&self) -> &HashSet<String> {
        &self.used
    }

    /// Commit a placement attempt: push the layer or record why it failed.
    fn commit(&mut self, timeline: &mut Timeline, attempt: Result<Layer, SkipReason>) -> bool {
        match attempt {
            Ok(layer) => {
                if let Some(asset_ref) = &layer.asset_ref {
                    if !layer.track.is_audio() {
                        self.used.insert(asset_ref.clone());
                    }
                }
                timeline.push(layer);
                true
            }
            Err(reason) => {
                timeline.record(STAGE, reason);
                false
            }
        }
    }

    fn is_unused(&self, asset_ref: &str) -> bool {
        !self.used.contains(asset_ref)
    }

    /// Record visual assets the catalog lists but could not find on disk.
    fn report_missing(&self, timeline: &mut Timeline) {
        let missing = self
            .catalog
            .post_screenshot
            .iter()
            .chain(&self.catalog.images)
            .chain(&self.catalog.comment_screenshots)
            .filter(|a| !a.available);
        for asset in missing {
            timeline.record(
                STAGE,
                SkipReason::AssetMissing {
                    asset_ref: asset.asset_ref(),
                },
            );
        }
    }
}
