//! Core types for the stage pipeline.

use std::sync::Arc;

use crate::analysis::{Beat, KeywordMatch};
use crate::captions::Word;
use crate::config::Settings;
use crate::logging::RunLogger;
use crate::models::AssetCatalog;
use crate::placement::PlacementSummary;
use crate::strategy::StrategyConfig;
use crate::timeline::Timeline;
use crate::validation::ValidationReport;

/// Read-only inputs shared by every stage.
///
/// Mutable state goes in [`RunState`].
pub struct StageContext<'a> {
    pub run_name: String,
    pub catalog: &'a AssetCatalog,
    pub strategy: &'a StrategyConfig,
    pub settings: &'a Settings,
    /// Beats in narration-audio time.
    pub beats: &'a [Beat],
    pub keyword_matches: &'a [KeywordMatch],
    pub words: &'a [Word],
    pub logger: Arc<RunLogger>,
}

/// Mutable state threaded through the stages.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub timeline: Timeline,
    pub placement: Option<PlacementSummary>,
    pub validation: Option<ValidationReport>,
}

impl RunState {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            ..Default::default()
        }
    }
}

/// Result of executing a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// Stage decided not to run; not an error.
    Skipped(String),
}
