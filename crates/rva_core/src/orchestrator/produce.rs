//! One-call entry point: script, captions and catalog in, timeline out.

use std::sync::Arc;

use serde::Serialize;

use super::errors::{PipelineError, PipelineResult};
use super::pipeline::{Pipeline, PipelineRunResult};
use super::stages::{PlaceAssets, ValidateTimeline};
use super::types::{RunState, StageContext};
use crate::analysis::{detect_beats, Beat, KeywordMatch, KeywordTable};
use crate::captions::CaptionTrack;
use crate::catalog::QualityReport;
use crate::config::Settings;
use crate::logging::{LogConfig, RunLogger};
use crate::models::{AssetCatalog, Segment};
use crate::placement::PlacementSummary;
use crate::render_order::{resolve_render_order, RenderItem};
use crate::script::{parse_script, ParsedScript};
use crate::strategy::StrategyConfig;
use crate::timeline::{SkipReason, Timeline, TimelineBuilder, BUILD_STAGE};
use crate::validation::ValidationReport;

/// Script as raw text or as already-segmented parts.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptInput {
    /// Text with `[VIDEO_BREAK: ...]` markers.
    Text(String),
    Segments(Vec<Segment>),
}

impl ScriptInput {
    fn into_parsed(self) -> ParsedScript {
        match self {
            ScriptInput::Text(text) => parse_script(&text),
            ScriptInput::Segments(mut segments) => {
                segments.sort_by_key(|s| s.order);
                ParsedScript {
                    has_breaks: segments.iter().any(|s| s.break_type.is_some()),
                    segments,
                }
            }
        }
    }
}

/// Inputs for one production run.
pub struct TimelineRequest {
    pub run_name: String,
    pub script: ScriptInput,
    /// Captions in narration-audio time; empty when unavailable.
    pub captions: CaptionTrack,
    /// Why captions could not be loaded, if they could not.
    pub caption_error: Option<String>,
    /// Normalized catalog.
    pub catalog: AssetCatalog,
    pub settings: Settings,
    /// Explicit strategy; derived from `settings` when `None`.
    pub strategy: Option<StrategyConfig>,
    /// Issues found while normalizing the catalog.
    pub catalog_issues: Vec<String>,
    pub logger: Option<Arc<RunLogger>>,
}

impl TimelineRequest {
    pub fn new(script: impl Into<String>, catalog: AssetCatalog) -> Self {
        Self {
            run_name: "timeline".to_string(),
            script: ScriptInput::Text(script.into()),
            captions: CaptionTrack::default(),
            caption_error: None,
            catalog,
            settings: Settings::default(),
            strategy: None,
            catalog_issues: Vec::new(),
            logger: None,
        }
    }

    /// Request for a script that is already segmented.
    pub fn from_segments(segments: Vec<Segment>, catalog: AssetCatalog) -> Self {
        Self {
            script: ScriptInput::Segments(segments),
            ..Self::new(String::new(), catalog)
        }
    }

    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = run_name.into();
        self
    }

    pub fn with_captions(mut self, captions: CaptionTrack) -> Self {
        self.captions = captions;
        self
    }

    pub fn with_caption_error(mut self, message: impl Into<String>) -> Self {
        self.caption_error = Some(message.into());
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_catalog_issues(mut self, issues: Vec<String>) -> Self {
        self.catalog_issues = issues;
        self
    }

    pub fn with_logger(mut self, logger: Arc<RunLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Everything a production run produced.
#[derive(Debug, Clone, Serialize)]
pub struct TimelinePlan {
    pub timeline: Timeline,
    pub render_order: Vec<RenderItem>,
    pub segments: Vec<Segment>,
    pub beats: Vec<Beat>,
    pub keyword_matches: Vec<KeywordMatch>,
    pub strategy: StrategyConfig,
    pub quality: QualityReport,
    pub placement: Option<PlacementSummary>,
    #[serde(skip)]
    pub validation: Option<ValidationReport>,
    #[serde(skip)]
    pub stages: PipelineRunResult,
}

/// Segment, analyse, build, place, validate and order one timeline.
///
/// Only fatal build conditions and failed stage checks are errors; every
/// recoverable problem ends up on `timeline.trace`.
pub fn produce_timeline(request: TimelineRequest) -> PipelineResult<TimelinePlan> {
    let TimelineRequest {
        run_name,
        script,
        mut captions,
        caption_error,
        catalog,
        settings,
        strategy,
        catalog_issues,
        logger,
    } = request;

    let logger = logger.unwrap_or_else(|| {
        Arc::new(RunLogger::detached(
            run_name.clone(),
            LogConfig::from(&settings.logging),
        ))
    });

    logger.phase("Segment script");
    let parsed = script.into_parsed();
    if parsed.segments.is_empty() {
        return Err(PipelineError::invalid_request(&run_name, "script has no segments"));
    }
    logger.info(&format!(
        "{} segments, {} video breaks",
        parsed.segments.len(),
        parsed.break_types().len()
    ));

    let required_tags: Vec<String> = parsed.break_types().iter().map(|t| t.to_string()).collect();
    let quality = QualityReport::assess(&catalog, &required_tags, catalog_issues);
    for issue in &quality.issues {
        logger.warn(issue);
    }

    let base = strategy.unwrap_or_else(|| StrategyConfig::from(&settings));
    let strategy = if settings.strategy.adapt_to_assets {
        base.adapt_to_catalog(&catalog)
    } else {
        base
    };
    logger.info(&format!(
        "Strategy '{}': tempo {:.2}, image duration {:.1}s, {} ducking",
        strategy.name, strategy.tempo, strategy.image_duration, strategy.ducking_curve
    ));
    for note in &strategy.adaptations {
        logger.detail(note);
    }

    logger.phase("Analyse captions");
    if let Some(length) = catalog.narration.as_ref().and_then(|n| n.duration) {
        captions.truncate_to(length);
    }
    let beats = detect_beats(&captions.entries);
    let words = captions.words();
    let keyword_matches = KeywordTable::default().match_words(&words);
    logger.info(&format!(
        "{} caption entries, {} beats, {} keyword matches",
        captions.len(),
        beats.len(),
        keyword_matches.len()
    ));

    logger.phase("Build timeline");
    let mut timeline = TimelineBuilder::new(&parsed.segments, &catalog, &strategy)
        .with_captions(&captions.entries)
        .build()
        .map_err(|e| {
            logger.error(&e.to_string());
            PipelineError::build_failed(&run_name, e)
        })?;
    if let Some(message) = caption_error {
        timeline.record(BUILD_STAGE, SkipReason::CaptionsUnavailable { message });
    }
    timeline.metadata.beat_count = beats.len();
    logger.success(&format!(
        "Base timeline {:.2}s with {} layers",
        timeline.total_duration, timeline.metadata.layer_count
    ));

    let ctx = StageContext {
        run_name: run_name.clone(),
        catalog: &catalog,
        strategy: &strategy,
        settings: &settings,
        beats: &beats,
        keyword_matches: &keyword_matches,
        words: &words,
        logger: Arc::clone(&logger),
    };
    let mut state = RunState::new(timeline);
    let stages = Pipeline::new()
        .with_stage(PlaceAssets::new())
        .with_stage(ValidateTimeline::new())
        .run(&ctx, &mut state)?;

    let RunState {
        mut timeline,
        placement,
        validation,
    } = state;
    timeline.refresh_layer_count();
    let render_order = resolve_render_order(&timeline);

    logger.success(&format!(
        "Timeline ready: {:.2}s, {} layers, {} trace entries",
        timeline.total_duration,
        timeline.metadata.layer_count,
        timeline.trace.len()
    ));
    logger.flush();

    Ok(TimelinePlan {
        timeline,
        render_order,
        segments: parsed.segments,
        beats,
        keyword_matches,
        strategy,
        quality,
        placement,
        validation,
        stages,
    })
}
