//! Validation stage.

use crate::orchestrator::errors::{StageError, StageResult};
use crate::orchestrator::stage::TimelineStage;
use crate::orchestrator::types::{RunState, StageContext, StageOutcome};
use crate::validation::{check_non_overlap, TimelineValidator};

/// Clamps and trims the placed timeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidateTimeline;

impl ValidateTimeline {
    pub fn new() -> Self {
        Self
    }
}

impl TimelineStage for ValidateTimeline {
    fn name(&self) -> &str {
        "ValidateTimeline"
    }

    fn description(&self) -> &str {
        "Validate timeline"
    }

    fn validate_input(&self, _ctx: &StageContext<'_>, state: &RunState) -> StageResult<()> {
        if !state.timeline.total_duration.is_finite() || state.timeline.total_duration < 0.0 {
            return Err(StageError::invalid_input(format!(
                "invalid total duration {}",
                state.timeline.total_duration
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &StageContext<'_>, state: &mut RunState) -> StageResult<StageOutcome> {
        let validator = TimelineValidator::new(&ctx.settings.validation);
        let report = validator.validate(&mut state.timeline);

        if report.is_clean() {
            ctx.logger.validation("No layers clamped or trimmed");
        } else {
            ctx.logger.validation(&format!(
                "{} clamped, {} trimmed, {} dropped",
                report.clamped, report.trimmed, report.dropped
            ));
        }
        state.validation = Some(report);
        Ok(StageOutcome::Success)
    }

    fn validate_output(&self, ctx: &StageContext<'_>, state: &RunState) -> StageResult<()> {
        match check_non_overlap(&state.timeline) {
            Ok(()) => Ok(()),
            Err(e) if ctx.settings.validation.strict => Err(e.into()),
            Err(e) => {
                ctx.logger.warn(&e.to_string());
                Ok(())
            }
        }
    }
}
