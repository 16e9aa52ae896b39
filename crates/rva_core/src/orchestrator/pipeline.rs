//! Pipeline runner that executes stages in sequence.

use super::errors::{PipelineError, PipelineResult};
use super::stage::TimelineStage;
use super::types::{RunState, StageContext, StageOutcome};

/// Ordered list of stages run over one timeline.
pub struct Pipeline {
    stages: Vec<Box<dyn TimelineStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn add_stage<S: TimelineStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a stage (builder pattern).
    pub fn with_stage<S: TimelineStage + 'static>(mut self, stage: S) -> Self {
        self.add_stage(stage);
        self
    }

    /// Run every stage in order.
    ///
    /// Stops at the first stage whose input check, execution or output
    /// check fails, after dumping the logger's tail buffer.
    pub fn run(&self, ctx: &StageContext<'_>, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult::default();

        for stage in &self.stages {
            let stage_name = stage.name();
            ctx.logger.phase(stage.description());

            ctx.logger
                .debug(&format!("Validating input for '{}'", stage_name));
            if let Err(e) = stage.validate_input(ctx, state) {
                ctx.logger.error(&format!("Input validation failed: {}", e));
                ctx.logger.show_tail(stage_name);
                return Err(PipelineError::stage_failed(&ctx.run_name, stage_name, e));
            }

            let outcome = stage.execute(ctx, state).map_err(|e| {
                ctx.logger.error(&format!("Execution failed: {}", e));
                ctx.logger.show_tail(stage_name);
                PipelineError::stage_failed(&ctx.run_name, stage_name, e)
            })?;

            match outcome {
                StageOutcome::Success => {
                    if let Err(e) = stage.validate_output(ctx, state) {
                        ctx.logger.error(&format!("Output validation failed: {}", e));
                        ctx.logger.show_tail(stage_name);
                        return Err(PipelineError::stage_failed(&ctx.run_name, stage_name, e));
                    }
                    ctx.logger.success(&format!("{} completed", stage_name));
                    result.stages_completed.push(stage_name.to_string());
                }
                StageOutcome::Skipped(reason) => {
                    ctx.logger.skip(&format!("{}: {}", stage_name, reason));
                    result.stages_skipped.push(stage_name.to_string());
                }
            }
        }

        Ok(result)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRunResult {
    pub stages_completed: Vec<String>,
    pub stages_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// Check if all stages completed (none skipped).
    pub fn all_completed(&self) -> bool {
        self.stages_skipped.is_empty()
    }
}
