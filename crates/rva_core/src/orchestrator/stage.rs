//! Stage trait definition.

use super::errors::StageResult;
use super::types::{RunState, StageContext, StageOutcome};

/// A step of the post-build pipeline.
///
/// The pipeline calls, in order:
///
/// 1. `validate_input` - check preconditions
/// 2. `execute` - mutate the run state
/// 3. `validate_output` - only after `execute` returned `Success`
pub trait TimelineStage: Send + Sync {
    /// Stage name, for logging and error context.
    fn name(&self) -> &str;

    fn validate_input(&self, ctx: &StageContext<'_>, state: &RunState) -> StageResult<()>;

    fn execute(&self, ctx: &StageContext<'_>, state: &mut RunState) -> StageResult<StageOutcome>;

    fn validate_output(&self, ctx: &StageContext<'_>, state: &RunState) -> StageResult<()>;

    fn description(&self) -> &str {
        self.name()
    }
}
