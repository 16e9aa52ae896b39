//! Production run orchestration.
//!
//! [`produce_timeline`] runs one production end to end:
//!
//! ```text
//! parse_script ─> quality report ─> strategy (+ catalog adaptation)
//!     ─> beats / words / keyword matches
//!     ─> TimelineBuilder
//!     ─> Pipeline
//!          ├── Stage: PlaceAssets
//!          └── Stage: ValidateTimeline
//!     ─> render order
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rva_core::{produce_timeline, TimelineRequest};
//!
//! let plan = produce_timeline(
//!     TimelineRequest::new(script, catalog).with_captions(captions),
//! )?;
//! println!("{:.2}s, {} layers", plan.timeline.total_duration, plan.timeline.layer_count());
//! ```

mod errors;
mod pipeline;
mod produce;
mod stage;
mod stages;
mod types;

pub use errors::{PipelineError, PipelineResult, StageError, StageResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use produce::{produce_timeline, ScriptInput, TimelinePlan, TimelineRequest};
pub use stage::TimelineStage;
pub use stages::{PlaceAssets, ValidateTimeline};
pub use types::{RunState, StageContext, StageOutcome};
