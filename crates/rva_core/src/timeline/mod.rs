//! Timeline model and builder.
//!
//! The [`TimelineBuilder`] folds script segments into a [`Timeline`] of
//! narration, background, clip and caption layers. Placement, validation
//! and render ordering then work on that timeline in place.
//!
//! Three time domains are in play:
//!
//! - narration-audio time (captions, beats, keyword words),
//! - output-timeline time (every `timeline_start`/`timeline_end`),
//! - clip source time (`source_start`/`source_end` of clip layers).
//!
//! [`SourceTimeMap`] converts the first into the second.

mod builder;
mod ducking;
mod duration;
mod error;
mod overlap;
mod retime;
mod trace;
mod transitions;
mod types;

pub use builder::{TimelineBuilder, BACKGROUND_DARKEN, STAGE as BUILD_STAGE};
pub use ducking::DuckingEnvelope;
pub use duration::{
    estimate_duration, word_count_duration, DurationEstimate, EstimateSource, WORDS_PER_MINUTE,
};
pub use error::BuildError;
pub use overlap::{dynamic_overlap, overlap_for};
pub use retime::{NarrationWindow, SourceTimeMap};
pub use trace::{SkipReason, TraceEntry};
pub use transitions::{plan_transitions, CROSSFADE_DURATION};
pub use types::{
    Layer, LayerKind, Timeline, TimelineMetadata, TrackKind, Transition, TransitionKind,
};
