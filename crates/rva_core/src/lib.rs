//! RVA Core - Timeline composition engine for short narrated videos.
//!
//! This crate turns a segmented narration script, a caption stream and a
//! catalog of media assets into a fully resolved multi-track [`Timeline`]
//! that a rendering backend can composite. It never decodes or encodes
//! media itself.
//!
//! Pipeline order:
//!
//! ```text
//! script::parse_script ─┐
//! captions (+ beats, words, keyword matches) ─┼─> TimelineBuilder ─> PlaceAssets ─> Validate ─> render order
//! catalog (+ strategy) ─┘
//! ```

pub mod analysis;
pub mod captions;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod placement;
pub mod render_order;
pub mod script;
pub mod strategy;
pub mod timeline;
pub mod validation;

pub use orchestrator::{produce_timeline, ScriptInput, TimelinePlan, TimelineRequest};
pub use timeline::{Layer, Timeline, TrackKind};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
