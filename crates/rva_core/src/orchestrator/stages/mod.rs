//! Stage implementations.
//!
//! Each stage handles one post-build phase of a production run.

mod place_assets;
mod validate_timeline;

pub use place_assets::PlaceAssets;
pub use validate_timeline::ValidateTimeline;
