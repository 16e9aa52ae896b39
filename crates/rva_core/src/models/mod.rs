//! Shared data models.
//!
//! Plain data types consumed across the engine: script segments, normalized
//! asset records and the small enums that describe how layers are styled.

mod asset;
mod enums;
mod segment;

pub use asset::{AssetCatalog, AssetKind, AssetRecord};
pub use enums::{DuckingCurve, PanDirection, ScreenPosition, TransitionHint, TransitionStyle};
pub use segment::{Segment, SegmentKind};
