//! Asset catalog boundary.
//!
//! Loose upstream inputs ([`CatalogManifest`]) are normalized into a typed
//! [`AssetCatalog`](crate::models::AssetCatalog) plus a [`QualityReport`].
//! File existence and durations are resolved here, once.

mod error;
mod manifest;
mod normalize;
mod probe;
mod report;

pub use error::CatalogError;
pub use manifest::{CatalogManifest, MediaRef, SfxRef};
pub use normalize::{normalize_catalog, NormalizedCatalog, MIN_CLIP_DURATION};
pub use probe::{DurationProbe, FfprobeProbe, NoProbe};
pub use report::{QualityReport, READY_THRESHOLD};
