//! Timeline validation.
//!
//! Clamps every layer to the timeline duration and removes overlaps on the
//! exclusive visual tracks (background, clips, overlays). Audio and caption
//! tracks are allowed to overlap.

mod validator;

pub use validator::{check_non_overlap, OverlapError, TimelineValidator, ValidationReport, STAGE};
