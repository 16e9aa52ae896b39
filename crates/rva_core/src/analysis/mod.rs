//! Caption analysis passes.
//!
//! Both passes are read-only over the caption store and run ahead of the
//! timeline fold:
//!
//! - [`detect_beats`]: sentence-end and pause beats from caption timing
//! - [`KeywordTable`]: ordered `(pattern, category)` table over derived words

mod beats;
mod keywords;

pub use beats::{detect_beats, Beat, BeatKind, PAUSE_THRESHOLD, SENTENCE_END_STRENGTH};
pub use keywords::{
    select_transition, sfx_cue_for, AssetCategory, KeywordMatch, KeywordTable, SfxCue,
};
