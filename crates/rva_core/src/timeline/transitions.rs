//! Transitions between narration and inserted clips.

use super::types::{Timeline, TrackKind, Transition, TransitionKind};
use crate::models::TransitionStyle;

/// Crossfade length for fading styles, in seconds.
pub const CROSSFADE_DURATION: f64 = 0.5;

/// Plan one transition per clip, from the last narration layer that ends at
/// or before the clip starts. Clips with no preceding narration get none.
pub fn plan_transitions(timeline: &Timeline, style: TransitionStyle) -> Vec<Transition> {
    let (kind, duration) = if style.uses_fades() {
        (TransitionKind::Crossfade, CROSSFADE_DURATION)
    } else {
        (TransitionKind::Cut, 0.0)
    };

    let narration = timeline.track(TrackKind::NarrationAudio);

    timeline
        .track(TrackKind::ClipVideo)
        .iter()
        .filter_map(|clip| {
            let previous = narration
                .iter()
                .filter(|n| n.timeline_end <= clip.timeline_start + 1e-9)
                .last()?;
            Some(Transition {
                kind,
                from_segment: previous.segment,
                to_segment: clip.segment,
                timeline_start: previous.timeline_end,
                duration,
            })
        })
        .collect()
}
