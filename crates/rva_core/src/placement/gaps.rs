//! Gap filling with leftover images.

use super::AssetPlanner;
use crate::models::{ScreenPosition, TransitionHint};
use crate::timeline::{Layer, LayerKind, Timeline, TrackKind};

/// Uncovered `[start, end)` intervals of at least `min_gap` seconds between
/// `from` and `until`, given covered spans in any order.
pub fn find_gaps(covered: &[(f64, f64)], from: f64, until: f64, min_gap: f64) -> Vec<(f64, f64)> {
    let mut spans = covered.to_vec();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps = Vec::new();
    let mut cursor = from;
    for (start, end) in spans {
        if start - cursor >= min_gap {
            gaps.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if until - cursor >= min_gap {
        gaps.push((cursor, until));
    }
    gaps
}

impl AssetPlanner<'_> {
    /// Fill overlay gaps after the intro window with unused images.
    pub(super) fn fill_gaps(&mut self, timeline: &mut Timeline) -> usize {
        let covered: Vec<(f64, f64)> = timeline
            .track(TrackKind::OverlayImages)
            .iter()
            .map(|l| (l.timeline_start, l.timeline_end))
            .collect();
        let gaps = find_gaps(
            &covered,
            self.settings.intro_duration,
            timeline.total_duration,
            self.settings.min_gap,
        );

        let mut leftovers = self
            .catalog
            .available_images()
            .map(|i| i.asset_ref())
            .filter(|r| self.is_unused(r))
            .collect::<Vec<_>>()
            .into_iter();

        let mut filled = 0;
        for (start, end) in gaps {
            let Some(asset_ref) = leftovers.next() else {
                break;
            };
            let length = self.settings.gap_fill_max.min(end - start);
            let layer = Layer::new(
                TrackKind::OverlayImages,
                LayerKind::Image,
                start,
                start + length,
                format!("gap fill [{:.2}, {:.2}]", start, end),
            )
            .with_asset(asset_ref)
            .with_position(ScreenPosition::Center)
            .with_transition(TransitionHint::Fade);
            if self.commit(timeline, Ok(layer)) {
                filled += 1;
            }
        }
        filled
    }
}
