//! Z-order resolution.
//!
//! Flattens the visual tracks of a timeline into the single ordered list a
//! compositor draws from bottom to top: ascending z-index (background 0,
//! overlays 5, clips 10, captions 100), ties broken by start time.

use serde::{Deserialize, Serialize};

use crate::timeline::{Timeline, TrackKind};

/// One visual layer in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub track: TrackKind,
    /// Position of the layer within its track.
    pub layer_index: usize,
    pub z_index: i32,
    pub timeline_start: f64,
    pub timeline_end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Resolve the draw order of every visual layer.
pub fn resolve_render_order(timeline: &Timeline) -> Vec<RenderItem> {
    let mut items: Vec<RenderItem> = timeline
        .tracks
        .iter()
        .filter(|(track, _)| track.render_priority().is_some())
        .flat_map(|(track, layers)| {
            layers.iter().enumerate().map(|(layer_index, layer)| RenderItem {
                track: *track,
                layer_index,
                z_index: layer.z_index,
                timeline_start: layer.timeline_start,
                timeline_end: layer.timeline_end,
                asset_ref: layer.asset_ref.clone(),
                text: layer.text.clone(),
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.z_index
            .cmp(&b.z_index)
            .then(a.timeline_start.total_cmp(&b.timeline_start))
    });
    items
}
