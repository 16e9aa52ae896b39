//! Clip-audio ducking envelope.

use serde::{Deserialize, Serialize};

use crate::models::DuckingCurve;

/// Volume envelope applied to a clip-audio layer while narration resumes
/// over the clip's tail.
///
/// `gain_at` is a relative multiplier: `1.0` outside `[start, end)`,
/// `target_volume` through the middle of the window, with curved fades of
/// `fade_duration` at each edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuckingEnvelope {
    pub start: f64,
    pub end: f64,
    pub target_volume: f64,
    pub fade_duration: f64,
    pub curve: DuckingCurve,
    pub base_volume: f64,
}

impl DuckingEnvelope {
    pub fn window(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Fade length actually used: never more than half the window, so the
    /// midpoint always reaches the target.
    pub fn effective_fade(&self) -> f64 {
        self.fade_duration.max(0.0).min(self.window() / 2.0)
    }

    /// Relative gain at output time `t`.
    pub fn gain_at(&self, t: f64) -> f64 {
        if t < self.start || t >= self.end {
            return 1.0;
        }

        let fade = self.effective_fade();
        let depth = 1.0 - self.target_volume;
        if fade <= 0.0 {
            return self.target_volume;
        }

        if t < self.start + fade {
            let progress = (t - self.start) / fade;
            1.0 - depth * self.curve.shape(progress)
        } else if t <= self.end - fade {
            self.target_volume
        } else {
            let progress = (self.end - t) / fade;
            1.0 - depth * self.curve.shape(progress)
        }
    }

    /// Absolute volume at output time `t`.
    pub fn volume_at(&self, t: f64) -> f64 {
        self.base_volume * self.gain_at(t)
    }
}
