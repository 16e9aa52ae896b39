//! Core enums used throughout the engine.

use serde::{Deserialize, Serialize};

/// Interpolation shape used while fading a ducked audio layer.
///
/// Every shape maps `0.0 -> 0.0` and `1.0 -> 1.0` and is monotonic in between,
/// so envelope boundary values do not depend on the chosen curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuckingCurve {
    /// Straight line.
    Linear,
    /// Smoothstep (ease in and out).
    #[default]
    Smooth,
    /// Fast initial movement, slow settle.
    Sharp,
    /// Slow start, fast finish.
    Exponential,
}

impl DuckingCurve {
    /// Steepness used by the exponential shape.
    const EXP_K: f64 = 4.0;

    /// Map a fade progress value in `[0, 1]` onto the curve.
    pub fn shape(&self, progress: f64) -> f64 {
        let x = progress.clamp(0.0, 1.0);
        match self {
            DuckingCurve::Linear => x,
            DuckingCurve::Smooth => x * x * (3.0 - 2.0 * x),
            DuckingCurve::Sharp => x.sqrt(),
            DuckingCurve::Exponential => {
                ((Self::EXP_K * x).exp() - 1.0) / (Self::EXP_K.exp() - 1.0)
            }
        }
    }

    /// All curve shapes, in declaration order.
    pub const ALL: [DuckingCurve; 4] = [
        DuckingCurve::Linear,
        DuckingCurve::Smooth,
        DuckingCurve::Sharp,
        DuckingCurve::Exponential,
    ];
}

impl std::fmt::Display for DuckingCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuckingCurve::Linear => write!(f, "linear"),
            DuckingCurve::Smooth => write!(f, "smooth"),
            DuckingCurve::Sharp => write!(f, "sharp"),
            DuckingCurve::Exponential => write!(f, "exponential"),
        }
    }
}

impl std::str::FromStr for DuckingCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(DuckingCurve::Linear),
            "smooth" => Ok(DuckingCurve::Smooth),
            "sharp" => Ok(DuckingCurve::Sharp),
            "exponential" => Ok(DuckingCurve::Exponential),
            other => Err(format!("unknown ducking curve '{}'", other)),
        }
    }
}

/// Entry animation hint attached to keyword-triggered overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionHint {
    /// Impact / action words.
    Shake,
    /// Extreme surprise.
    Spin,
    /// Awkward or funny moments.
    Wobble,
    /// Technical focus.
    ZoomIn,
    /// Social / comment references.
    Popup,
    /// Energetic default.
    BounceIn,
    /// Calm fade (beat-synchronized images).
    Fade,
}

impl std::fmt::Display for TransitionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransitionHint::Shake => "shake",
            TransitionHint::Spin => "spin",
            TransitionHint::Wobble => "wobble",
            TransitionHint::ZoomIn => "zoom_in",
            TransitionHint::Popup => "popup",
            TransitionHint::BounceIn => "bounce_in",
            TransitionHint::Fade => "fade",
        };
        write!(f, "{}", name)
    }
}

/// Ken Burns pan direction, alternated between consecutive beat images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    LeftToRight,
    RightToLeft,
}

impl PanDirection {
    /// Direction for the `index`-th image (even = left to right).
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            PanDirection::LeftToRight
        } else {
            PanDirection::RightToLeft
        }
    }
}

/// Anchor position of an overlay on the vertical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPosition {
    #[default]
    Center,
    CenterTop,
    BottomCenter,
}

/// Cut style between narration and inserted clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    QuickCuts,
    #[default]
    SmoothFades,
    CleanCuts,
    DramaticFades,
}

impl TransitionStyle {
    /// Whether segment boundaries should crossfade rather than cut.
    pub fn uses_fades(&self) -> bool {
        matches!(self, TransitionStyle::SmoothFades | TransitionStyle::DramaticFades)
    }
}
