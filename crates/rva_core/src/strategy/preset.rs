//! Named strategy presets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StrategyConfig;
use crate::models::{DuckingCurve, TransitionStyle};

/// Errors from strategy selection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Unknown strategy preset '{0}'")]
    UnknownPreset(String),
}

/// Named editing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPreset {
    ActionPacked,
    #[default]
    Storytelling,
    Educational,
    Dramatic,
}

impl StrategyPreset {
    pub const ALL: [StrategyPreset; 4] = [
        StrategyPreset::ActionPacked,
        StrategyPreset::Storytelling,
        StrategyPreset::Educational,
        StrategyPreset::Dramatic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyPreset::ActionPacked => "action_packed",
            StrategyPreset::Storytelling => "storytelling",
            StrategyPreset::Educational => "educational",
            StrategyPreset::Dramatic => "dramatic",
        }
    }

    /// Pick a preset from a tone label and energy level.
    ///
    /// High energy, action and funny content get the fast preset.
    pub fn for_tone(tone: &str, energy: &str) -> Self {
        match (tone.to_ascii_lowercase().as_str(), energy.to_ascii_lowercase().as_str()) {
            ("action", _) | (_, "high") | ("funny", _) => StrategyPreset::ActionPacked,
            ("educational", _) => StrategyPreset::Educational,
            ("dramatic", _) => StrategyPreset::Dramatic,
            _ => StrategyPreset::Storytelling,
        }
    }

    /// Full strategy for this preset.
    pub fn config(&self) -> StrategyConfig {
        let (tempo, image_duration, ducking_curve, duck_target_volume, transition_style) =
            match self {
                StrategyPreset::ActionPacked => {
                    (1.3, 1.5, DuckingCurve::Sharp, 0.2, TransitionStyle::QuickCuts)
                }
                StrategyPreset::Storytelling => {
                    (1.1, 3.0, DuckingCurve::Smooth, 0.3, TransitionStyle::SmoothFades)
                }
                StrategyPreset::Educational => {
                    (1.0, 4.0, DuckingCurve::Linear, 0.25, TransitionStyle::CleanCuts)
                }
                StrategyPreset::Dramatic => (
                    0.9,
                    3.5,
                    DuckingCurve::Exponential,
                    0.15,
                    TransitionStyle::DramaticFades,
                ),
            };

        StrategyConfig {
            name: self.name().to_string(),
            tempo,
            image_duration,
            ducking_curve,
            duck_target_volume,
            overlap_percentage: None,
            transition_style,
            ducking_enabled: true,
            duck_fade_duration: 0.5,
            adaptations: Vec::new(),
        }
    }
}

impl std::fmt::Display for StrategyPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyPreset {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyPreset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| StrategyError::UnknownPreset(s.to_string()))
    }
}
