//! Editing strategy.
//!
//! [`StrategyConfig`] is an immutable value built from a named preset, the
//! `[strategy]` config section, or both, and passed explicitly into the
//! builder and planner.

mod preset;

pub use preset::{StrategyError, StrategyPreset};

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::models::{AssetCatalog, DuckingCurve, TransitionStyle};

/// Narration tempo when no preset or override asks for another.
pub const DEFAULT_TEMPO: f64 = 1.0;

/// Allowed tempo range.
pub const TEMPO_RANGE: (f64, f64) = (0.5, 2.0);

/// Narration length above which tempo is raised, in seconds.
const LONG_NARRATION: f64 = 60.0;

/// Tempo cap for the long-narration adaptation.
const LONG_NARRATION_TEMPO_CAP: f64 = 1.5;

/// Strategy parameters read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Preset name this config started from.
    pub name: String,
    /// Narration playback speed multiplier.
    pub tempo: f64,
    /// Target display time per beat-synchronized image, in seconds.
    pub image_duration: f64,
    pub ducking_curve: DuckingCurve,
    /// Clip audio gain at the middle of a duck window.
    pub duck_target_volume: f64,
    /// Fixed overlap fraction; `None` uses the dynamic duration buckets.
    pub overlap_percentage: Option<f64>,
    pub transition_style: TransitionStyle,
    pub ducking_enabled: bool,
    pub duck_fade_duration: f64,
    /// Adjustments applied by [`StrategyConfig::adapt_to_catalog`].
    #[serde(default)]
    pub adaptations: Vec<String>,
}

/// Storytelling-style pacing at unmodified narration speed.
impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            name: "default".to_string(),
            tempo: DEFAULT_TEMPO,
            ..StrategyPreset::Storytelling.config()
        }
    }
}

impl StrategyConfig {
    /// Strategy for a named preset.
    pub fn from_preset(preset: StrategyPreset) -> Self {
        preset.config()
    }

    /// Builder-style tempo override. The value is clamped to [`TEMPO_RANGE`].
    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = clamp_tempo(tempo);
        self
    }

    pub fn with_overlap_percentage(mut self, fraction: Option<f64>) -> Self {
        self.overlap_percentage = fraction.map(|f| f.clamp(0.0, 1.0));
        self
    }

    pub fn with_ducking(mut self, enabled: bool) -> Self {
        self.ducking_enabled = enabled;
        self
    }

    /// Base clip-audio volume before ducking.
    pub fn clip_base_volume(&self) -> f64 {
        if self.ducking_enabled {
            0.9
        } else {
            1.0
        }
    }

    /// Adjust the strategy to what the catalog actually provides.
    ///
    /// - fewer than 3 images: image duration ×1.5
    /// - no available clips: overlap forced to 0
    /// - narration longer than 60s: tempo ×1.2, capped at 1.5
    pub fn adapt_to_catalog(&self, catalog: &AssetCatalog) -> StrategyConfig {
        let mut adapted = self.clone();

        if catalog.available_images().count() < 3 {
            adapted.image_duration *= 1.5;
            adapted
                .adaptations
                .push("Increased image duration (few images)".to_string());
        }

        if catalog.available_clip_count() == 0 {
            adapted.overlap_percentage = Some(0.0);
            adapted
                .adaptations
                .push("Disabled overlap (no video clips)".to_string());
        }

        let narration_len = catalog
            .narration
            .as_ref()
            .filter(|n| n.available)
            .and_then(|n| n.duration)
            .unwrap_or(0.0);
        if narration_len > LONG_NARRATION {
            adapted.tempo = clamp_tempo((adapted.tempo * 1.2).min(LONG_NARRATION_TEMPO_CAP));
            adapted
                .adaptations
                .push("Increased tempo (long narration)".to_string());
        }

        for note in &adapted.adaptations[self.adaptations.len()..] {
            tracing::debug!("Strategy adaptation: {}", note);
        }
        adapted
    }
}

impl From<&Settings> for StrategyConfig {
    fn from(settings: &Settings) -> Self {
        let section = &settings.strategy;
        let mut config = match section.preset.as_deref() {
            Some(name) => match name.parse::<StrategyPreset>() {
                Ok(preset) => preset.config(),
                Err(e) => {
                    tracing::warn!("{}, falling back to the default strategy", e);
                    StrategyConfig::default()
                }
            },
            None => StrategyConfig::default(),
        };
        if let Some(tempo) = section.tempo {
            config.tempo = clamp_tempo(tempo);
        }
        if let Some(duration) = section.image_duration {
            config.image_duration = duration;
        }
        if let Some(curve) = section.ducking_curve {
            config.ducking_curve = curve;
        }
        if let Some(volume) = section.duck_target_volume {
            config.duck_target_volume = volume.clamp(0.0, 1.0);
        }
        if let Some(style) = section.transition_style {
            config.transition_style = style;
        }
        config.overlap_percentage = section.overlap_percentage.map(|f| f.clamp(0.0, 1.0));
        config.ducking_enabled = section.ducking_enabled;
        config.duck_fade_duration = section.duck_fade_duration.max(0.0);
        config
    }
}

fn clamp_tempo(tempo: f64) -> f64 {
    tempo.clamp(TEMPO_RANGE.0, TEMPO_RANGE.1)
}
