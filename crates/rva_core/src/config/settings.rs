//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be updated independently.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{DuckingCurve, TransitionStyle};

/// Root settings structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Strategy preset and overrides.
    #[serde(default)]
    pub strategy: StrategySettings,

    /// Asset placement rules.
    #[serde(default)]
    pub placement: PlacementSettings,

    /// Timeline validation.
    #[serde(default)]
    pub validation: ValidationSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Strategy preset plus optional per-field overrides.
///
/// Unset overrides fall back to the preset's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Preset name (`action_packed`, `storytelling`, `educational`, `dramatic`).
    /// Unset keeps narration at tempo 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ducking_curve: Option<DuckingCurve>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_target_volume: Option<f64>,

    /// Fixed overlap fraction of each clip; unset uses the duration buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlap_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_style: Option<TransitionStyle>,

    /// Duck clip audio under the following narration.
    #[serde(default = "default_true")]
    pub ducking_enabled: bool,

    /// Fade length into and out of a duck window, in seconds.
    #[serde(default = "default_duck_fade")]
    pub duck_fade_duration: f64,

    /// Adjust the strategy to the available assets before building.
    #[serde(default = "default_true")]
    pub adapt_to_assets: bool,
}

fn default_true() -> bool {
    true
}

fn default_duck_fade() -> f64 {
    0.5
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            preset: None,
            tempo: None,
            image_duration: None,
            ducking_curve: None,
            duck_target_volume: None,
            overlap_percentage: None,
            transition_style: None,
            ducking_enabled: true,
            duck_fade_duration: default_duck_fade(),
            adapt_to_assets: true,
        }
    }
}

/// Placement rules for overlays and sound effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Reserved intro window for the post screenshot, in seconds.
    #[serde(default = "default_intro_duration")]
    pub intro_duration: f64,

    /// Display length of keyword-triggered overlays.
    #[serde(default = "default_keyword_display")]
    pub keyword_display: f64,

    /// How far ahead of the spoken keyword an overlay appears.
    #[serde(default = "default_keyword_lead")]
    pub keyword_lead: f64,

    /// Minimum uncovered span that counts as a gap.
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,

    /// Maximum display length of a gap filler.
    #[serde(default = "default_gap_fill_max")]
    pub gap_fill_max: f64,

    /// Minimum beat spacing as a fraction of the image duration.
    #[serde(default = "default_beat_spacing")]
    pub beat_spacing_factor: f64,

    #[serde(default = "default_true")]
    pub beat_sync: bool,

    #[serde(default = "default_true")]
    pub keyword_triggers: bool,

    #[serde(default = "default_true")]
    pub fill_gaps: bool,

    #[serde(default = "default_true")]
    pub sound_effects: bool,

    /// Volume of the sfx at each inserted clip.
    #[serde(default = "default_sfx_volume")]
    pub sfx_volume: f64,

    /// Volume of the whoosh on beat images.
    #[serde(default = "default_whoosh_volume")]
    pub whoosh_volume: f64,
}

fn default_intro_duration() -> f64 {
    5.0
}

fn default_keyword_display() -> f64 {
    4.0
}

fn default_keyword_lead() -> f64 {
    0.5
}

fn default_min_gap() -> f64 {
    2.0
}

fn default_gap_fill_max() -> f64 {
    3.0
}

fn default_beat_spacing() -> f64 {
    0.8
}

fn default_sfx_volume() -> f64 {
    0.7
}

fn default_whoosh_volume() -> f64 {
    0.5
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            intro_duration: default_intro_duration(),
            keyword_display: default_keyword_display(),
            keyword_lead: default_keyword_lead(),
            min_gap: default_min_gap(),
            gap_fill_max: default_gap_fill_max(),
            beat_spacing_factor: default_beat_spacing(),
            beat_sync: true,
            keyword_triggers: true,
            fill_gaps: true,
            sound_effects: true,
            sfx_volume: default_sfx_volume(),
            whoosh_volume: default_whoosh_volume(),
        }
    }
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Trimmed layers shorter than this are dropped, in seconds.
    #[serde(default = "default_min_layer")]
    pub min_layer_duration: f64,

    /// Fail the run if exclusive tracks still overlap after validation.
    #[serde(default = "default_true")]
    pub strict: bool,
}

fn default_min_layer() -> f64 {
    1.0
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_layer_duration: default_min_layer(),
            strict: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,

    /// Keep per-layer detail lines out of the main log.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of detail lines kept for failure diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Write a per-run log file.
    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_error_tail() -> u32 {
    20
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            error_tail: default_error_tail(),
            log_to_file: false,
            logs_folder: default_logs_folder(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Strategy,
    Placement,
    Validation,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Strategy,
        ConfigSection::Placement,
        ConfigSection::Validation,
        ConfigSection::Logging,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Strategy => "strategy",
            ConfigSection::Placement => "placement",
            ConfigSection::Validation => "validation",
            ConfigSection::Logging => "logging",
        }
    }

    /// Header comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Strategy => "# Editing strategy: preset name plus optional overrides",
            ConfigSection::Placement => "# Overlay and sound-effect placement rules",
            ConfigSection::Validation => "# Timeline validation",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}
