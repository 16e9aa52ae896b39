//! Configuration management.
//!
//! TOML configuration with `[strategy]`, `[placement]`, `[validation]` and
//! `[logging]` sections, atomic writes and section-level updates.
//!
//! # Example
//!
//! ```no_run
//! use rva_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/timeline.toml");
//! config.load_or_create().unwrap();
//!
//! config.settings_mut().strategy.preset = Some("dramatic".to_string());
//! config.update_section(ConfigSection::Strategy).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, PlacementSettings, Settings, StrategySettings,
    ValidationSettings,
};
