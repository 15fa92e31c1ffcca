//! Configuration module for agri-forecast.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for severity breakpoints
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use agri_forecast::config::{AppConfig, ConfigPreset};
//!
//! let config = AppConfig::default();
//! let config = AppConfig::from_preset(ConfigPreset::EarlyWarning);
//! let config = AppConfig::builder()
//!     .model_dir("/srv/models")
//!     .flood_thresholds(0.75, 0.45)
//!     .build();
//!
//! use agri_forecast::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.agri-forecast.yaml` file in the working directory or
//! `~/.config/agri-forecast/`:
//!
//! ```yaml
//! models:
//!   model_dir: /var/lib/agri-forecast/models
//! drought:
//!   high: 0.65
//! price:
//!   seed: 42
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_DAYS_AHEAD, DEFAULT_HISTORY_POINTS, DEFAULT_ITERATIONS,
    DEFAULT_LEARNING_RATE, DEFAULT_MODEL_DIR, MAX_HORIZON_DAYS,
};
pub use types::{
    AppConfig, AppConfigBuilder, HazardConfig, ModelsConfig, OutputConfig, PriceConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, user_config_dir, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.agri-forecast.yaml`.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
