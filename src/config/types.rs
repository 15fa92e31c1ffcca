//! Configuration types for agri-forecast.

use crate::pipeline::OutputFormat;
use crate::scoring::SeverityThresholds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_DAYS_AHEAD, DEFAULT_HISTORY_POINTS, DEFAULT_ITERATIONS, DEFAULT_LEARNING_RATE,
    DEFAULT_MODEL_DIR,
};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration loaded from a config file and CLI args.
///
/// Every section is optional in the file; missing values fall back to the
/// built-in defaults, and CLI arguments override the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Model artifact location
    pub models: ModelsConfig,
    /// Flood severity breakpoints and validity window
    pub flood: HazardConfig,
    /// Drought severity breakpoints and validity window
    pub drought: HazardConfig,
    /// Price regression and forecast settings
    pub price: PriceConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Effective flood thresholds after overrides.
    #[must_use]
    pub fn flood_thresholds(&self) -> SeverityThresholds {
        self.flood.thresholds_over(SeverityThresholds::FLOOD)
    }

    /// Effective drought thresholds after overrides.
    #[must_use]
    pub fn drought_thresholds(&self) -> SeverityThresholds {
        self.drought.thresholds_over(SeverityThresholds::DROUGHT)
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the model artifact directory.
    pub fn model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.models.model_dir = dir.into();
        self
    }

    /// Override the flood severity breakpoints.
    pub const fn flood_thresholds(mut self, high: f64, medium: f64) -> Self {
        self.config.flood.high = Some(high);
        self.config.flood.medium = Some(medium);
        self
    }

    /// Override the drought severity breakpoints.
    pub const fn drought_thresholds(mut self, high: f64, medium: f64) -> Self {
        self.config.drought.high = Some(high);
        self.config.drought.medium = Some(medium);
        self
    }

    /// Seed the random source used by the price heuristic.
    pub const fn price_seed(mut self, seed: Option<u64>) -> Self {
        self.config.price.seed = seed;
        self
    }

    /// Set the gradient descent parameters.
    pub const fn solver(mut self, learning_rate: f64, iterations: usize) -> Self {
        self.config.price.learning_rate = learning_rate;
        self.config.price.iterations = iterations;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Where trained model artifacts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory probed for `<hazard>_model.json` artifacts
    pub model_dir: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

/// Per-hazard overrides. Unset values keep the built-in figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HazardConfig {
    /// Probability above which severity is high (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    /// Probability above which severity is medium (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,
    /// Validity window of a prediction, in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizon_days: Option<i64>,
}

impl HazardConfig {
    /// Apply the overrides on top of `base`.
    #[must_use]
    pub fn thresholds_over(&self, base: SeverityThresholds) -> SeverityThresholds {
        SeverityThresholds {
            high: self.high.unwrap_or(base.high),
            medium: self.medium.unwrap_or(base.medium),
        }
    }

    #[must_use]
    pub const fn horizon_or(&self, default: i64) -> i64 {
        match self.horizon_days {
            Some(days) => days,
            None => default,
        }
    }
}

/// Price forecast settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PriceConfig {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Gradient descent iterations per fit
    pub iterations: usize,
    /// Forecast horizon when the caller gives none
    pub default_days_ahead: u32,
    /// Length of the synthetic series used to train without recorded history
    pub history_points: usize,
    /// Seed for the trend heuristic and synthetic history (unseeded if absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            iterations: DEFAULT_ITERATIONS,
            default_days_ahead: DEFAULT_DAYS_AHEAD,
            history_points: DEFAULT_HISTORY_POINTS,
            seed: None,
        }
    }
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}
