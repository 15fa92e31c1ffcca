//! Configuration validation for agri-forecast.

use super::defaults::MAX_HORIZON_DAYS;
use super::types::{AppConfig, HazardConfig, ModelsConfig, OutputConfig, PriceConfig};
use crate::error::{ForecastError, Result};
use crate::scoring::SeverityThresholds;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl AppConfig {
    /// Fail with every validation message when the configuration is invalid.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(ForecastError::config(messages.join("; ")))
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.models.validate());
        errors.extend(validate_hazard("flood", &self.flood, SeverityThresholds::FLOOD));
        errors.extend(validate_hazard("drought", &self.drought, SeverityThresholds::DROUGHT));
        errors.extend(self.price.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ModelsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.model_dir.as_os_str().is_empty() {
            return vec![ConfigError::new("models.model_dir", "Model directory must not be empty")];
        }
        Vec::new()
    }
}

fn validate_hazard(
    section: &str,
    hazard: &HazardConfig,
    base: SeverityThresholds,
) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for (name, value) in [("high", hazard.high), ("medium", hazard.medium)] {
        if let Some(v) = value {
            if !(0.0..=1.0).contains(&v) {
                errors.push(ConfigError::new(
                    format!("{section}.{name}"),
                    format!("Threshold must be between 0.0 and 1.0, got {v}"),
                ));
            }
        }
    }

    let effective = hazard.thresholds_over(base);
    if effective.medium >= effective.high {
        errors.push(ConfigError::new(
            format!("{section}.medium"),
            format!(
                "Medium threshold ({}) must be below high threshold ({})",
                effective.medium, effective.high
            ),
        ));
    }

    if let Some(days) = hazard.horizon_days {
        if days <= 0 || days > i64::from(MAX_HORIZON_DAYS) {
            errors.push(ConfigError::new(
                format!("{section}.horizon_days"),
                format!("Horizon must be between 1 and {MAX_HORIZON_DAYS} days, got {days}"),
            ));
        }
    }

    errors
}

impl Validatable for PriceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            errors.push(ConfigError::new(
                "price.learning_rate",
                format!("Learning rate must be positive, got {}", self.learning_rate),
            ));
        }
        if self.iterations == 0 {
            errors.push(ConfigError::new("price.iterations", "Iterations must be greater than 0"));
        }
        if self.default_days_ahead == 0 || self.default_days_ahead > MAX_HORIZON_DAYS {
            errors.push(ConfigError::new(
                "price.default_days_ahead",
                format!(
                    "Forecast horizon must be between 1 and {MAX_HORIZON_DAYS} days, got {}",
                    self.default_days_ahead
                ),
            ));
        }
        if self.history_points < 2 {
            errors.push(ConfigError::new(
                "price.history_points",
                format!("At least 2 history points are needed, got {}", self.history_points),
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }
        errors
    }
}
