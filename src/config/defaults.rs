//! Default values and presets for agri-forecast.

use super::types::{AppConfig, HazardConfig};

// ============================================================================
// Default Values
// ============================================================================

/// Directory probed for trained model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Gradient descent step size.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// Gradient descent iterations per fit.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Price forecast horizon in days.
pub const DEFAULT_DAYS_AHEAD: u32 = 30;

/// Longest validity window or forecast horizon accepted, in days.
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// One year of daily synthetic history.
pub const DEFAULT_HISTORY_POINTS: usize = 365;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Built-in breakpoints
    Default,
    /// Lower breakpoints: more regions reach medium and high
    EarlyWarning,
    /// Higher breakpoints: only strong signals are escalated
    Conservative,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::EarlyWarning => "early-warning",
            Self::Conservative => "conservative",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "standard" => Some(Self::Default),
            "early-warning" | "early" | "sensitive" => Some(Self::EarlyWarning),
            "conservative" | "strict" => Some(Self::Conservative),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Built-in flood and drought breakpoints",
            Self::EarlyWarning => "Escalate earlier, for preparedness planning",
            Self::Conservative => "Escalate only on strong signals, for alert fatigue",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::EarlyWarning, Self::Conservative]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let (flood, drought) = match preset {
            ConfigPreset::Default => return Self::default(),
            ConfigPreset::EarlyWarning => ((0.6, 0.3), (0.5, 0.3)),
            ConfigPreset::Conservative => ((0.8, 0.5), (0.7, 0.5)),
        };
        Self {
            flood: HazardConfig {
                high: Some(flood.0),
                medium: Some(flood.1),
                horizon_days: None,
            },
            drought: HazardConfig {
                high: Some(drought.0),
                medium: Some(drought.1),
                horizon_days: None,
            },
            ..Self::default()
        }
    }
}
