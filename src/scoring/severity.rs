//! Score bucketing: severity labels and heuristic confidence.

use crate::model::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Breakpoints mapping a score onto a [`Severity`].
///
/// `score > high` is high, `score > medium` is medium, anything else low.
/// Both comparisons are strict, so a score exactly on a breakpoint falls
/// into the lower band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityThresholds {
    pub high: f64,
    pub medium: f64,
}

impl SeverityThresholds {
    pub const FLOOD: Self = Self {
        high: 0.7,
        medium: 0.4,
    };

    pub const DROUGHT: Self = Self {
        high: 0.6,
        medium: 0.4,
    };

    #[must_use]
    pub fn classify(&self, score: f64) -> Severity {
        if score > self.high {
            Severity::High
        } else if score > self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Breakpoints must be ordered and inside `[0, 1]`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.medium)
            && (0.0..=1.0).contains(&self.high)
            && self.medium < self.high
    }
}

/// Step function from score to confidence.
///
/// Not a statistical interval; a fixed figure per band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSteps {
    pub high_above: f64,
    pub high: f64,
    pub medium_above: f64,
    pub medium: f64,
    pub floor: f64,
}

impl ConfidenceSteps {
    pub const FLOOD: Self = Self {
        high_above: 0.7,
        high: 0.9,
        medium_above: 0.4,
        medium: 0.75,
        floor: 0.6,
    };

    pub const DROUGHT: Self = Self {
        high_above: 0.7,
        high: 0.9,
        medium_above: 0.3,
        medium: 0.75,
        floor: 0.6,
    };

    #[must_use]
    pub fn confidence(&self, score: f64) -> f64 {
        if score > self.high_above {
            self.high
        } else if score > self.medium_above {
            self.medium
        } else {
            self.floor
        }
    }
}
