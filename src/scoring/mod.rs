//! Hazard risk scoring.
//!
//! A scorer is a fixed table of [`WeightedTerm`]s. The risk probability is
//! the weighted sum of the normalized terms, clamped to `[0, 1]` once at the
//! end, then bucketed into a [`Severity`] and paired with a step-function
//! confidence.
//!
//! Global invariants enforced:
//! - Scoring is pure: no clocks, no randomness, no shared state
//! - The final probability is always inside `[0, 1]`, including for
//!   non-finite inputs
//! - For a fixed scorer, a higher probability never yields a lower severity
//!
//! # Usage
//!
//! ```
//! use agri_forecast::model::{FeatureVector, Severity};
//! use agri_forecast::scoring::{FloodScorer, HazardScorer};
//!
//! let input = FeatureVector::from_pairs([
//!     ("rainfall24h", 150.0),
//!     ("rainfall7d", 300.0),
//!     ("elevation", 50.0),
//!     ("slope", 2.0),
//!     ("riverDistance", 200.0),
//! ]);
//! let assessment = FloodScorer::default().assess(&input);
//! assert_eq!(assessment.severity, Severity::High);
//! ```

mod drought;
mod flood;
mod normalize;
mod severity;

pub use drought::DroughtScorer;
pub use flood::FloodScorer;
pub use normalize::{Transform, WeightedTerm};
pub use severity::{ConfidenceSteps, SeverityThresholds};

use crate::model::{FeatureVector, HazardType, Severity};
use serde::{Deserialize, Serialize};

/// Clamp a raw weighted sum into `[0, 1]`.
///
/// NaN maps to 0 so a malformed input still yields a usable score.
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Weighted contribution of one term, kept for explanation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermContribution {
    pub feature: String,
    pub value: f64,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Result of scoring one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Sum of contributions before clamping
    pub raw_score: f64,
    /// Clamped score in `[0, 1]`
    pub probability: f64,
    pub severity: Severity,
    pub confidence: f64,
    pub contributions: Vec<TermContribution>,
}

/// A weighted-sum hazard scorer.
///
/// Implementors only describe their tables; [`HazardScorer::assess`] does
/// the arithmetic the same way for every hazard.
pub trait HazardScorer: Send + Sync {
    fn hazard(&self) -> HazardType;

    /// The weighted terms, in evaluation order
    fn terms(&self) -> &[WeightedTerm];

    fn thresholds(&self) -> SeverityThresholds;

    fn confidence_steps(&self) -> ConfidenceSteps;

    /// Feature names advertised in model metadata
    fn features(&self) -> &[&'static str];

    /// Inputs that are recorded with a prediction but not scored
    fn informational_defaults(&self) -> &[(&'static str, f64)] {
        &[]
    }

    /// Every default this scorer knows, scored terms first.
    fn input_defaults(&self) -> Vec<(&'static str, f64)> {
        self.terms()
            .iter()
            .map(|t| (t.feature, t.default))
            .chain(self.informational_defaults().iter().copied())
            .collect()
    }

    /// Score `input`.
    fn assess(&self, input: &FeatureVector) -> RiskAssessment {
        let contributions: Vec<TermContribution> = self
            .terms()
            .iter()
            .map(|term| {
                let value = input.value_or(term.feature, term.default);
                let normalized = term.transform.apply(value);
                TermContribution {
                    feature: term.feature.to_string(),
                    value,
                    normalized,
                    weight: term.weight,
                    contribution: normalized * term.weight,
                }
            })
            .collect();

        let raw_score: f64 = contributions.iter().map(|c| c.contribution).sum();
        let probability = clamp_score(raw_score);

        RiskAssessment {
            raw_score,
            probability,
            severity: self.thresholds().classify(probability),
            confidence: self.confidence_steps().confidence(probability),
            contributions,
        }
    }

    /// Sum of all term weights.
    fn total_weight(&self) -> f64 {
        self.terms().iter().map(|t| t.weight).sum()
    }
}
