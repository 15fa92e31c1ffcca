//! Rule-based crop recommendation.
//!
//! Each [`CropRule`] is an independent range predicate over one feature.
//! Every satisfied rule appends its crop; nothing is normalized across
//! crops, so suitabilities overlap and need not sum to one.

mod rules;

pub use rules::{
    crop_reasons, CropRule, FeatureRange, CROP_FEATURES, CROP_REQUEST_DEFAULTS, CROP_RULES,
    SUPPORTED_CROPS,
};

use crate::model::{CropRecommendation, FeatureVector};

/// Evaluates a rule table against a feature vector.
#[derive(Debug, Clone)]
pub struct CropRecommender {
    rules: Vec<CropRule>,
    with_reasons: bool,
}

impl CropRecommender {
    /// Recommender over the canonical rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(CROP_RULES.to_vec())
    }

    #[must_use]
    pub fn with_rules(rules: Vec<CropRule>) -> Self {
        Self {
            rules,
            with_reasons: true,
        }
    }

    /// Skip reason generation (bare `(crop, probability, confidence)` tuples).
    #[must_use]
    pub const fn without_reasons(mut self) -> Self {
        self.with_reasons = false;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[CropRule] {
        &self.rules
    }

    /// Every crop whose rule matches, sorted by descending confidence.
    ///
    /// Missing features never match. The sort is stable, so rules with equal
    /// confidence keep table order.
    #[must_use]
    pub fn recommend(&self, input: &FeatureVector) -> Vec<CropRecommendation> {
        let reasons = if self.with_reasons {
            crop_reasons(input)
        } else {
            Vec::new()
        };

        let mut recommendations: Vec<CropRecommendation> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(input))
            .map(|rule| CropRecommendation {
                crop: rule.crop.to_string(),
                suitability: rule.probability,
                confidence: rule.confidence,
                reasons: reasons.clone(),
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(
            matched = recommendations.len(),
            rules = self.rules.len(),
            "evaluated crop rules"
        );
        recommendations
    }
}

impl Default for CropRecommender {
    fn default() -> Self {
        Self::new()
    }
}
