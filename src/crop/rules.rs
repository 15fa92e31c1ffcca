//! The crop rule table and the reason predicates.

use crate::model::FeatureVector;
use serde::{Deserialize, Serialize};

/// Inclusive bounds on a feature value; an absent bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        !value.is_nan()
            && self.min.map_or(true, |m| value >= m)
            && self.max.map_or(true, |m| value <= m)
    }
}

/// One range predicate that recommends a crop when satisfied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRule {
    pub crop: &'static str,
    pub feature: &'static str,
    pub range: FeatureRange,
    pub probability: f64,
    pub confidence: f64,
}

impl CropRule {
    /// True when the feature is present and inside the range.
    #[must_use]
    pub fn matches(&self, input: &FeatureVector) -> bool {
        input
            .get(self.feature)
            .is_some_and(|v| self.range.contains(v))
    }
}

/// Canonical rule table, in evaluation order.
pub const CROP_RULES: [CropRule; 4] = [
    CropRule {
        crop: "maize",
        feature: "ph",
        range: FeatureRange::between(5.5, 7.0),
        probability: 0.85,
        confidence: 0.8,
    },
    CropRule {
        crop: "sorghum",
        feature: "ph",
        range: FeatureRange::between(5.5, 7.0),
        probability: 0.78,
        confidence: 0.75,
    },
    CropRule {
        crop: "cassava",
        feature: "rainfall",
        range: FeatureRange::at_least(1000.0),
        probability: 0.9,
        confidence: 0.85,
    },
    CropRule {
        crop: "yam",
        feature: "temperature",
        range: FeatureRange::between(25.0, 30.0),
        probability: 0.82,
        confidence: 0.78,
    },
];

/// Crops the advisory layer knows about, matched or not.
pub const SUPPORTED_CROPS: [&str; 8] = [
    "maize",
    "cassava",
    "yam",
    "cocoa",
    "rice",
    "sorghum",
    "millet",
    "groundnut",
];

pub const CROP_FEATURES: [&str; 7] = [
    "temperature",
    "humidity",
    "ph",
    "rainfall",
    "nitrogen",
    "phosphorus",
    "potassium",
];

/// Values filled in for a crop request when the caller omits them.
pub const CROP_REQUEST_DEFAULTS: [(&str, f64); 7] = [
    ("temperature", 25.0),
    ("humidity", 70.0),
    ("ph", 6.5),
    ("rainfall", 800.0),
    ("nitrogen", 50.0),
    ("phosphorus", 25.0),
    ("potassium", 40.0),
];

const REASON_PREDICATES: [(&str, FeatureRange, &str); 4] = [
    ("temperature", FeatureRange::between(20.0, 30.0), "Optimal temperature range"),
    ("humidity", FeatureRange::between(60.0, 80.0), "Suitable humidity levels"),
    ("ph", FeatureRange::between(6.0, 7.5), "Good soil pH"),
    ("rainfall", FeatureRange::at_least(500.0), "Adequate rainfall"),
];

/// Human-readable reasons shared by every recommendation for `input`.
#[must_use]
pub fn crop_reasons(input: &FeatureVector) -> Vec<String> {
    let reasons: Vec<String> = REASON_PREDICATES
        .iter()
        .filter(|(feature, range, _)| input.get(feature).is_some_and(|v| range.contains(v)))
        .map(|(_, _, reason)| (*reason).to_string())
        .collect();

    if reasons.is_empty() {
        vec!["Based on environmental conditions".to_string()]
    } else {
        reasons
    }
}
