//! Flood risk scorer.

use super::{ConfidenceSteps, HazardScorer, SeverityThresholds, Transform, WeightedTerm};
use crate::model::HazardType;

/// Canonical flood terms. Heavy recent rain dominates; low, flat ground
/// near a river adds to it.
const FLOOD_TERMS: [WeightedTerm; 8] = [
    WeightedTerm::new("rainfall24h", 0.0, Transform::CappedRatio(100.0), 0.30),
    WeightedTerm::new("rainfall7d", 0.0, Transform::CappedRatio(300.0), 0.20),
    WeightedTerm::new("elevation", 200.0, Transform::InverseCappedRatio(500.0), 0.15),
    WeightedTerm::new("slope", 5.0, Transform::InverseCappedRatio(10.0), 0.10),
    WeightedTerm::new("riverDistance", 5000.0, Transform::InverseCappedRatio(2000.0), 0.10),
    WeightedTerm::new("drainageDensity", 2.0, Transform::CappedRatio(5.0), 0.05),
    // Clay (soil type 1) holds water
    WeightedTerm::new("soilType", 2.0, Transform::Indicator(1.0), 0.05),
    WeightedTerm::new("ndvi", 0.6, Transform::Complement(1.0), 0.05),
];

const FLOOD_INFORMATIONAL_DEFAULTS: [(&str, f64); 5] = [
    ("rainfall30d", 100.0),
    ("temperature", 25.0),
    ("humidity", 60.0),
    ("pressure", 1013.0),
    ("landCover", 3.0),
];

const FLOOD_FEATURES: [&str; 13] = [
    "rainfall_24h",
    "rainfall_7d",
    "rainfall_30d",
    "temperature",
    "humidity",
    "pressure",
    "elevation",
    "slope",
    "soil_type",
    "river_distance",
    "drainage_density",
    "ndvi",
    "land_cover",
];

#[derive(Debug, Clone)]
pub struct FloodScorer {
    thresholds: SeverityThresholds,
}

impl FloodScorer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thresholds: SeverityThresholds::FLOOD,
        }
    }

    /// Override the severity breakpoints.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: SeverityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for FloodScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl HazardScorer for FloodScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Flood
    }

    fn terms(&self) -> &[WeightedTerm] {
        &FLOOD_TERMS
    }

    fn thresholds(&self) -> SeverityThresholds {
        self.thresholds
    }

    fn confidence_steps(&self) -> ConfidenceSteps {
        ConfidenceSteps::FLOOD
    }

    fn features(&self) -> &[&'static str] {
        &FLOOD_FEATURES
    }

    fn informational_defaults(&self) -> &[(&'static str, f64)] {
        &FLOOD_INFORMATIONAL_DEFAULTS
    }
}
