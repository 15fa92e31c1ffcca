//! Drought risk scorer.

use super::{ConfidenceSteps, HazardScorer, SeverityThresholds, Transform, WeightedTerm};
use crate::model::HazardType;

const DROUGHT_TERMS: [WeightedTerm; 11] = [
    // Heat
    WeightedTerm::new(
        "temperatureAvg",
        25.0,
        Transform::Excess {
            base: 30.0,
            span: 15.0,
        },
        0.20,
    ),
    WeightedTerm::new(
        "temperatureMax",
        35.0,
        Transform::Excess {
            base: 40.0,
            span: 10.0,
        },
        0.10,
    ),
    // Rain deficit over three windows
    WeightedTerm::new("rainfall30d", 50.0, Transform::InverseCappedRatio(100.0), 0.20),
    WeightedTerm::new("rainfall60d", 120.0, Transform::InverseCappedRatio(200.0), 0.15),
    WeightedTerm::new("rainfall90d", 200.0, Transform::InverseCappedRatio(300.0), 0.10),
    // Air and evaporation
    WeightedTerm::new("humidity", 60.0, Transform::Complement(100.0), 0.05),
    WeightedTerm::new("evapotranspiration", 5.0, Transform::Ratio(10.0), 0.05),
    // Soil and groundwater
    WeightedTerm::new("soilMoisture", 40.0, Transform::Complement(60.0), 0.10),
    WeightedTerm::new("groundwaterLevel", 20.0, Transform::Complement(50.0), 0.05),
    // Vegetation
    WeightedTerm::new("ndvi", 0.4, Transform::Complement(1.0), 0.05),
    WeightedTerm::new("vhi", 0.5, Transform::Complement(1.0), 0.05),
];

const DROUGHT_INFORMATIONAL_DEFAULTS: [(&str, f64); 3] = [
    ("temperatureMin", 18.0),
    ("season", 1.0),
    ("elevation", 300.0),
];

const DROUGHT_FEATURES: [&str; 14] = [
    "temperature_avg",
    "temperature_max",
    "temperature_min",
    "rainfall_30d",
    "rainfall_60d",
    "rainfall_90d",
    "humidity",
    "evapotranspiration",
    "soil_moisture",
    "groundwater_level",
    "ndvi",
    "vegetation_health_index",
    "season",
    "elevation",
];

#[derive(Debug, Clone)]
pub struct DroughtScorer {
    thresholds: SeverityThresholds,
}

impl DroughtScorer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thresholds: SeverityThresholds::DROUGHT,
        }
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: SeverityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for DroughtScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl HazardScorer for DroughtScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Drought
    }

    fn terms(&self) -> &[WeightedTerm] {
        &DROUGHT_TERMS
    }

    fn thresholds(&self) -> SeverityThresholds {
        self.thresholds
    }

    fn confidence_steps(&self) -> ConfidenceSteps {
        ConfidenceSteps::DROUGHT
    }

    fn features(&self) -> &[&'static str] {
        &DROUGHT_FEATURES
    }

    fn informational_defaults(&self) -> &[(&'static str, f64)] {
        &DROUGHT_INFORMATIONAL_DEFAULTS
    }
}
