//! Data model shared by the scorers, the service and the CLI.
//!
//! A [`FeatureVector`] goes in, a [`PredictionRecord`] comes out. Records are
//! plain serde types so callers can persist them wherever they like.

mod features;
mod prediction;

pub use features::FeatureVector;
pub use prediction::{
    ChangeDirection, Coordinates, CropRecommendation, HazardType, Location, ModelInfo,
    PredictionOutcome, PredictionRecord, PredictionStatus, PriceForecast, Severity, Timeframe,
    Validation, VALIDATION_ACCURACY_THRESHOLD,
};
