//! Prediction records and the envelope types they carry.

use super::FeatureVector;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Accuracy above which an attached validation marks a record as confirmed.
pub const VALIDATION_ACCURACY_THRESHOLD: f64 = 0.7;

/// Prediction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Flood,
    Drought,
    Crop,
    Price,
}

impl HazardType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Drought => "drought",
            Self::Crop => "crop",
            Self::Price => "price",
        }
    }

    /// Parse a hazard from its name; accepts a few request spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "flood" | "floods" => Some(Self::Flood),
            "drought" | "droughts" => Some(Self::Drought),
            "crop" | "crops" => Some(Self::Crop),
            "price" | "prices" => Some(Self::Price),
            _ => None,
        }
    }

    /// Fixed validity window in days, `None` when the caller chooses it.
    #[must_use]
    pub const fn horizon_days(&self) -> Option<i64> {
        match self {
            Self::Flood => Some(7),
            Self::Drought => Some(30),
            Self::Crop => Some(90),
            Self::Price => None,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Flood, Self::Drought, Self::Crop, Self::Price]
    }
}

impl std::fmt::Display for HazardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete severity label, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validity window of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Timeframe {
    /// Window from `now` to `now + days`.
    ///
    /// Negative spans count as zero. An end past the representable range
    /// saturates at [`DateTime::<Utc>::MAX_UTC`].
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>, days: i64) -> Self {
        let end_date = Duration::try_days(days.max(0))
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            start_date: now,
            end_date,
        }
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_date && at <= self.end_date
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Static description of the model that produced a prediction.
///
/// `accuracy` is a fixed figure for display, not an evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub version: String,
    pub algorithm: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// One recommended crop.
///
/// Several crops can be recommended at once; suitabilities do not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop: String,
    pub suitability: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Unchanged,
}

impl ChangeDirection {
    #[must_use]
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Increase
        } else if delta < 0.0 {
            Self::Decrease
        } else {
            Self::Unchanged
        }
    }
}

/// Scalar price forecast for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceForecast {
    pub crop: String,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Absolute change; the sign lives in `change_direction`
    pub change: f64,
    pub change_direction: ChangeDirection,
    pub confidence: f64,
    pub factors: Vec<String>,
}

/// Type-specific payload of a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PredictionOutcome {
    Risk { probability: f64, severity: Severity },
    Crops { recommendations: Vec<CropRecommendation> },
    Price(PriceForecast),
}

impl PredictionOutcome {
    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        match self {
            Self::Risk { severity, .. } => Some(*severity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Active,
    Expired,
    Validated,
    Invalidated,
}

/// Ground truth attached after the fact. Reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub actual_value: serde_json::Value,
    pub accuracy: f64,
    pub validated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<String>,
}

/// A persisted prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub hazard: HazardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub prediction: PredictionOutcome,
    pub confidence: f64,
    pub timeframe: Timeframe,
    pub model_info: ModelInfo,
    pub input_data: FeatureVector,
    pub status: PredictionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Create an active record with a fresh id.
    #[must_use]
    pub fn new(
        hazard: HazardType,
        prediction: PredictionOutcome,
        confidence: f64,
        timeframe: Timeframe,
        model_info: ModelInfo,
        input_data: FeatureVector,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            hazard,
            location: None,
            prediction,
            confidence,
            timeframe,
            model_info,
            input_data,
            status: PredictionStatus::Active,
            validation: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        self.prediction.severity()
    }

    /// Attach an observed outcome.
    ///
    /// The record becomes `Validated` when `accuracy` exceeds
    /// [`VALIDATION_ACCURACY_THRESHOLD`] and `Invalidated` otherwise. The
    /// original prediction, confidence and inputs are left untouched.
    pub fn validate(
        &mut self,
        actual_value: serde_json::Value,
        accuracy: f64,
        validated_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(ForecastError::validation(format!(
                "accuracy must be between 0.0 and 1.0, got {accuracy}"
            )));
        }

        self.validation = Some(Validation {
            actual_value,
            accuracy,
            validated_at: now,
            validated_by,
        });
        self.status = if accuracy > VALIDATION_ACCURACY_THRESHOLD {
            PredictionStatus::Validated
        } else {
            PredictionStatus::Invalidated
        };
        Ok(())
    }

    /// Mark an active record as expired once its window has passed.
    ///
    /// Returns true when the status changed.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == PredictionStatus::Active && self.timeframe.is_expired(now) {
            self.status = PredictionStatus::Expired;
            return true;
        }
        false
    }
}
