//! The forecast service: scorers, recommender and price models behind one
//! explicitly constructed value.
//!
//! The service is built once from an [`AppConfig`] and passed by reference.
//! Model artifacts are probed during construction only; predictions never
//! touch the filesystem. The clock and (for the price heuristic) the random
//! source are supplied by the caller, so every envelope is reproducible in
//! tests.

mod artifact;

pub use artifact::{ModelArtifact, ModelMode, WEIGHTED_SUM_RULES};

use crate::config::AppConfig;
use crate::crop::{CropRecommender, CROP_FEATURES, CROP_REQUEST_DEFAULTS};
use crate::error::{ErrorContext, ForecastError, ModelErrorKind, Result};
use crate::model::{
    FeatureVector, HazardType, ModelInfo, PredictionOutcome, PredictionRecord, Timeframe,
};
use crate::price::{
    synthetic_history, GradientDescent, PriceInputs, PriceModelRegistry, PriceModelSummary,
    PricePoint, RegressionKind, TrendHeuristic, PRICE_FEATURES,
};
use crate::scoring::{DroughtScorer, FloodScorer, HazardScorer, RiskAssessment};
use artifact::{probe, ProbedModel};
use chrono::{DateTime, Utc};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MODEL_VERSION: &str = "1.0";
const RISK_ALGORITHM: &str = "Weighted Risk Scoring";
const CROP_ALGORITHM: &str = "Rule-Based Classification";
const TREND_ALGORITHM: &str = "Supply-Demand Trend";

const FLOOD_ACCURACY: f64 = 0.85;
const DROUGHT_ACCURACY: f64 = 0.82;
const CROP_ACCURACY: f64 = 0.78;

/// Confidence reported for a crop request that matched no rule.
const EMPTY_CROP_CONFIDENCE: f64 = 0.7;

/// Mode and reported metadata of one hazard model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatus {
    pub hazard: HazardType,
    pub mode: ModelMode,
    pub version: String,
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
}

/// Snapshot returned by [`ForecastService::status`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub model_dir: PathBuf,
    pub models: Vec<ModelStatus>,
    pub price_models: Vec<PriceModelSummary>,
}

/// Builds prediction envelopes from the scoring components.
#[derive(Debug, Clone)]
pub struct ForecastService {
    flood: FloodScorer,
    drought: DroughtScorer,
    crops: CropRecommender,
    trend: TrendHeuristic,
    prices: PriceModelRegistry,
    flood_model: ProbedModel,
    drought_model: ProbedModel,
    flood_horizon: i64,
    drought_horizon: i64,
    history_points: usize,
    model_dir: PathBuf,
}

impl ForecastService {
    /// Build the service, probing `config.models.model_dir` for artifacts.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let model_dir = config.models.model_dir.clone();
        let flood_model = probe(&model_dir, HazardType::Flood);
        let drought_model = probe(&model_dir, HazardType::Drought);

        tracing::info!(
            flood = %flood_model.mode,
            drought = %drought_model.mode,
            "forecast service initialized"
        );

        Self {
            flood: FloodScorer::new().with_thresholds(config.flood_thresholds()),
            drought: DroughtScorer::new().with_thresholds(config.drought_thresholds()),
            crops: CropRecommender::new(),
            trend: TrendHeuristic,
            prices: PriceModelRegistry::new(GradientDescent {
                learning_rate: config.price.learning_rate,
                iterations: config.price.iterations,
            }),
            flood_model,
            drought_model,
            flood_horizon: config.flood.horizon_or(7),
            drought_horizon: config.drought.horizon_or(30),
            history_points: config.price.history_points,
            model_dir,
        }
    }

    /// Rebuild with artifacts probed from `dir` instead of the configured one.
    #[must_use]
    pub fn with_artifacts(mut self, dir: &Path) -> Self {
        self.flood_model = probe(dir, HazardType::Flood);
        self.drought_model = probe(dir, HazardType::Drought);
        self.model_dir = dir.to_path_buf();
        self
    }

    #[must_use]
    pub fn mode(&self, hazard: HazardType) -> ModelMode {
        match hazard {
            HazardType::Flood => self.flood_model.mode,
            HazardType::Drought => self.drought_model.mode,
            HazardType::Crop | HazardType::Price => ModelMode::RuleBased,
        }
    }

    /// The scorer for a risk hazard; `None` for crop and price.
    #[must_use]
    pub fn scorer(&self, hazard: HazardType) -> Option<&dyn HazardScorer> {
        match hazard {
            HazardType::Flood => Some(&self.flood),
            HazardType::Drought => Some(&self.drought),
            HazardType::Crop | HazardType::Price => None,
        }
    }

    fn risk_scorer(&self, hazard: HazardType) -> Result<&dyn HazardScorer> {
        self.scorer(hazard).ok_or_else(|| {
            ForecastError::model(
                "selecting risk scorer",
                ModelErrorKind::UnknownHazard(hazard.to_string()),
            )
        })
    }

    fn risk_model_info(&self, hazard: HazardType, scorer: &dyn HazardScorer) -> ModelInfo {
        let (probed, accuracy) = match hazard {
            HazardType::Drought => (&self.drought_model, DROUGHT_ACCURACY),
            _ => (&self.flood_model, FLOOD_ACCURACY),
        };
        let features = scorer.features().iter().map(ToString::to_string).collect();

        match &probed.artifact {
            Some(artifact) => ModelInfo {
                version: artifact.version.clone(),
                algorithm: artifact.algorithm.clone(),
                features,
                accuracy: Some(artifact.accuracy),
            },
            None => ModelInfo {
                version: MODEL_VERSION.to_string(),
                algorithm: RISK_ALGORITHM.to_string(),
                features,
                accuracy: Some(accuracy),
            },
        }
    }

    fn horizon(&self, hazard: HazardType) -> i64 {
        match hazard {
            HazardType::Flood => self.flood_horizon,
            HazardType::Drought => self.drought_horizon,
            other => other.horizon_days().unwrap_or(30),
        }
    }

    fn predict_risk(
        &self,
        scorer: &dyn HazardScorer,
        input: &FeatureVector,
        now: DateTime<Utc>,
    ) -> PredictionRecord {
        let hazard = scorer.hazard();
        let assessment = scorer.assess(input);

        tracing::debug!(
            %hazard,
            probability = assessment.probability,
            severity = %assessment.severity,
            "risk assessed"
        );

        PredictionRecord::new(
            hazard,
            PredictionOutcome::Risk {
                probability: assessment.probability,
                severity: assessment.severity,
            },
            assessment.confidence,
            Timeframe::starting_at(now, self.horizon(hazard)),
            self.risk_model_info(hazard, scorer),
            input.merged_with_defaults(&scorer.input_defaults()),
            now,
        )
    }

    /// Flood risk for the next week (by default).
    #[must_use]
    pub fn predict_flood(&self, input: &FeatureVector, now: DateTime<Utc>) -> PredictionRecord {
        self.predict_risk(&self.flood, input, now)
    }

    /// Drought risk for the next month (by default).
    #[must_use]
    pub fn predict_drought(&self, input: &FeatureVector, now: DateTime<Utc>) -> PredictionRecord {
        self.predict_risk(&self.drought, input, now)
    }

    /// Risk prediction for `hazard`; errors for non-risk hazards.
    pub fn predict_hazard(
        &self,
        hazard: HazardType,
        input: &FeatureVector,
        now: DateTime<Utc>,
    ) -> Result<PredictionRecord> {
        let scorer = self.risk_scorer(hazard)?;
        Ok(self.predict_risk(scorer, input, now))
    }

    /// Crop recommendations for the next season.
    ///
    /// Request defaults are filled in before the rules run, so an empty
    /// request is judged on the default profile.
    #[must_use]
    pub fn recommend_crops(&self, input: &FeatureVector, now: DateTime<Utc>) -> PredictionRecord {
        let merged = input.merged_with_defaults(&CROP_REQUEST_DEFAULTS);
        let recommendations = self.crops.recommend(&merged);
        let confidence = recommendations
            .first()
            .map_or(EMPTY_CROP_CONFIDENCE, |r| r.confidence);

        PredictionRecord::new(
            HazardType::Crop,
            PredictionOutcome::Crops { recommendations },
            confidence,
            Timeframe::starting_at(now, self.horizon(HazardType::Crop)),
            ModelInfo {
                version: MODEL_VERSION.to_string(),
                algorithm: CROP_ALGORITHM.to_string(),
                features: CROP_FEATURES.iter().map(ToString::to_string).collect(),
                accuracy: Some(CROP_ACCURACY),
            },
            merged,
            now,
        )
    }

    /// Heuristic price forecast using the caller's random source.
    pub fn predict_price<R: Rng + ?Sized>(
        &self,
        crop: &str,
        input: &FeatureVector,
        days_ahead: u32,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> PredictionRecord {
        let forecast = self.trend.forecast(crop, input, rng);
        let confidence = forecast.confidence;

        PredictionRecord::new(
            HazardType::Price,
            PredictionOutcome::Price(forecast),
            confidence,
            Timeframe::starting_at(now, i64::from(days_ahead)),
            Self::price_model_info(TREND_ALGORITHM, confidence),
            PriceInputs::from_features(input).to_features(),
            now,
        )
    }

    /// Price forecast from the fitted regression for `crop`.
    ///
    /// Fails when no model has been trained for `crop`.
    pub fn predict_price_fitted(
        &self,
        crop: &str,
        input: &FeatureVector,
        days_ahead: u32,
        now: DateTime<Utc>,
    ) -> Result<PredictionRecord> {
        let forecast = self.prices.predict(crop, input, days_ahead)?;
        let confidence = forecast.confidence;
        let algorithm = self
            .prices
            .get(crop)
            .map_or(RegressionKind::Linear, |m| m.kind)
            .algorithm();

        Ok(PredictionRecord::new(
            HazardType::Price,
            PredictionOutcome::Price(forecast),
            confidence,
            Timeframe::starting_at(now, i64::from(days_ahead)),
            Self::price_model_info(algorithm, confidence),
            input.clone(),
            now,
        ))
    }

    fn price_model_info(algorithm: &str, confidence: f64) -> ModelInfo {
        ModelInfo {
            version: MODEL_VERSION.to_string(),
            algorithm: algorithm.to_string(),
            features: PRICE_FEATURES.iter().map(ToString::to_string).collect(),
            accuracy: Some(confidence),
        }
    }

    /// Fit (or refit) the regression for `crop` on `history`.
    pub fn train_price_model(
        &mut self,
        crop: &str,
        kind: RegressionKind,
        history: &[PricePoint],
    ) -> Result<PriceModelSummary> {
        let model = self
            .prices
            .train(crop, kind, history)
            .with_context(|| format!("training {crop} price model"))?;
        Ok(PriceModelSummary {
            crop: crop.trim().to_lowercase(),
            kind: model.kind,
            data_points: model.data_points,
            r_squared: model.r_squared,
        })
    }

    /// Fit the regression for `crop` on a synthetic series drawn from `rng`.
    pub fn train_price_model_synthetic<R: Rng + ?Sized>(
        &mut self,
        crop: &str,
        kind: RegressionKind,
        rng: &mut R,
    ) -> Result<PriceModelSummary> {
        let history = synthetic_history(crop, self.history_points, rng);
        self.train_price_model(crop, kind, &history)
    }

    #[must_use]
    pub const fn price_models(&self) -> &PriceModelRegistry {
        &self.prices
    }

    /// Score many vectors for one risk hazard in parallel.
    ///
    /// Output order matches input order.
    pub fn score_batch(
        &self,
        hazard: HazardType,
        inputs: &[FeatureVector],
    ) -> Result<Vec<RiskAssessment>> {
        let scorer = self.risk_scorer(hazard)?;
        let results: Vec<RiskAssessment> = inputs.par_iter().map(|fv| scorer.assess(fv)).collect();
        tracing::debug!(%hazard, count = results.len(), "batch scored");
        Ok(results)
    }

    /// Full prediction records for many inputs, in input order.
    pub fn predict_batch(
        &self,
        hazard: HazardType,
        inputs: &[FeatureVector],
        now: DateTime<Utc>,
    ) -> Result<Vec<PredictionRecord>> {
        match hazard {
            HazardType::Crop => Ok(inputs
                .par_iter()
                .map(|fv| self.recommend_crops(fv, now))
                .collect()),
            HazardType::Flood | HazardType::Drought => {
                let scorer = self.risk_scorer(hazard)?;
                Ok(inputs
                    .par_iter()
                    .map(|fv| self.predict_risk(scorer, fv, now))
                    .collect())
            }
            HazardType::Price => Err(ForecastError::model(
                "batch prediction",
                ModelErrorKind::UnknownHazard(hazard.to_string()),
            )),
        }
    }

    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        let mut models: Vec<ModelStatus> = [HazardType::Flood, HazardType::Drought]
            .into_iter()
            .filter_map(|hazard| {
                let scorer = self.scorer(hazard)?;
                let info = self.risk_model_info(hazard, scorer);
                let probed = match hazard {
                    HazardType::Drought => &self.drought_model,
                    _ => &self.flood_model,
                };
                Some(ModelStatus {
                    hazard,
                    mode: probed.mode,
                    version: info.version,
                    algorithm: info.algorithm,
                    accuracy: info.accuracy,
                    trained_at: probed.artifact.as_ref().map(|a| a.trained_at),
                })
            })
            .collect();

        models.push(ModelStatus {
            hazard: HazardType::Crop,
            mode: ModelMode::RuleBased,
            version: MODEL_VERSION.to_string(),
            algorithm: CROP_ALGORITHM.to_string(),
            accuracy: Some(CROP_ACCURACY),
            trained_at: None,
        });

        ServiceStatus {
            model_dir: self.model_dir.clone(),
            models,
            price_models: self.prices.summaries(),
        }
    }

    /// Write flood and drought artifacts into `dir`.
    ///
    /// A service built afterwards over `dir` runs both hazards in trained
    /// mode. Returns the written paths.
    pub fn train_artifacts(dir: &Path, now: DateTime<Utc>) -> Result<Vec<PathBuf>> {
        let flood = FloodScorer::new();
        let drought = DroughtScorer::new();
        let scorers = [
            (&flood as &dyn HazardScorer, FLOOD_ACCURACY),
            (&drought as &dyn HazardScorer, DROUGHT_ACCURACY),
        ];

        let mut written = Vec::with_capacity(scorers.len());
        for (scorer, accuracy) in scorers {
            let hazard = scorer.hazard();
            tracing::info!(%hazard, "training {hazard} prediction model (rule-based)");

            let artifact = ModelArtifact {
                version: MODEL_VERSION.to_string(),
                algorithm: RISK_ALGORITHM.to_string(),
                accuracy,
                trained_at: now,
                features: scorer.features().iter().map(ToString::to_string).collect(),
                rules: WEIGHTED_SUM_RULES.to_string(),
            };
            let path = ModelArtifact::path_for(dir, hazard);
            artifact
                .save(&path)
                .with_context(|| format!("writing {hazard} artifact"))?;
            written.push(path);
        }
        Ok(written)
    }
}
