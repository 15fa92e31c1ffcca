//! Forecast service integration tests.
//!
//! These tests exercise the public service API end to end: risk envelopes,
//! trained versus rule-based model metadata, crop recommendation, both price
//! paths, batch scoring and the record lifecycle.

use agri_forecast::config::AppConfig;
use agri_forecast::model::{
    ChangeDirection, FeatureVector, HazardType, PredictionOutcome, PredictionStatus, Severity,
};
use agri_forecast::price::{PricePoint, RegressionKind};
use agri_forecast::service::{ForecastService, ModelArtifact, ModelMode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 8, 30, 0).unwrap()
}

fn service_over(dir: &Path) -> ForecastService {
    ForecastService::new(&AppConfig::builder().model_dir(dir).build())
}

fn flooding_field() -> FeatureVector {
    FeatureVector::from_pairs([
        ("rainfall24h", 150.0),
        ("rainfall7d", 300.0),
        ("elevation", 50.0),
        ("slope", 2.0),
        ("riverDistance", 200.0),
    ])
}

fn parched_field() -> FeatureVector {
    FeatureVector::from_pairs([
        ("temperatureAvg", 40.0),
        ("temperatureMax", 48.0),
        ("rainfall30d", 0.0),
        ("rainfall60d", 0.0),
        ("rainfall90d", 0.0),
        ("humidity", 10.0),
        ("soilMoisture", 0.0),
    ])
}

fn risk_of(outcome: &PredictionOutcome) -> (f64, Severity) {
    match outcome {
        PredictionOutcome::Risk {
            probability,
            severity,
        } => (*probability, *severity),
        other => panic!("expected a risk outcome, got {other:?}"),
    }
}

// ============================================================================
// Risk envelopes
// ============================================================================

mod risk {
    use super::*;

    #[test]
    fn flood_envelope_for_saturated_lowland() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).predict_flood(&flooding_field(), now());

        let (probability, severity) = risk_of(&record.prediction);
        assert!((probability - 0.845).abs() < 1e-9, "got {probability}");
        assert_eq!(severity, Severity::High);
        assert!((record.confidence - 0.9).abs() < f64::EPSILON);

        assert_eq!(record.hazard, HazardType::Flood);
        assert_eq!(record.status, PredictionStatus::Active);
        assert_eq!(record.created_at, now());
        assert_eq!(record.timeframe.start_date, now());
        assert_eq!(record.timeframe.days(), 7);
        assert_eq!(record.model_info.algorithm, "Weighted Risk Scoring");
        assert_eq!(record.model_info.accuracy, Some(0.85));
        assert!(record.validation.is_none());
    }

    #[test]
    fn flood_input_echo_includes_defaults() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).predict_flood(&flooding_field(), now());

        assert_eq!(record.input_data.get("rainfall24h"), Some(150.0));
        assert_eq!(record.input_data.get("drainageDensity"), Some(2.0));
        assert_eq!(record.input_data.get("rainfall30d"), Some(100.0));
    }

    #[test]
    fn empty_drought_request_scores_defaults() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).predict_drought(&FeatureVector::new(), now());

        let (probability, severity) = risk_of(&record.prediction);
        assert!((0.0..=1.0).contains(&probability));
        assert_ne!(severity, Severity::High);
        assert_eq!(record.timeframe.days(), 30);
        assert_eq!(record.model_info.accuracy, Some(0.82));
    }

    #[test]
    fn parched_field_is_high_drought_risk() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).predict_drought(&parched_field(), now());
        let (probability, severity) = risk_of(&record.prediction);
        assert!(probability > 0.9, "got {probability}");
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn predict_hazard_rejects_non_risk_types() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        assert!(service
            .predict_hazard(HazardType::Price, &FeatureVector::new(), now())
            .is_err());
        assert!(service
            .predict_hazard(HazardType::Flood, &flooding_field(), now())
            .is_ok());
    }

    #[test]
    fn configured_thresholds_and_horizon_apply() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::builder()
            .model_dir(tmp.path())
            .flood_thresholds(0.9, 0.5)
            .build();
        config.flood.horizon_days = Some(3);
        let record = ForecastService::new(&config).predict_flood(&flooding_field(), now());

        assert_eq!(risk_of(&record.prediction).1, Severity::Medium);
        assert_eq!(record.timeframe.days(), 3);
    }
}

// ============================================================================
// Trained versus rule-based mode
// ============================================================================

mod artifacts {
    use super::*;

    #[test]
    fn missing_artifacts_mean_rule_based() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        assert_eq!(service.mode(HazardType::Flood), ModelMode::RuleBased);
        assert_eq!(service.mode(HazardType::Drought), ModelMode::RuleBased);
    }

    #[test]
    fn trained_artifacts_switch_mode_without_changing_scores() {
        let tmp = TempDir::new().unwrap();
        let rule_based = service_over(tmp.path()).predict_flood(&flooding_field(), now());

        let written = ForecastService::train_artifacts(tmp.path(), now()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(tmp.path().join("flood_model.json").exists());
        assert!(tmp.path().join("drought_model.json").exists());

        let service = service_over(tmp.path());
        assert_eq!(service.mode(HazardType::Flood), ModelMode::Trained);
        assert_eq!(service.mode(HazardType::Drought), ModelMode::Trained);

        let trained = service.predict_flood(&flooding_field(), now());
        assert_eq!(trained.prediction, rule_based.prediction);
        assert_eq!(trained.confidence, rule_based.confidence);
    }

    #[test]
    fn artifact_metadata_flows_into_model_info() {
        let tmp = TempDir::new().unwrap();
        let artifact = ModelArtifact {
            version: "2.3".to_string(),
            algorithm: "Weighted Risk Scoring".to_string(),
            accuracy: 0.91,
            trained_at: now() - Duration::days(10),
            features: vec!["rainfall_24h".to_string()],
            rules: "weighted_sum_with_threshold".to_string(),
        };
        artifact
            .save(&ModelArtifact::path_for(tmp.path(), HazardType::Drought))
            .unwrap();

        let service = service_over(tmp.path());
        assert_eq!(service.mode(HazardType::Drought), ModelMode::Trained);
        assert_eq!(service.mode(HazardType::Flood), ModelMode::RuleBased);

        let record = service.predict_drought(&parched_field(), now());
        assert_eq!(record.model_info.version, "2.3");
        assert_eq!(record.model_info.accuracy, Some(0.91));

        let status = service.status();
        let drought = status
            .models
            .iter()
            .find(|m| m.hazard == HazardType::Drought)
            .unwrap();
        assert_eq!(drought.trained_at, Some(now() - Duration::days(10)));
    }

    #[test]
    fn unreadable_artifact_falls_back_to_rule_based() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("flood_model.json"), "{ not json").unwrap();

        let service = service_over(tmp.path());
        assert_eq!(service.mode(HazardType::Flood), ModelMode::RuleBased);
        let record = service.predict_flood(&flooding_field(), now());
        assert_eq!(record.model_info.accuracy, Some(0.85));
    }

    #[test]
    fn with_artifacts_reprobes_another_directory() {
        let empty = TempDir::new().unwrap();
        let trained = TempDir::new().unwrap();
        ForecastService::train_artifacts(trained.path(), now()).unwrap();

        let service = service_over(empty.path()).with_artifacts(trained.path());
        assert_eq!(service.mode(HazardType::Flood), ModelMode::Trained);
        assert_eq!(service.status().model_dir, trained.path());
    }
}

// ============================================================================
// Crop recommendation
// ============================================================================

mod crops {
    use super::*;

    fn crops_of(outcome: &PredictionOutcome) -> Vec<String> {
        match outcome {
            PredictionOutcome::Crops { recommendations } => {
                recommendations.iter().map(|r| r.crop.clone()).collect()
            }
            other => panic!("expected crops, got {other:?}"),
        }
    }

    #[test]
    fn default_profile_recommendations() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).recommend_crops(&FeatureVector::new(), now());

        assert_eq!(crops_of(&record.prediction), ["maize", "yam", "sorghum"]);
        assert!((record.confidence - 0.8).abs() < f64::EPSILON);
        assert_eq!(record.timeframe.days(), 90);
        assert_eq!(record.model_info.algorithm, "Rule-Based Classification");
    }

    #[test]
    fn every_rule_matching_sorts_by_confidence() {
        let tmp = TempDir::new().unwrap();
        let input =
            FeatureVector::from_pairs([("ph", 6.2), ("rainfall", 1200.0), ("temperature", 27.0)]);
        let record = service_over(tmp.path()).recommend_crops(&input, now());

        assert_eq!(
            crops_of(&record.prediction),
            ["cassava", "maize", "yam", "sorghum"]
        );
    }

    #[test]
    fn wet_region_leads_with_cassava() {
        let tmp = TempDir::new().unwrap();
        let input = FeatureVector::from_pairs([("rainfall", 1400.0), ("ph", 8.0)]);
        let record = service_over(tmp.path()).recommend_crops(&input, now());

        assert_eq!(crops_of(&record.prediction), ["cassava", "yam"]);
        assert!((record.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn no_match_reports_fallback_confidence() {
        let tmp = TempDir::new().unwrap();
        let input =
            FeatureVector::from_pairs([("ph", 4.0), ("rainfall", 100.0), ("temperature", 12.0)]);
        let record = service_over(tmp.path()).recommend_crops(&input, now());

        assert!(crops_of(&record.prediction).is_empty());
        assert!((record.confidence - 0.7).abs() < f64::EPSILON);
    }
}

// ============================================================================
// Price forecasting
// ============================================================================

mod price {
    use super::*;

    fn market() -> FeatureVector {
        FeatureVector::from_pairs([
            ("currentPrice", 250.0),
            ("supply", 800.0),
            ("demand", 1200.0),
        ])
    }

    #[test]
    fn seeded_trend_forecast_is_reproducible() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());

        let a = service.predict_price("maize", &market(), 14, &mut StdRng::seed_from_u64(9), now());
        let b = service.predict_price("maize", &market(), 14, &mut StdRng::seed_from_u64(9), now());
        assert_eq!(a.prediction, b.prediction);
        assert_eq!(a.timeframe.days(), 14);
        assert_eq!(a.model_info.algorithm, "Supply-Demand Trend");
    }

    #[test]
    fn trend_varies_across_draws() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        let mut rng = StdRng::seed_from_u64(2);

        let mut prices: Vec<f64> = (0..20)
            .map(|_| {
                match service.predict_price("yam", &market(), 30, &mut rng, now()).prediction {
                    PredictionOutcome::Price(forecast) => forecast.predicted_price,
                    other => panic!("expected price outcome, got {other:?}"),
                }
            })
            .collect();
        prices.sort_by(f64::total_cmp);
        prices.dedup();
        assert!(prices.len() > 1);
    }

    #[test]
    fn scarce_supply_pushes_price_up() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            let record = service.predict_price("maize", &market(), 30, &mut rng, now());
            let PredictionOutcome::Price(forecast) = record.prediction else {
                panic!("expected price outcome");
            };
            // 250 × 1.5 × (1 + trend), trend in [-0.12, 0.18)
            assert!(forecast.predicted_price >= 330.0 - 1e-9);
            assert!(forecast.predicted_price < 442.5 + 1e-9);
            assert_eq!(forecast.change_direction, ChangeDirection::Increase);
        }
    }

    #[test]
    fn fitted_prediction_requires_training() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        let err = service
            .predict_price_fitted("cassava", &market(), 30, now())
            .unwrap_err();
        assert!(err.is_missing_model(), "unexpected error: {err}");
    }

    #[test]
    fn fitted_linear_model_extrapolates_trend() {
        let tmp = TempDir::new().unwrap();
        let mut service = service_over(tmp.path());
        let history: Vec<PricePoint> = (0..60)
            .map(|d| PricePoint::new(f64::from(d), 80.0 + 0.5 * f64::from(d)))
            .collect();

        let summary = service
            .train_price_model("Cassava", RegressionKind::Linear, &history)
            .unwrap();
        assert_eq!(summary.crop, "cassava");
        assert_eq!(summary.data_points, 60);
        assert!(summary.r_squared > 0.99);

        let record = service
            .predict_price_fitted("cassava", &FeatureVector::new(), 20, now())
            .unwrap();
        let PredictionOutcome::Price(forecast) = record.prediction else {
            panic!("expected price outcome");
        };
        // Day 59 is 109.5; twenty days later is 119.5
        assert!((forecast.predicted_price - 119.5).abs() < 0.05, "{}", forecast.predicted_price);
        assert_eq!(record.model_info.algorithm, "Linear Regression");
        assert_eq!(service.status().price_models.len(), 1);
    }

    #[test]
    fn synthetic_training_is_seed_deterministic() {
        let tmp = TempDir::new().unwrap();
        let mut a = service_over(tmp.path());
        let mut b = service_over(tmp.path());

        let sa = a
            .train_price_model_synthetic("rice", RegressionKind::Multivariate, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let sb = b
            .train_price_model_synthetic("rice", RegressionKind::Multivariate, &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(sa, sb);
        assert_eq!(sa.data_points, 365);
    }

    #[test]
    fn single_point_history_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut service = service_over(tmp.path());
        let history = [PricePoint::new(0.0, 100.0)];
        assert!(service
            .train_price_model("yam", RegressionKind::Linear, &history)
            .is_err());
        assert!(service.price_models().is_empty());
    }

    #[test]
    fn horizon_past_calendar_end_saturates() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        let record = service.predict_price(
            "maize",
            &FeatureVector::new(),
            u32::MAX,
            &mut StdRng::seed_from_u64(1),
            now(),
        );
        assert_eq!(record.timeframe.start_date, now());
        assert_eq!(record.timeframe.end_date, DateTime::<Utc>::MAX_UTC);
        assert_eq!(record.status, PredictionStatus::Active);
    }
}

// ============================================================================
// Batch scoring
// ============================================================================

mod batch {
    use super::*;

    #[test]
    fn batch_preserves_input_order() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        let inputs: Vec<FeatureVector> = (0..64)
            .map(|i| FeatureVector::from_pairs([("rainfall24h", f64::from(i) * 2.0)]))
            .collect();

        let assessments = service.score_batch(HazardType::Flood, &inputs).unwrap();
        assert_eq!(assessments.len(), inputs.len());
        for window in assessments.windows(2) {
            assert!(window[0].probability <= window[1].probability);
        }

        let records = service.predict_batch(HazardType::Flood, &inputs, now()).unwrap();
        for (record, assessment) in records.iter().zip(&assessments) {
            assert_eq!(risk_of(&record.prediction).0, assessment.probability);
        }
    }

    #[test]
    fn batch_rejects_price() {
        let tmp = TempDir::new().unwrap();
        let service = service_over(tmp.path());
        assert!(service.score_batch(HazardType::Crop, &[]).is_err());
        assert!(service
            .predict_batch(HazardType::Price, &[FeatureVector::new()], now())
            .is_err());
    }

    #[test]
    fn oversized_configured_horizon_does_not_panic_workers() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::builder().model_dir(tmp.path()).build();
        config.drought.horizon_days = Some(i64::MAX);
        let service = ForecastService::new(&config);

        let inputs = vec![FeatureVector::new(); 16];
        let records = service.predict_batch(HazardType::Drought, &inputs, now()).unwrap();
        assert_eq!(records.len(), 16);
        assert!(records
            .iter()
            .all(|r| r.timeframe.end_date == DateTime::<Utc>::MAX_UTC));
    }
}

// ============================================================================
// Record lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn record_expires_after_its_window() {
        let tmp = TempDir::new().unwrap();
        let mut record = service_over(tmp.path()).predict_flood(&flooding_field(), now());

        assert!(!record.refresh_status(now() + Duration::days(7)));
        assert_eq!(record.status, PredictionStatus::Active);
        assert!(record.refresh_status(now() + Duration::days(8)));
        assert_eq!(record.status, PredictionStatus::Expired);
    }

    #[test]
    fn validation_keeps_prediction_intact() {
        let tmp = TempDir::new().unwrap();
        let mut record = service_over(tmp.path()).predict_flood(&flooding_field(), now());
        let original = record.prediction.clone();

        record
            .validate(serde_json::json!({"flooded": true}), 0.95, None, now())
            .unwrap();
        assert_eq!(record.status, PredictionStatus::Validated);
        assert_eq!(record.prediction, original);

        record
            .validate(serde_json::json!({"flooded": false}), 0.7, None, now())
            .unwrap();
        assert_eq!(record.status, PredictionStatus::Invalidated);
    }

    #[test]
    fn record_json_uses_wire_names() {
        let tmp = TempDir::new().unwrap();
        let record = service_over(tmp.path()).predict_flood(&flooding_field(), now());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "flood");
        assert_eq!(json["status"], "active");
        assert!(json["modelInfo"]["algorithm"].is_string());
        assert!(json["inputData"]["rainfall24h"].is_number());
        assert!(json["timeframe"]["endDate"].is_string());
        assert!(json.get("validation").is_none());
    }
}
