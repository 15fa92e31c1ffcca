//! Property-based tests for scoring, crop rules and the price heuristic.
//!
//! Scoring must be total: any feature values, including NaN and infinities,
//! produce a probability in `[0, 1]` and a severity consistent with it.

use agri_forecast::crop::{CropRecommender, CROP_RULES};
use agri_forecast::model::{ChangeDirection, FeatureVector, Severity};
use agri_forecast::price::TrendHeuristic;
use agri_forecast::scoring::{clamp_score, DroughtScorer, FloodScorer, HazardScorer};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const FLOOD_NAMES: [&str; 8] = [
    "rainfall24h",
    "rainfall7d",
    "elevation",
    "slope",
    "riverDistance",
    "drainageDensity",
    "soilType",
    "ndvi",
];

const DROUGHT_NAMES: [&str; 11] = [
    "temperatureAvg",
    "temperatureMax",
    "rainfall30d",
    "rainfall60d",
    "rainfall90d",
    "humidity",
    "evapotranspiration",
    "soilMoisture",
    "groundwaterLevel",
    "ndvi",
    "vhi",
];

/// Any f64, weighted towards the awkward ones.
fn any_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -1.0e4..1.0e4f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(0.0),
    ]
}

fn features_over(names: &'static [&'static str]) -> impl Strategy<Value = FeatureVector> {
    prop::collection::vec(prop::option::of(any_value()), names.len()).prop_map(move |values| {
        let mut fv = FeatureVector::new();
        for (name, value) in names.iter().zip(values) {
            if let Some(v) = value {
                fv.insert(*name, v);
            }
        }
        fv
    })
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Low => 0,
        Severity::Medium => 1,
        Severity::High => 2,
    }
}

/// Higher probability never maps to a lower severity for one scorer.
fn assert_monotonic_severity(
    scorer: &dyn HazardScorer,
    a: &FeatureVector,
    b: &FeatureVector,
) -> Result<(), TestCaseError> {
    let (x, y) = (scorer.assess(a), scorer.assess(b));
    if x.probability <= y.probability {
        prop_assert!(severity_rank(x.severity) <= severity_rank(y.severity));
    } else {
        prop_assert!(severity_rank(x.severity) >= severity_rank(y.severity));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn clamp_score_stays_in_unit_interval(raw in any_value()) {
        let clamped = clamp_score(raw);
        prop_assert!((0.0..=1.0).contains(&clamped), "{raw} -> {clamped}");
    }

    #[test]
    fn flood_probability_is_bounded(fv in features_over(&FLOOD_NAMES)) {
        let assessment = FloodScorer::new().assess(&fv);
        prop_assert!((0.0..=1.0).contains(&assessment.probability));
        prop_assert!((0.0..=1.0).contains(&assessment.confidence));
    }

    #[test]
    fn drought_probability_is_bounded(fv in features_over(&DROUGHT_NAMES)) {
        let assessment = DroughtScorer::new().assess(&fv);
        prop_assert!((0.0..=1.0).contains(&assessment.probability));
        prop_assert!((0.0..=1.0).contains(&assessment.confidence));
    }

    #[test]
    fn drought_severity_is_monotonic_in_probability(
        a in features_over(&DROUGHT_NAMES),
        b in features_over(&DROUGHT_NAMES),
    ) {
        assert_monotonic_severity(&DroughtScorer::new(), &a, &b)?;
    }

    #[test]
    fn flood_severity_is_monotonic_in_probability(
        a in features_over(&FLOOD_NAMES),
        b in features_over(&FLOOD_NAMES),
    ) {
        assert_monotonic_severity(&FloodScorer::new(), &a, &b)?;
    }

    #[test]
    fn more_rain_never_lowers_flood_risk(base in 0.0..500.0f64, extra in 0.0..500.0f64) {
        let scorer = FloodScorer::new();
        let low = scorer.assess(&FeatureVector::from_pairs([("rainfall24h", base)]));
        let high = scorer.assess(&FeatureVector::from_pairs([("rainfall24h", base + extra)]));
        prop_assert!(low.probability <= high.probability);
    }

    #[test]
    fn crop_rules_fire_independently(
        ph in 3.0..9.0f64,
        rainfall in 0.0..3000.0f64,
        temperature in 0.0..45.0f64,
    ) {
        let fv = FeatureVector::from_pairs([
            ("ph", ph),
            ("rainfall", rainfall),
            ("temperature", temperature),
        ]);
        let recommendations = CropRecommender::new().recommend(&fv);

        let expected = CROP_RULES.iter().filter(|rule| rule.matches(&fv)).count();
        prop_assert_eq!(recommendations.len(), expected);
        for rule in CROP_RULES.iter().filter(|rule| rule.matches(&fv)) {
            let rec = recommendations.iter().find(|r| r.crop == rule.crop);
            prop_assert!(rec.is_some(), "{} missing", rule.crop);
            prop_assert_eq!(rec.map(|r| r.suitability), Some(rule.probability));
        }
        for pair in recommendations.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn trend_forecast_stays_in_band(
        price in 1.0..5000.0f64,
        supply in 1.0..5000.0f64,
        demand in 1.0..5000.0f64,
        seed in any::<u64>(),
    ) {
        let fv = FeatureVector::from_pairs([
            ("currentPrice", price),
            ("supply", supply),
            ("demand", demand),
        ]);
        let forecast = TrendHeuristic.forecast("maize", &fv, &mut StdRng::seed_from_u64(seed));

        let anchor = price * demand / supply;
        let tolerance = 1e-9 * anchor.max(1.0);
        prop_assert!(forecast.predicted_price >= anchor * 0.88 - tolerance);
        prop_assert!(forecast.predicted_price <= anchor * 1.18 + tolerance);
        prop_assert!((0.7..0.9).contains(&forecast.confidence));
        prop_assert!(forecast.change >= 0.0);

        let delta = forecast.predicted_price - forecast.current_price;
        let direction = ChangeDirection::from_delta(delta);
        prop_assert_eq!(forecast.change_direction, direction);
    }
}
