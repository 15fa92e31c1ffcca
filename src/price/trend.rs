//! Supply/demand price heuristic with a random market trend.

use super::PriceInputs;
use crate::model::{ChangeDirection, FeatureVector, PriceForecast};
use rand::Rng;

/// Factors reported with every heuristic forecast.
pub const TREND_FACTORS: [&str; 3] = ["Supply-demand", "Seasonality", "Fuel cost"];

/// `predicted = current × demand / supply × (1 + trend)`.
///
/// `trend` is drawn from the injected random source and lies in
/// `[-0.12, 0.18)`; confidence is drawn from `[0.7, 0.9)`. Pass a seeded
/// generator for reproducible output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendHeuristic;

impl TrendHeuristic {
    /// Lower offset subtracted from the uniform draw before scaling
    const TREND_OFFSET: f64 = 0.4;
    const TREND_SCALE: f64 = 0.3;
    const CONFIDENCE_BASE: f64 = 0.7;
    const CONFIDENCE_SPAN: f64 = 0.2;

    pub fn forecast<R: Rng + ?Sized>(
        &self,
        crop: &str,
        input: &FeatureVector,
        rng: &mut R,
    ) -> PriceForecast {
        let inputs = PriceInputs::from_features(input);
        let trend = (rng.gen::<f64>() - Self::TREND_OFFSET) * Self::TREND_SCALE;
        let predicted = inputs.current_price * inputs.supply_demand_factor() * (1.0 + trend);
        let delta = predicted - inputs.current_price;
        let confidence = Self::CONFIDENCE_BASE + rng.gen::<f64>() * Self::CONFIDENCE_SPAN;

        tracing::debug!(crop, trend, predicted, "trend price forecast");

        PriceForecast {
            crop: crop.to_string(),
            current_price: inputs.current_price,
            predicted_price: predicted,
            change: delta.abs(),
            change_direction: ChangeDirection::from_delta(delta),
            confidence,
            factors: TREND_FACTORS.iter().map(ToString::to_string).collect(),
        }
    }
}
