//! Crop price forecasting.
//!
//! Two paths:
//! - [`TrendHeuristic`]: supply/demand ratio times a random trend drawn from
//!   an injected generator. Non-deterministic unless the generator is seeded.
//! - [`PriceModelRegistry`]: least-squares regression fitted by gradient
//!   descent over caller-supplied history. Deterministic for identical data;
//!   predicting for a crop that was never fitted is an error.

mod history;
mod regression;
mod trend;

pub use history::{base_price, synthetic_history, PricePoint};
pub use regression::{
    GradientDescent, PriceModel, PriceModelRegistry, PriceModelSummary, RegressionKind,
    DRIVER_NAMES,
};
pub use trend::{TrendHeuristic, TREND_FACTORS};

use crate::model::FeatureVector;

/// Feature names advertised in price model metadata.
pub const PRICE_FEATURES: [&str; 7] = [
    "historicalPrice",
    "supply",
    "demand",
    "season",
    "weatherImpact",
    "fuelPrice",
    "exchangeRate",
];

/// Price request inputs with their defaults applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceInputs {
    pub current_price: f64,
    pub supply: f64,
    pub demand: f64,
    pub season: f64,
    pub weather_impact: f64,
    pub fuel_price: f64,
    pub exchange_rate: f64,
}

impl PriceInputs {
    pub const DEFAULT_PRICE: f64 = 200.0;
    pub const DEFAULT_VOLUME: f64 = 1000.0;

    /// Read inputs, accepting `historicalPrice` or `currentPrice`.
    ///
    /// Zero or negative supply and demand fall back to the default volume
    /// so the ratio stays finite and positive.
    #[must_use]
    pub fn from_features(input: &FeatureVector) -> Self {
        let volume = |name: &str| {
            let v = input.value_or(name, Self::DEFAULT_VOLUME);
            if v > 0.0 {
                v
            } else {
                Self::DEFAULT_VOLUME
            }
        };

        Self {
            current_price: input.first_of(&["historicalPrice", "currentPrice"], Self::DEFAULT_PRICE),
            supply: volume("supply"),
            demand: volume("demand"),
            season: input.value_or("season", 1.0),
            weather_impact: input.value_or("weatherImpact", 0.0),
            fuel_price: input.value_or("fuelPrice", 100.0),
            exchange_rate: input.value_or("exchangeRate", 1.0),
        }
    }

    #[must_use]
    pub fn supply_demand_factor(&self) -> f64 {
        self.demand / self.supply
    }

    /// Market drivers in the order the multivariate model expects.
    #[must_use]
    pub const fn drivers(&self) -> [f64; 6] {
        [
            self.supply,
            self.demand,
            self.season,
            self.weather_impact,
            self.fuel_price,
            self.exchange_rate,
        ]
    }

    /// The inputs as a feature vector, for persistence.
    #[must_use]
    pub fn to_features(&self) -> FeatureVector {
        FeatureVector::from_pairs([
            ("historicalPrice", self.current_price),
            ("supply", self.supply),
            ("demand", self.demand),
            ("season", self.season),
            ("weatherImpact", self.weather_impact),
            ("fuelPrice", self.fuel_price),
            ("exchangeRate", self.exchange_rate),
        ])
    }
}
