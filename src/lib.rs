//! **Hazard risk scoring, crop recommendation and price forecasting for smallholder agriculture.**
//!
//! `agri-forecast` turns a bag of named numeric features (rainfall, soil
//! moisture, temperature, market volumes) into prediction records: flood and
//! drought risk with a severity bucket, rule-based crop suggestions, and crop
//! price forecasts. It powers both a command-line interface and a Rust
//! library for embedding the same models in other services.
//!
//! ## Key Features
//!
//! - **Weighted Risk Scoring**: Flood and drought scorers are fixed tables of
//!   normalized, weighted terms. Scoring is pure and total: missing features
//!   fall back to documented defaults and the result is always in `[0, 1]`.
//! - **Crop Recommendation**: Independent range rules over soil pH,
//!   rainfall, temperature and elevation, each contributing one suggestion.
//! - **Price Forecasting**: A supply/demand heuristic with an injected random
//!   trend, plus gradient-descent regression fitted on price history.
//! - **Prediction Envelopes**: Every result is wrapped in a
//!   [`PredictionRecord`] with timeframe, model metadata, echoed input and a
//!   validation lifecycle.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`FeatureVector`] in, [`PredictionRecord`] out.
//! - **[`scoring`]**: [`FloodScorer`] and [`DroughtScorer`] behind the
//!   [`HazardScorer`] trait.
//! - **[`crop`]**: [`CropRecommender`] and its rule table.
//! - **[`price`]**: [`TrendHeuristic`] and the [`PriceModelRegistry`].
//! - **[`service`]**: [`ForecastService`], which owns all models and builds
//!   the envelopes.
//! - **[`config`]**: YAML configuration, presets and validation.
//! - **[`pipeline`]**: JSON and summary rendering plus exit codes.
//!
//! ## Getting Started
//!
//! ```
//! use agri_forecast::{AppConfig, FeatureVector, ForecastService, Severity};
//!
//! let service = ForecastService::new(&AppConfig::default());
//! let input = FeatureVector::from_pairs([
//!     ("rainfall24h", 150.0),
//!     ("rainfall7d", 300.0),
//!     ("elevation", 50.0),
//!     ("slope", 2.0),
//!     ("riverDistance", 200.0),
//! ]);
//!
//! let record = service.predict_flood(&input, chrono::Utc::now());
//! assert_eq!(record.severity(), Some(Severity::High));
//! ```
//!
//! ### Forecasting a Price
//!
//! The heuristic path draws its market trend from the generator you pass in,
//! so seeding it makes the forecast reproducible.
//!
//! ```
//! use agri_forecast::{AppConfig, FeatureVector, ForecastService};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let service = ForecastService::new(&AppConfig::default());
//! let input = FeatureVector::from_pairs([
//!     ("currentPrice", 250.0),
//!     ("supply", 800.0),
//!     ("demand", 1200.0),
//! ]);
//! let mut rng = StdRng::seed_from_u64(7);
//! let record = service.predict_price("maize", &input, 30, &mut rng, chrono::Utc::now());
//! assert_eq!(record.timeframe.days(), 30);
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `agri-forecast` library crate. The
//! `agri-forecast` binary wraps the same service with `flood`, `drought`,
//! `crops`, `price`, `batch`, `validate`, `status` and `train` subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Day counts and history lengths are cast to f64 for regression math
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    // Command configs carry several toggle flags
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod crop;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod price;
pub mod scoring;
pub mod service;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{ConfigError, Validatable};
pub use crop::CropRecommender;
pub use error::{ErrorContext, ForecastError, OptionContext, Result};
pub use model::{
    CropRecommendation, FeatureVector, HazardType, Location, PredictionOutcome, PredictionRecord,
    PredictionStatus, PriceForecast, Severity, Timeframe,
};
pub use pipeline::{OutputFormat, SummaryReporter};
pub use price::{PriceModelRegistry, RegressionKind, TrendHeuristic};
pub use scoring::{DroughtScorer, FloodScorer, HazardScorer, RiskAssessment};
pub use service::{ForecastService, ModelArtifact, ModelMode};
