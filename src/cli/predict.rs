//! Prediction command handlers.
//!
//! Implements the `flood`, `drought`, `crops` and `price` subcommands.

use crate::config::{OutputConfig, MAX_HORIZON_DAYS};
use crate::model::{FeatureVector, HazardType, Location, PredictionRecord};
use crate::pipeline::{
    exit_code_for, render_records, should_use_color, write_output, OutputTarget,
};
use crate::price::{PricePoint, RegressionKind};
use crate::service::ForecastService;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Risk or crop prediction request
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub hazard: HazardType,
    pub features: FeatureVector,
    pub location: Option<Location>,
    pub output: OutputConfig,
    pub fail_on_high: bool,
    pub quiet: bool,
}

/// Run a flood, drought or crop prediction, returning the exit code.
pub fn run_predict(
    service: &ForecastService,
    config: PredictConfig,
    now: DateTime<Utc>,
) -> Result<i32> {
    let record = match config.hazard {
        HazardType::Crop => service.recommend_crops(&config.features, now),
        hazard => service
            .predict_hazard(hazard, &config.features, now)
            .with_context(|| format!("{hazard} prediction failed"))?,
    }
    .with_location(config.location);

    tracing::debug!(id = %record.id, hazard = %record.hazard, "prediction built");

    emit_records(std::slice::from_ref(&record), &config.output, config.quiet)?;
    Ok(exit_code_for([record.severity()], config.fail_on_high))
}

/// How a price forecast is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PriceMethod {
    /// Supply/demand ratio with a random market trend
    #[default]
    Trend,
    /// Gradient-descent regression fitted before predicting
    Regression,
}

/// Price forecast request
#[derive(Debug, Clone)]
pub struct PriceCommand {
    pub crop: String,
    pub features: FeatureVector,
    pub location: Option<Location>,
    pub days_ahead: u32,
    pub method: PriceMethod,
    pub kind: RegressionKind,
    /// JSON array of price points; synthetic history when absent
    pub history: Option<PathBuf>,
    pub seed: Option<u64>,
    pub output: OutputConfig,
    pub quiet: bool,
}

/// Run a price forecast, returning the exit code.
pub fn run_price(
    service: &mut ForecastService,
    command: PriceCommand,
    now: DateTime<Utc>,
) -> Result<i32> {
    if command.days_ahead == 0 || command.days_ahead > MAX_HORIZON_DAYS {
        bail!(
            "days ahead must be between 1 and {MAX_HORIZON_DAYS}, got {}",
            command.days_ahead
        );
    }

    let mut rng = match command.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let record = match command.method {
        PriceMethod::Trend => service.predict_price(
            &command.crop,
            &command.features,
            command.days_ahead,
            &mut rng,
            now,
        ),
        PriceMethod::Regression => {
            let summary = match &command.history {
                Some(path) => {
                    let history = load_price_history(path)?;
                    service.train_price_model(&command.crop, command.kind, &history)?
                }
                None => service.train_price_model_synthetic(&command.crop, command.kind, &mut rng)?,
            };
            if !command.quiet {
                tracing::info!(
                    "Fitted {} model for {} on {} points (R² {:.3})",
                    summary.kind.algorithm(),
                    summary.crop,
                    summary.data_points,
                    summary.r_squared
                );
            }
            service.predict_price_fitted(&command.crop, &command.features, command.days_ahead, now)?
        }
    }
    .with_location(command.location);

    emit_records(std::slice::from_ref(&record), &command.output, command.quiet)?;
    Ok(crate::pipeline::exit_codes::SUCCESS)
}

/// Read a JSON array of [`PricePoint`]s.
pub fn load_price_history(path: &Path) -> Result<Vec<PricePoint>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read price history {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse price history {}", path.display()))
}

/// Render records per the output settings and write them out.
pub(crate) fn emit_records(
    records: &[PredictionRecord],
    output: &OutputConfig,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let colored = should_use_color(output.no_color, &target);
    let text = render_records(records, output.format, colored)?;
    write_output(&text, &target, quiet)
}
