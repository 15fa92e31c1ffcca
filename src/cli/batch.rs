//! Batch command handler.
//!
//! Scores a JSON array of feature vectors in parallel.

use super::inputs::load_feature_batch;
use super::predict::emit_records;
use crate::config::OutputConfig;
use crate::model::HazardType;
use crate::pipeline::{
    exit_code_for, render_assessments, should_use_color, write_output, OutputTarget,
};
use crate::service::ForecastService;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Batch command configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub hazard: HazardType,
    pub input: PathBuf,
    /// Emit full prediction records instead of bare assessments
    pub records: bool,
    pub output: OutputConfig,
    pub fail_on_high: bool,
    pub quiet: bool,
}

/// Run the batch command, returning the exit code.
pub fn run_batch(
    service: &ForecastService,
    config: BatchConfig,
    now: DateTime<Utc>,
) -> Result<i32> {
    if config.hazard == HazardType::Price {
        bail!("batch scoring supports flood, drought and crop, not price");
    }

    let inputs = load_feature_batch(&config.input)?;
    if !config.quiet {
        tracing::info!("Scoring {} {} inputs", inputs.len(), config.hazard);
    }

    if config.records || config.hazard == HazardType::Crop {
        let records = service.predict_batch(config.hazard, &inputs, now)?;
        emit_records(&records, &config.output, config.quiet)?;
        return Ok(exit_code_for(
            records.iter().map(crate::model::PredictionRecord::severity),
            config.fail_on_high,
        ));
    }

    let assessments = service.score_batch(config.hazard, &inputs)?;
    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color, &target);
    let text = render_assessments(&assessments, config.output.format, colored)?;
    write_output(&text, &target, config.quiet)?;

    Ok(exit_code_for(
        assessments.iter().map(|a| Some(a.severity)),
        config.fail_on_high,
    ))
}
