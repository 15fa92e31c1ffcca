//! Validate command handler.
//!
//! Attaches an observed outcome to a stored prediction record.

use super::predict::emit_records;
use crate::config::OutputConfig;
use crate::model::PredictionRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Validate command configuration
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Record to update; rewritten in place unless an output file is set
    pub record: PathBuf,
    /// Observed outcome as JSON; plain text is stored as a string
    pub actual: String,
    pub accuracy: f64,
    pub validated_by: Option<String>,
    pub output: OutputConfig,
    pub quiet: bool,
}

/// Run the validate command, returning the exit code.
pub fn run_validate(config: ValidateConfig, now: DateTime<Utc>) -> Result<i32> {
    let mut record = read_record(&config.record)?;
    record.refresh_status(now);

    let actual = serde_json::from_str(&config.actual)
        .unwrap_or_else(|_| serde_json::Value::String(config.actual.clone()));
    record
        .validate(actual, config.accuracy, config.validated_by, now)
        .with_context(|| format!("Failed to validate {}", config.record.display()))?;

    if !config.quiet {
        tracing::info!("Record {} is now {:?}", record.id, record.status);
    }

    let output = OutputConfig {
        file: config.output.file.clone().or(Some(config.record)),
        ..config.output
    };
    emit_records(std::slice::from_ref(&record), &output, config.quiet)?;
    Ok(crate::pipeline::exit_codes::SUCCESS)
}

/// Read one prediction record from a JSON file.
pub fn read_record(path: &Path) -> Result<PredictionRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{FeatureVector, PredictionStatus};
    use crate::service::ForecastService;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap()
    }

    fn stored_record(dir: &Path) -> PathBuf {
        let service = ForecastService::new(&AppConfig::builder().model_dir(dir).build());
        let record = service.predict_flood(&FeatureVector::from_pairs([("rainfall24h", 90.0)]), now());
        let path = dir.join("record.json");
        std::fs::write(&path, serde_json::to_string_pretty(&record).unwrap()).unwrap();
        path
    }

    fn config(record: PathBuf, accuracy: f64) -> ValidateConfig {
        ValidateConfig {
            record,
            actual: r#"{"flooded": true}"#.to_string(),
            accuracy,
            validated_by: Some("field-officer".to_string()),
            output: OutputConfig::default(),
            quiet: true,
        }
    }

    #[test]
    fn test_validate_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = stored_record(tmp.path());

        run_validate(config(path.clone(), 0.9), now() + Duration::days(2)).unwrap();

        let updated = read_record(&path).unwrap();
        assert_eq!(updated.status, PredictionStatus::Validated);
        let validation = updated.validation.unwrap();
        assert_eq!(validation.actual_value["flooded"], true);
        assert_eq!(validation.validated_by.as_deref(), Some("field-officer"));
    }

    #[test]
    fn test_low_accuracy_invalidates() {
        let tmp = TempDir::new().unwrap();
        let path = stored_record(tmp.path());
        let mut cfg = config(path.clone(), 0.4);
        cfg.actual = "dry".to_string();

        run_validate(cfg, now()).unwrap();
        let updated = read_record(&path).unwrap();
        assert_eq!(updated.status, PredictionStatus::Invalidated);
        assert_eq!(updated.validation.unwrap().actual_value, "dry");
    }

    #[test]
    fn test_bad_accuracy_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = stored_record(tmp.path());
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(run_validate(config(path.clone(), 2.0), now()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
