//! Status and train command handlers.

use crate::pipeline::{write_output, OutputFormat, OutputTarget};
use crate::service::{ForecastService, ServiceStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::Path;

/// Print which models are loaded and how.
pub fn run_status(service: &ForecastService, format: OutputFormat) -> Result<i32> {
    let status = service.status();
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&status)?,
        OutputFormat::Summary => format_status(&status),
    };
    write_output(&text, &OutputTarget::Stdout, true)?;
    Ok(crate::pipeline::exit_codes::SUCCESS)
}

fn format_status(status: &ServiceStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model directory: {}", status.model_dir.display());
    for model in &status.models {
        let _ = write!(
            out,
            "  {:<8} {:<11} {} v{}",
            model.hazard.as_str(),
            model.mode.to_string(),
            model.algorithm,
            model.version
        );
        if let Some(accuracy) = model.accuracy {
            let _ = write!(out, " (accuracy {accuracy:.2})");
        }
        if let Some(trained_at) = model.trained_at {
            let _ = write!(out, " trained {}", trained_at.format("%Y-%m-%d"));
        }
        out.push('\n');
    }
    if status.price_models.is_empty() {
        out.push_str("  No fitted price models");
    }
    for price in &status.price_models {
        let _ = writeln!(
            out,
            "  price    {:<11} {} points, R² {:.3}",
            price.crop, price.data_points, price.r_squared
        );
    }
    out.trim_end().to_string()
}

/// Write flood and drought artifacts into `dir`.
pub fn run_train(dir: &Path, now: DateTime<Utc>, quiet: bool) -> Result<i32> {
    let written = ForecastService::train_artifacts(dir, now)
        .with_context(|| format!("Failed to train models into {}", dir.display()))?;
    if !quiet {
        for path in &written {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(crate::pipeline::exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_train_then_status_summary() {
        let tmp = TempDir::new().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        run_train(tmp.path(), now, true).unwrap();

        let service = ForecastService::new(&AppConfig::builder().model_dir(tmp.path()).build());
        let text = format_status(&service.status());
        assert!(text.contains("flood    trained"));
        assert!(text.contains("crop     rule-based"));
        assert!(text.contains("trained 2025-01-15"));
        assert!(text.ends_with("No fitted price models"));
    }
}
