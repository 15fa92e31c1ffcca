//! Trained-model metadata on disk.
//!
//! An artifact carries no parameters; the weighted tables are compiled in.
//! Its presence switches a hazard into trained mode and supplies the
//! version, algorithm and accuracy reported with each prediction.

use crate::error::{ErrorContext, ForecastError, ModelErrorKind, Result};
use crate::model::HazardType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rule set identifier written by `train`.
pub const WEIGHTED_SUM_RULES: &str = "weighted_sum_with_threshold";

/// How a hazard's predictions are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelMode {
    /// A readable artifact was found at construction
    Trained,
    /// No artifact; built-in metadata is reported
    RuleBased,
}

impl std::fmt::Display for ModelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trained => f.write_str("trained"),
            Self::RuleBased => f.write_str("rule-based"),
        }
    }
}

/// JSON metadata stored as `<model_dir>/<hazard>_model.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifact {
    pub version: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub accuracy: f64,
    pub trained_at: DateTime<Utc>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_rules")]
    pub rules: String,
}

fn default_algorithm() -> String {
    "Weighted Risk Scoring".to_string()
}

fn default_rules() -> String {
    WEIGHTED_SUM_RULES.to_string()
}

impl ModelArtifact {
    /// Where the artifact for `hazard` lives under `dir`.
    #[must_use]
    pub fn path_for(dir: &Path, hazard: HazardType) -> PathBuf {
        dir.join(format!("{}_model.json", hazard.as_str()))
    }

    /// Read and parse an artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ForecastError::io(path, e))?;
        let artifact: Self = serde_json::from_str(&content).map_err(|e| {
            ForecastError::model(
                format!("loading {}", path.display()),
                ModelErrorKind::ArtifactUnreadable(e.to_string()),
            )
        })?;

        if !(0.0..=1.0).contains(&artifact.accuracy) {
            return Err(ForecastError::model(
                format!("loading {}", path.display()),
                ModelErrorKind::ArtifactUnreadable(format!(
                    "accuracy {} is outside [0, 1]",
                    artifact.accuracy
                )),
            ));
        }
        Ok(artifact)
    }

    /// Write the artifact as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ForecastError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).context("encoding model artifact")?;
        std::fs::write(path, json).map_err(|e| ForecastError::io(path, e))
    }
}

/// Outcome of probing for one hazard's artifact.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProbedModel {
    pub mode: ModelMode,
    pub artifact: Option<ModelArtifact>,
}

/// Probe `dir` for `hazard`'s artifact once.
///
/// A missing artifact selects rule-based mode quietly; an unreadable one
/// does too, with a warning.
pub(crate) fn probe(dir: &Path, hazard: HazardType) -> ProbedModel {
    let path = ModelArtifact::path_for(dir, hazard);
    if !path.exists() {
        tracing::info!(%hazard, path = %path.display(), "no trained model found, using rule-based scoring");
        return ProbedModel {
            mode: ModelMode::RuleBased,
            artifact: None,
        };
    }

    match ModelArtifact::load(&path) {
        Ok(artifact) => {
            tracing::info!(
                %hazard,
                version = %artifact.version,
                trained_at = %artifact.trained_at,
                "loaded trained model"
            );
            ProbedModel {
                mode: ModelMode::Trained,
                artifact: Some(artifact),
            }
        }
        Err(e) => {
            tracing::warn!(%hazard, "failed to load model, will use fallback: {e}");
            ProbedModel {
                mode: ModelMode::RuleBased,
                artifact: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            version: "2.1".to_string(),
            algorithm: "Weighted Risk Scoring".to_string(),
            accuracy: 0.88,
            trained_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
            features: vec!["rainfall_24h".to_string()],
            rules: WEIGHTED_SUM_RULES.to_string(),
        }
    }

    #[test]
    fn test_path_for() {
        let path = ModelArtifact::path_for(Path::new("/srv/models"), HazardType::Drought);
        assert_eq!(path, PathBuf::from("/srv/models/drought_model.json"));
    }

    #[test]
    fn test_save_then_probe_is_trained() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested");
        artifact()
            .save(&ModelArtifact::path_for(&dir, HazardType::Flood))
            .unwrap();

        let probed = probe(&dir, HazardType::Flood);
        assert_eq!(probed.mode, ModelMode::Trained);
        assert_eq!(probed.artifact, Some(artifact()));
        assert_eq!(probe(&dir, HazardType::Drought).mode, ModelMode::RuleBased);
    }

    #[test]
    fn test_minimal_legacy_artifact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flood_model.json");
        std::fs::write(
            &path,
            r#"{"version":"1.0","trainedAt":"2024-06-01T00:00:00Z","accuracy":0.85,"rules":"weighted_sum_with_threshold"}"#,
        )
        .unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.algorithm, "Weighted Risk Scoring");
        assert!(loaded.features.is_empty());
    }

    #[test]
    fn test_corrupt_artifact_falls_back() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("flood_model.json"), "{ not json").unwrap();

        let err = ModelArtifact::load(&tmp.path().join("flood_model.json")).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Model {
                source: ModelErrorKind::ArtifactUnreadable(_),
                ..
            }
        ));
        assert_eq!(probe(tmp.path(), HazardType::Flood).mode, ModelMode::RuleBased);
    }

    #[test]
    fn test_accuracy_out_of_range_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("drought_model.json");
        let mut bad = artifact();
        bad.accuracy = 1.4;
        bad.save(&path).unwrap();
        assert!(ModelArtifact::load(&path).is_err());
    }
}
