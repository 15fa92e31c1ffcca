//! Reading feature vectors and locations from command-line input.

use crate::model::{Coordinates, FeatureVector, Location};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Feature vector from an optional JSON file plus `NAME=VALUE` overrides.
///
/// The file must hold one JSON object of numbers; `--set` values win.
pub fn load_features(input: Option<&Path>, assignments: &[String]) -> Result<FeatureVector> {
    let mut features = match input {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse input {}", path.display()))?;
            features_from_value(&value)
                .with_context(|| format!("Invalid input {}", path.display()))?
        }
        None => FeatureVector::new(),
    };

    for raw in assignments {
        let (name, value) = FeatureVector::parse_assignment(raw)?;
        features.insert(name, value);
    }
    Ok(features)
}

/// Feature vectors from a JSON array of objects.
pub fn load_feature_batch(path: &Path) -> Result<Vec<FeatureVector>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch {}", path.display()))?;

    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array of objects", path.display());
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| features_from_value(item).with_context(|| format!("batch item {i}")))
        .collect()
}

/// Convert a JSON object of numbers into a feature vector.
///
/// `null` entries count as absent so the scorer default applies.
pub fn features_from_value(value: &Value) -> Result<FeatureVector> {
    let Value::Object(map) = value else {
        bail!("expected a JSON object of feature values");
    };

    let mut features = FeatureVector::new();
    for (name, v) in map {
        match v {
            Value::Null => {}
            Value::Number(n) => {
                let Some(x) = n.as_f64() else {
                    bail!("feature '{name}' is out of range");
                };
                features.insert(name.clone(), x);
            }
            other => bail!("feature '{name}' must be a number, got {other}"),
        }
    }
    Ok(features)
}

/// Build a location when at least country and region are given.
#[must_use]
pub fn location_from(
    country: Option<String>,
    region: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Option<Location> {
    let coordinates = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };
    match (country, region) {
        (Some(country), Some(region)) => Some(Location {
            country,
            region,
            coordinates,
        }),
        (Some(country), None) => Some(Location {
            region: String::new(),
            country,
            coordinates,
        }),
        (None, Some(region)) => Some(Location {
            country: String::new(),
            region,
            coordinates,
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_features_file_and_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("input.json");
        std::fs::write(&path, r#"{"rainfall24h": 80, "elevation": 120.5, "ndvi": null}"#).unwrap();

        let fv = load_features(Some(&path), &["rainfall24h=150".to_string()]).unwrap();
        assert_eq!(fv.get("rainfall24h"), Some(150.0));
        assert_eq!(fv.get("elevation"), Some(120.5));
        assert_eq!(fv.get("ndvi"), None);
    }

    #[test]
    fn test_non_numeric_feature_rejected() {
        let value = serde_json::json!({"soilType": "clay"});
        let err = features_from_value(&value).unwrap_err();
        assert!(err.to_string().contains("soilType"));
    }

    #[test]
    fn test_bad_assignment() {
        assert!(load_features(None, &["rainfall".to_string()]).is_err());
    }

    #[test]
    fn test_load_feature_batch() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("batch.json");
        std::fs::write(&path, r#"[{"rainfall24h": 10}, {}, {"slope": 1}]"#).unwrap();
        let batch = load_feature_batch(&path).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch[1].is_empty());

        std::fs::write(&path, r#"{"rainfall24h": 10}"#).unwrap();
        assert!(load_feature_batch(&path).is_err());
    }

    #[test]
    fn test_location_from() {
        assert_eq!(location_from(None, None, Some(1.0), Some(2.0)), None);
        let loc = location_from(Some("Nigeria".into()), Some("Kano".into()), Some(12.0), Some(8.5))
            .unwrap();
        assert_eq!(loc.region, "Kano");
        assert_eq!(loc.coordinates, Some(Coordinates { lat: 12.0, lng: 8.5 }));
    }
}
