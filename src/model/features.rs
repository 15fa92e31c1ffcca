//! Named numeric inputs consumed by the scorers.

use crate::error::{ForecastError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A flat mapping from feature name to value.
///
/// Names use the request spelling (`rainfall24h`, `riverDistance`, ...).
/// Insertion order is kept so a persisted input reads back the way the
/// caller wrote it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: IndexMap<String, f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from `(name, value)` pairs; later pairs win.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut fv = Self::new();
        for (k, v) in pairs {
            fv.insert(k, v);
        }
        fv
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of `name`, or `default` when the caller did not supply it.
    #[must_use]
    pub fn value_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// First present value among `names`, or `default`.
    #[must_use]
    pub fn first_of(&self, names: &[&str], default: f64) -> f64 {
        names
            .iter()
            .find_map(|n| self.get(n))
            .unwrap_or(default)
    }

    /// Copy of this vector with `defaults` filled in for absent names.
    ///
    /// Caller-supplied values always win over defaults.
    #[must_use]
    pub fn merged_with_defaults(&self, defaults: &[(&str, f64)]) -> Self {
        let mut merged = self.clone();
        for (name, value) in defaults {
            merged.values.entry((*name).to_string()).or_insert(*value);
        }
        merged
    }

    /// Parse a `name=value` assignment as given on the command line.
    ///
    /// Only finite values are accepted; JSON has no spelling for NaN or
    /// infinity, so a record holding one could not be read back.
    pub fn parse_assignment(raw: &str) -> Result<(String, f64)> {
        let (name, value) = raw.split_once('=').ok_or_else(|| {
            ForecastError::validation(format!("expected NAME=VALUE, got '{raw}'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ForecastError::validation(format!(
                "empty feature name in '{raw}'"
            )));
        }
        let value: f64 = value.trim().parse().map_err(|_| {
            ForecastError::validation(format!("feature '{name}' is not a number: '{value}'"))
        })?;
        if !value.is_finite() {
            return Err(ForecastError::validation(format!(
                "feature '{name}' must be finite, got {value}"
            )));
        }
        Ok((name.to_string(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}
