//! Least-squares price regression fitted by batch gradient descent.
//!
//! Models are refitted from scratch on every `train` call; nothing is
//! updated incrementally and nothing is persisted.

use super::{PriceInputs, PricePoint};
use crate::error::{ForecastError, Result};
use crate::model::{ChangeDirection, FeatureVector, PriceForecast};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of the multivariate drivers, in [`PricePoint::drivers`] order.
pub const DRIVER_NAMES: [&str; 6] = [
    "Supply",
    "Demand",
    "Season",
    "Weather impact",
    "Fuel price",
    "Exchange rate",
];

const MIN_TRAINING_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RegressionKind {
    /// Price against day index
    Linear,
    /// Price against the six market drivers
    Multivariate,
}

impl RegressionKind {
    #[must_use]
    pub const fn algorithm(&self) -> &'static str {
        match self {
            Self::Linear => "Linear Regression",
            Self::Multivariate => "Multivariate Linear Regression",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "linear" | "simple" => Some(Self::Linear),
            "multivariate" | "multi" => Some(Self::Multivariate),
            _ => None,
        }
    }
}

/// Fixed-step batch gradient descent on mean squared error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    pub learning_rate: f64,
    pub iterations: usize,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            iterations: 1000,
        }
    }
}

impl GradientDescent {
    /// Fit `y ≈ X·w + b` on already standardized rows.
    fn fit(&self, rows: &[Vec<f64>], targets: &[f64]) -> (Vec<f64>, f64) {
        let n = rows.len() as f64;
        let width = rows.first().map_or(0, Vec::len);
        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..self.iterations {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (row, &y) in rows.iter().zip(targets) {
                let err = dot(&weights, row) + bias - y;
                for (g, &x) in grad_w.iter_mut().zip(row) {
                    *g += err * x;
                }
                grad_b += err;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * 2.0 * g / n;
            }
            bias -= self.learning_rate * 2.0 * grad_b / n;
        }

        (weights, bias)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Per-column mean and standard deviation; zero deviation becomes 1.
fn column_stats(rows: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let width = rows.first().map_or(0, Vec::len);
    let mut means = vec![0.0; width];
    for row in rows {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }
    let mut stds = vec![0.0; width];
    for row in rows {
        for ((s, x), m) in stds.iter_mut().zip(row).zip(&means) {
            *s += (x - m).powi(2) / n;
        }
    }
    for s in &mut stds {
        *s = s.sqrt();
        if *s < f64::EPSILON {
            *s = 1.0;
        }
    }
    (means, stds)
}

/// Fitted regression parameters for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModel {
    pub kind: RegressionKind,
    /// Weights on standardized inputs
    pub weights: Vec<f64>,
    pub bias: f64,
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    pub data_points: usize,
    /// Coefficient of determination on the training data
    pub r_squared: f64,
    /// Day index and price of the newest training point
    pub last_day: f64,
    pub last_price: f64,
}

impl PriceModel {
    /// Fit a model of `kind` to `history`.
    pub fn fit(kind: RegressionKind, history: &[PricePoint], solver: &GradientDescent) -> Result<Self> {
        if history.len() < MIN_TRAINING_POINTS {
            return Err(ForecastError::insufficient_data(
                history.len(),
                MIN_TRAINING_POINTS,
            ));
        }

        let raw_rows: Vec<Vec<f64>> = history.iter().map(|p| Self::row_for(kind, p)).collect();
        let targets: Vec<f64> = history.iter().map(|p| p.price).collect();
        let (means, stds) = column_stats(&raw_rows);
        let rows: Vec<Vec<f64>> = raw_rows
            .iter()
            .map(|r| standardize(r, &means, &stds))
            .collect();

        let (weights, bias) = solver.fit(&rows, &targets);

        let (last_day, last_price) = history
            .iter()
            .max_by(|a, b| a.day.partial_cmp(&b.day).unwrap_or(std::cmp::Ordering::Equal))
            .map_or((0.0, 0.0), |p| (p.day, p.price));

        let mut model = Self {
            kind,
            weights,
            bias,
            means,
            stds,
            data_points: history.len(),
            r_squared: 0.0,
            last_day,
            last_price,
        };
        model.r_squared = model.r_squared_on(&rows, &targets);
        Ok(model)
    }

    fn row_for(kind: RegressionKind, point: &PricePoint) -> Vec<f64> {
        match kind {
            RegressionKind::Linear => vec![point.day],
            RegressionKind::Multivariate => point.drivers().to_vec(),
        }
    }

    fn r_squared_on(&self, rows: &[Vec<f64>], targets: &[f64]) -> f64 {
        let n = targets.len() as f64;
        let mean = targets.iter().sum::<f64>() / n;
        let ss_tot: f64 = targets.iter().map(|y| (y - mean).powi(2)).sum();
        let ss_res: f64 = rows
            .iter()
            .zip(targets)
            .map(|(r, y)| (dot(&self.weights, r) + self.bias - y).powi(2))
            .sum();

        if ss_tot < f64::EPSILON {
            return if ss_res < 1e-9 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }

    /// Evaluate the fitted function on raw (unstandardized) inputs.
    #[must_use]
    pub fn predict_raw(&self, raw: &[f64]) -> f64 {
        dot(&self.weights, &standardize(raw, &self.means, &self.stds)) + self.bias
    }

    /// Predicted price `days_ahead` after the newest point (linear) or for
    /// the given market drivers (multivariate).
    #[must_use]
    pub fn predict(&self, inputs: &PriceInputs, days_ahead: u32) -> f64 {
        match self.kind {
            RegressionKind::Linear => self.predict_raw(&[self.last_day + f64::from(days_ahead)]),
            RegressionKind::Multivariate => self.predict_raw(&inputs.drivers()),
        }
    }

    /// Driver names ordered by descending influence.
    #[must_use]
    pub fn leading_factors(&self, limit: usize) -> Vec<String> {
        match self.kind {
            RegressionKind::Linear => vec!["Historical trend".to_string()],
            RegressionKind::Multivariate => {
                let mut ranked: Vec<(usize, f64)> = self
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| (i, w.abs()))
                    .filter(|(_, w)| *w > 1e-9)
                    .collect();
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                ranked
                    .into_iter()
                    .take(limit)
                    .filter_map(|(i, _)| DRIVER_NAMES.get(i).map(ToString::to_string))
                    .collect()
            }
        }
    }
}

fn standardize(raw: &[f64], means: &[f64], stds: &[f64]) -> Vec<f64> {
    raw.iter()
        .zip(means)
        .zip(stds)
        .map(|((x, m), s)| (x - m) / s)
        .collect()
}

/// Row of the registry status listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModelSummary {
    pub crop: String,
    pub kind: RegressionKind,
    pub data_points: usize,
    pub r_squared: f64,
}

/// Fitted price models keyed by crop name.
#[derive(Debug, Clone, Default)]
pub struct PriceModelRegistry {
    solver: GradientDescent,
    models: BTreeMap<String, PriceModel>,
}

impl PriceModelRegistry {
    #[must_use]
    pub fn new(solver: GradientDescent) -> Self {
        Self {
            solver,
            models: BTreeMap::new(),
        }
    }

    fn key(crop: &str) -> String {
        crop.trim().to_lowercase()
    }

    /// Fit (or refit) the model for `crop`, replacing any previous one.
    pub fn train(&mut self, crop: &str, kind: RegressionKind, history: &[PricePoint]) -> Result<&PriceModel> {
        let key = Self::key(crop);
        let model = PriceModel::fit(kind, history, &self.solver)?;
        tracing::info!(
            crop = %key,
            points = model.data_points,
            r_squared = model.r_squared,
            "trained {} price model",
            kind.algorithm()
        );
        self.models.insert(key.clone(), model);
        Ok(&self.models[&key])
    }

    #[must_use]
    pub fn contains(&self, crop: &str) -> bool {
        self.models.contains_key(&Self::key(crop))
    }

    #[must_use]
    pub fn get(&self, crop: &str) -> Option<&PriceModel> {
        self.models.get(&Self::key(crop))
    }

    /// Forecast from the fitted model for `crop`.
    ///
    /// Fails with a no-model error when `crop` has not been trained.
    pub fn predict(&self, crop: &str, input: &FeatureVector, days_ahead: u32) -> Result<PriceForecast> {
        let model = self.get(crop).ok_or_else(|| ForecastError::no_model(crop))?;
        let inputs = PriceInputs::from_features(input);
        let current = input
            .get("historicalPrice")
            .or_else(|| input.get("currentPrice"))
            .unwrap_or(model.last_price);

        let predicted = model.predict(&inputs, days_ahead);
        let delta = predicted - current;

        Ok(PriceForecast {
            crop: Self::key(crop),
            current_price: current,
            predicted_price: predicted,
            change: delta.abs(),
            change_direction: ChangeDirection::from_delta(delta),
            confidence: model.r_squared.clamp(0.0, 1.0),
            factors: model.leading_factors(3),
        })
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<PriceModelSummary> {
        self.models
            .iter()
            .map(|(crop, m)| PriceModelSummary {
                crop: crop.clone(),
                kind: m.kind,
                data_points: m.data_points,
                r_squared: m.r_squared,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
