//! Per-feature normalization.
//!
//! Every transform maps a raw value onto a dimensionless figure that is
//! nominally in `[0, 1]`. Only the capped forms enforce the upper bound;
//! the rest pass out-of-range inputs straight through so the scorer can
//! clamp the final sum instead of each term.

use crate::model::FeatureVector;
use serde::{Deserialize, Serialize};

/// Normalization applied to one raw feature value.
///
/// All divisors are fixed non-zero constants, so `apply` is total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// `v / d`
    Ratio(f64),
    /// `min(v / d, 1)`
    CappedRatio(f64),
    /// `1 - min(v / d, 1)`
    InverseCappedRatio(f64),
    /// `1 - v / d`
    Complement(f64),
    /// `max(0, (v - base) / span)`
    Excess { base: f64, span: f64 },
    /// `1` when `v == x`, else `0`
    Indicator(f64),
}

impl Transform {
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Self::Ratio(d) => value / d,
            Self::CappedRatio(d) => (value / d).min(1.0),
            Self::InverseCappedRatio(d) => 1.0 - (value / d).min(1.0),
            Self::Complement(d) => 1.0 - value / d,
            Self::Excess { base, span } => ((value - base) / span).max(0.0),
            Self::Indicator(x) => {
                if (value - x).abs() < f64::EPSILON {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// One weighted row of a linear scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedTerm {
    /// Request name of the feature
    pub feature: &'static str,
    /// Value used when the caller leaves the feature out
    pub default: f64,
    pub transform: Transform,
    pub weight: f64,
}

impl WeightedTerm {
    pub const fn new(feature: &'static str, default: f64, transform: Transform, weight: f64) -> Self {
        Self {
            feature,
            default,
            transform,
            weight,
        }
    }

    /// Normalized (unweighted) value of this term for `input`.
    #[must_use]
    pub fn normalized(&self, input: &FeatureVector) -> f64 {
        self.transform
            .apply(input.value_or(self.feature, self.default))
    }

    /// Weighted contribution of this term for `input`.
    #[must_use]
    pub fn contribution(&self, input: &FeatureVector) -> f64 {
        self.normalized(input) * self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_ratio() {
        assert_eq!(Transform::CappedRatio(100.0).apply(50.0), 0.5);
        assert_eq!(Transform::CappedRatio(100.0).apply(150.0), 1.0);
        assert_eq!(Transform::CappedRatio(100.0).apply(-50.0), -0.5);
    }

    #[test]
    fn test_inverse_capped_ratio() {
        assert!((Transform::InverseCappedRatio(500.0).apply(50.0) - 0.9).abs() < 1e-12);
        assert_eq!(Transform::InverseCappedRatio(500.0).apply(900.0), 0.0);
        // Negative elevations are not rejected; they push past 1.
        assert!(Transform::InverseCappedRatio(500.0).apply(-500.0) > 1.0);
    }

    #[test]
    fn test_complement_is_unclamped() {
        assert!((Transform::Complement(60.0).apply(30.0) - 0.5).abs() < 1e-12);
        assert!(Transform::Complement(60.0).apply(120.0) < 0.0);
    }

    #[test]
    fn test_excess() {
        let t = Transform::Excess {
            base: 30.0,
            span: 15.0,
        };
        assert_eq!(t.apply(25.0), 0.0);
        assert!((t.apply(45.0) - 1.0).abs() < 1e-12);
        assert!((t.apply(60.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_indicator() {
        assert_eq!(Transform::Indicator(1.0).apply(1.0), 1.0);
        assert_eq!(Transform::Indicator(1.0).apply(2.0), 0.0);
    }

    #[test]
    fn test_total_over_non_finite_inputs() {
        let transforms = [
            Transform::Ratio(10.0),
            Transform::CappedRatio(10.0),
            Transform::InverseCappedRatio(10.0),
            Transform::Complement(10.0),
            Transform::Excess {
                base: 1.0,
                span: 2.0,
            },
            Transform::Indicator(1.0),
        ];
        for t in transforms {
            // Must not panic; the value may be non-finite.
            let _ = t.apply(f64::NAN);
            let _ = t.apply(f64::INFINITY);
            let _ = t.apply(f64::NEG_INFINITY);
        }
    }

    #[test]
    fn test_term_uses_default_when_missing() {
        let term = WeightedTerm::new("slope", 5.0, Transform::InverseCappedRatio(10.0), 0.1);
        let empty = FeatureVector::new();
        assert!((term.normalized(&empty) - 0.5).abs() < 1e-12);
        assert!((term.contribution(&empty) - 0.05).abs() < 1e-12);

        let given = FeatureVector::from_pairs([("slope", 2.0)]);
        assert!((term.contribution(&given) - 0.08).abs() < 1e-12);
    }
}
