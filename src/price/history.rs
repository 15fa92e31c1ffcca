//! Historical price points and the synthetic series used when a crop has
//! no recorded history.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One observation of a crop market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Day index, increasing with time
    pub day: f64,
    pub price: f64,
    #[serde(default = "default_supply")]
    pub supply: f64,
    #[serde(default = "default_demand")]
    pub demand: f64,
    #[serde(default = "default_season")]
    pub season: f64,
    #[serde(default)]
    pub weather_impact: f64,
    #[serde(default = "default_fuel_price")]
    pub fuel_price: f64,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
}

const fn default_supply() -> f64 {
    1000.0
}
const fn default_demand() -> f64 {
    1000.0
}
const fn default_season() -> f64 {
    1.0
}
const fn default_fuel_price() -> f64 {
    100.0
}
const fn default_exchange_rate() -> f64 {
    1.0
}

impl PricePoint {
    /// A point with neutral market drivers.
    #[must_use]
    pub const fn new(day: f64, price: f64) -> Self {
        Self {
            day,
            price,
            supply: default_supply(),
            demand: default_demand(),
            season: default_season(),
            weather_impact: 0.0,
            fuel_price: default_fuel_price(),
            exchange_rate: default_exchange_rate(),
        }
    }

    /// Market drivers in the order the multivariate model expects.
    #[must_use]
    pub const fn drivers(&self) -> [f64; 6] {
        [
            self.supply,
            self.demand,
            self.season,
            self.weather_impact,
            self.fuel_price,
            self.exchange_rate,
        ]
    }
}

/// Reference price per crop, in local currency per unit.
#[must_use]
pub fn base_price(crop: &str) -> f64 {
    match crop.to_lowercase().as_str() {
        "maize" => 200.0,
        "rice" => 300.0,
        "wheat" => 250.0,
        "cassava" => 150.0,
        "yam" => 180.0,
        "cocoa" => 2500.0,
        "coffee" => 1200.0,
        "cotton" => 800.0,
        "groundnut" => 400.0,
        "soybean" => 350.0,
        "tomato" => 120.0,
        "pepper" => 200.0,
        "onion" => 100.0,
        _ => 200.0,
    }
}

/// Generate `n` daily points around the crop's base price.
///
/// One full seasonal cycle (±20%) over the series, a 10% upward drift and
/// ±15% noise; prices never drop below half the base price. Reproducible
/// when `rng` is seeded.
pub fn synthetic_history<R: Rng + ?Sized>(crop: &str, n: usize, rng: &mut R) -> Vec<PricePoint> {
    let base = base_price(crop);
    let len = n.max(1) as f64;
    let quarter = (n / 4).max(1);

    (0..n)
        .map(|i| {
            let t = i as f64 / len;
            let seasonal = (t * 2.0 * std::f64::consts::PI).sin() * 0.2;
            let noise = (rng.gen::<f64>() - 0.5) * 0.3;
            let drift = t * 0.1;
            let price = base * (1.0 + seasonal + noise + drift);

            PricePoint {
                day: i as f64,
                price: price.max(base * 0.5),
                supply: 800.0 + rng.gen::<f64>() * 400.0,
                demand: 900.0 + rng.gen::<f64>() * 300.0,
                season: (i / quarter) as f64,
                weather_impact: rng.gen::<f64>() - 0.5,
                fuel_price: 90.0 + rng.gen::<f64>() * 40.0,
                exchange_rate: 0.9 + rng.gen::<f64>() * 0.4,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base_price_lookup() {
        assert_eq!(base_price("cocoa"), 2500.0);
        assert_eq!(base_price("Maize"), 200.0);
        assert_eq!(base_price("quinoa"), 200.0);
    }

    #[test]
    fn test_synthetic_history_is_seed_reproducible() {
        let a = synthetic_history("rice", 50, &mut StdRng::seed_from_u64(7));
        let b = synthetic_history("rice", 50, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn test_synthetic_history_bounds() {
        let points = synthetic_history("onion", 200, &mut StdRng::seed_from_u64(11));
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.day, i as f64);
            assert!(p.price >= 50.0);
            assert!((800.0..1200.0).contains(&p.supply));
            assert!((900.0..1200.0).contains(&p.demand));
            assert!((0.0..4.0).contains(&p.season));
        }
    }

    #[test]
    fn test_point_defaults_from_json() {
        let p: PricePoint = serde_json::from_str(r#"{"day": 3, "price": 210.5}"#).unwrap();
        assert_eq!(p.drivers(), [1000.0, 1000.0, 1.0, 0.0, 100.0, 1.0]);
    }
}
