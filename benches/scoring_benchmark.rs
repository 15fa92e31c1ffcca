//! Benchmarks for risk scoring, crop rules and price model fitting.
//!
//! Run with: cargo bench --bench scoring_benchmark

use agri_forecast::config::AppConfig;
use agri_forecast::crop::CropRecommender;
use agri_forecast::model::{FeatureVector, HazardType};
use agri_forecast::price::{synthetic_history, GradientDescent, PriceModel, RegressionKind};
use agri_forecast::scoring::{DroughtScorer, FloodScorer, HazardScorer};
use agri_forecast::service::ForecastService;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

/// Random flood-style inputs, reproducible per count.
fn generate_inputs(count: usize) -> Vec<FeatureVector> {
    let mut rng = StdRng::seed_from_u64(count as u64);
    (0..count)
        .map(|_| {
            FeatureVector::from_pairs([
                ("rainfall24h", rng.gen_range(0.0..200.0)),
                ("rainfall7d", rng.gen_range(0.0..500.0)),
                ("elevation", rng.gen_range(0.0..800.0)),
                ("slope", rng.gen_range(0.0..15.0)),
                ("riverDistance", rng.gen_range(0.0..5000.0)),
            ])
        })
        .collect()
}

fn bench_single_assessment(c: &mut Criterion) {
    let input = generate_inputs(1).remove(0);
    let flood = FloodScorer::new();
    let drought = DroughtScorer::new();

    c.bench_function("flood_assess", |b| {
        b.iter(|| black_box(flood.assess(black_box(&input))))
    });
    c.bench_function("drought_assess", |b| {
        b.iter(|| black_box(drought.assess(black_box(&input))))
    });
}

fn bench_batch(c: &mut Criterion) {
    let service = ForecastService::new(&AppConfig::default());
    let mut group = c.benchmark_group("score_batch");

    for size in [100, 1_000, 10_000] {
        let inputs = generate_inputs(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.iter(|| black_box(service.score_batch(HazardType::Flood, inputs)))
        });
    }
    group.finish();
}

fn bench_crop_rules(c: &mut Criterion) {
    let recommender = CropRecommender::new();
    let input = FeatureVector::from_pairs([("ph", 6.2), ("rainfall", 1200.0), ("temperature", 27.0)]);

    c.bench_function("crop_recommend", |b| {
        b.iter(|| black_box(recommender.recommend(black_box(&input))))
    });
}

fn bench_price_fit(c: &mut Criterion) {
    let history = synthetic_history("maize", 365, &mut StdRng::seed_from_u64(42));
    let solver = GradientDescent::default();

    let mut group = c.benchmark_group("price_fit");
    for kind in [RegressionKind::Linear, RegressionKind::Multivariate] {
        group.bench_with_input(
            BenchmarkId::from_parameter(kind.algorithm()),
            &kind,
            |b, kind| b.iter(|| black_box(PriceModel::fit(*kind, &history, &solver))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_assessment,
    bench_batch,
    bench_crop_rules,
    bench_price_fit
);
criterion_main!(benches);
