//! Criterion benchmarks for the detection pipeline.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use healthwatch_rs::{
    AnomalyDetectionService, DetectionAlgorithm, DetectionConfig, PerformanceMetric,
    TimeSeriesPoint,
};

fn history(n: usize, base: f64) -> Vec<TimeSeriesPoint> {
    let pattern = [0.0, 3.0, 5.0, 2.0, -1.0, -4.0, -3.0];
    (0..n)
        .map(|i| {
            let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap();
            let value = base + pattern[i % 7] + ((i % 3) as f64 - 1.0) * 0.4;
            TimeSeriesPoint::new(ts, value)
        })
        .collect()
}

fn metric_batch(metric_count: usize, history_len: usize) -> Vec<PerformanceMetric> {
    (0..metric_count)
        .map(|i| {
            let base = 50.0 + i as f64;
            let current = if i % 7 == 0 { base + 45.0 } else { base + 1.0 };
            PerformanceMetric::new(format!("metric_{}", i))
                .with_current_value(current)
                .with_mean(base)
                .with_std_deviation(3.0)
                .with_percentage_change(if i % 7 == 0 { 90.0 } else { 2.0 })
                .with_historical_values(history(history_len, base))
        })
        .collect()
}

fn bench_detection(c: &mut Criterion) {
    let batch = metric_batch(20, 120);

    let hybrid = AnomalyDetectionService::new(
        DetectionConfig::default().with_random_seed(7),
    );
    c.bench_function("hybrid_20_metrics_120_points", |b| {
        b.iter(|| hybrid.detect_anomalies(black_box(&batch), None).unwrap())
    });

    let decomposition = AnomalyDetectionService::new(
        DetectionConfig::default().with_algorithm(DetectionAlgorithm::Decomposition),
    );
    c.bench_function("decomposition_20_metrics_120_points", |b| {
        b.iter(|| {
            decomposition
                .detect_anomalies(black_box(&batch), None)
                .unwrap()
        })
    });

    let statistical = AnomalyDetectionService::new(
        DetectionConfig::default().with_algorithm(DetectionAlgorithm::Statistical),
    );
    c.bench_function("statistical_20_metrics_120_points", |b| {
        b.iter(|| {
            statistical
                .detect_anomalies(black_box(&batch), None)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_detection);
criterion_main!(benches);
