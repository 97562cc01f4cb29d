//! Isolation-forest style detection over the metric batch.
//!
//! Each metric becomes a small feature vector; repeated random axis-aligned
//! splits estimate how quickly a point separates from the rest of the batch.
//! Points that isolate in short paths score close to 1. The random source is
//! an injected seedable PRNG so identical seeds reproduce identical scores.

use super::types::{AnomalyType, DetectedAnomaly, Severity};
use crate::config::DetectionConfig;
use crate::metrics::PerformanceMetric;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Number of random trees averaged per score
const TREE_COUNT: usize = 10;

/// Maximum partition depth per tree
const MAX_DEPTH: usize = 10;

/// Nominal score threshold before the sensitivity multiplier
const SCORE_THRESHOLD: f64 = 0.6;

/// Scale factor mapping a [0, 1] isolation score onto the shared severity ladder
const SEVERITY_SCALE: f64 = 5.0;

/// Features per metric: value, relative change, dispersion, trend direction
const FEATURE_COUNT: usize = 4;

fn features(metric: &PerformanceMetric) -> [f64; FEATURE_COUNT] {
    [
        metric.current_value,
        metric.percentage_change,
        metric.std_deviation,
        metric.trend.sign(),
    ]
}

pub(super) fn detect(
    metrics: &[PerformanceMetric],
    config: &DetectionConfig,
    rng: &mut StdRng,
) -> Vec<DetectedAnomaly> {
    // isolation needs at least two points to partition against
    if metrics.len() < 2 {
        return Vec::new();
    }

    let data: Vec<[f64; FEATURE_COUNT]> = metrics.iter().map(features).collect();
    let threshold = SCORE_THRESHOLD * config.sensitivity;

    let mut anomalies = Vec::new();
    for (index, metric) in metrics.iter().enumerate() {
        let score = isolation_score(&data, index, rng);
        debug!(metric = %metric.metric_name, score, "isolation score");
        if score <= threshold {
            continue;
        }

        anomalies.push(DetectedAnomaly::new(
            metric.metric_name.clone(),
            if metric.current_value >= metric.mean {
                AnomalyType::Spike
            } else {
                AnomalyType::Drop
            },
            Severity::from_score(score * SEVERITY_SCALE),
            (score / (threshold * 2.0)).min(1.0),
            metric.current_value,
            (
                metric.mean - 2.0 * metric.std_deviation,
                metric.mean + 2.0 * metric.std_deviation,
            ),
            format!(
                "{} isolates from the batch with score {:.2} across {} random trees",
                metric.metric_name, score, TREE_COUNT
            ),
        ));
    }
    anomalies
}

/// Average-path-length isolation score, normalized to [0, 1] via
/// `2^(-E(h) / c(n))`.
fn isolation_score(data: &[[f64; FEATURE_COUNT]], target: usize, rng: &mut StdRng) -> f64 {
    let reference = average_path_length(data.len());
    if reference <= 0.0 {
        return 0.0;
    }

    let total: f64 = (0..TREE_COUNT)
        .map(|_| isolation_path_length(data, target, rng))
        .sum();
    let expected = total / TREE_COUNT as f64;

    2f64.powf(-expected / reference)
}

/// Path length until the target separates from the rest of its partition,
/// with the standard `c(|partition|)` adjustment when depth runs out first.
fn isolation_path_length(
    data: &[[f64; FEATURE_COUNT]],
    target: usize,
    rng: &mut StdRng,
) -> f64 {
    let mut members: Vec<usize> = (0..data.len()).collect();
    let mut depth = 0usize;

    while depth < MAX_DEPTH && members.len() > 1 {
        let (attribute, min, max) = match pick_split_attribute(data, &members, rng) {
            Some(split) => split,
            None => break,
        };

        let split = rng.gen_range(min..max);
        let target_side = data[target][attribute] < split;
        members.retain(|&m| (data[m][attribute] < split) == target_side);
        depth += 1;
    }

    if members.len() > 1 {
        depth as f64 + average_path_length(members.len())
    } else {
        depth as f64
    }
}

/// Random attribute with a non-degenerate value range among the partition
fn pick_split_attribute(
    data: &[[f64; FEATURE_COUNT]],
    members: &[usize],
    rng: &mut StdRng,
) -> Option<(usize, f64, f64)> {
    let mut candidates: Vec<(usize, f64, f64)> = Vec::with_capacity(FEATURE_COUNT);
    for attribute in 0..FEATURE_COUNT {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &m in members {
            min = min.min(data[m][attribute]);
            max = max.max(data[m][attribute]);
        }
        if max > min {
            candidates.push((attribute, min, max));
        }
    }
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Expected unsuccessful-search path length of a binary search tree over `n`
/// points: `2 H(n-1) - 2 (n-1)/n`, with `H(k) ≈ ln(k) + γ`.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;
    let k = (n - 1) as f64;
    2.0 * (k.ln() + EULER_MASCHERONI) - 2.0 * k / n as f64
}
