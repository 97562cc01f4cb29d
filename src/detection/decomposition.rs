//! Decomposition-based detection: z-scoring the latest residual after
//! seasonal decomposition of the metric's history.
//!
//! Configured upstream as `ml_based`; no trained model is involved.

use super::types::{AnomalyType, DetectedAnomaly, Severity};
use crate::config::DetectionConfig;
use crate::metrics::PerformanceMetric;
use crate::stats::{decompose, mean, population_std, z_score, DEFAULT_SEASONAL_PERIOD};
use tracing::debug;

/// Nominal residual z-score threshold before the sensitivity multiplier
const RESIDUAL_Z_THRESHOLD: f64 = 2.5;

pub(super) fn detect(
    metrics: &[PerformanceMetric],
    config: &DetectionConfig,
) -> Vec<DetectedAnomaly> {
    metrics
        .iter()
        .filter_map(|metric| detect_metric(metric, config))
        .collect()
}

fn detect_metric(metric: &PerformanceMetric, config: &DetectionConfig) -> Option<DetectedAnomaly> {
    let history = metric.historical_series();
    if history.len() < config.minimum_data_points {
        debug!(
            metric = %metric.metric_name,
            points = history.len(),
            required = config.minimum_data_points,
            "insufficient history for decomposition; skipping"
        );
        return None;
    }

    // the current value is evaluated as the latest observation of the series
    let mut series = history;
    series.push(metric.current_value);

    let parts = decompose(&series, DEFAULT_SEASONAL_PERIOD);
    let residual_mean = mean(&parts.residual);
    let residual_std = population_std(&parts.residual);

    let last = parts.len() - 1;
    let latest_residual = parts.residual[last];
    let z = z_score(latest_residual, residual_mean, residual_std);

    let threshold = RESIDUAL_Z_THRESHOLD * config.sensitivity;
    if z <= threshold {
        return None;
    }

    let seasonal_last = parts.seasonal[last];
    let anomaly_type = if config.seasonal_adjustment && seasonal_last.abs() > 2.0 * residual_std {
        AnomalyType::SeasonalDeviation
    } else if latest_residual > 0.0 {
        AnomalyType::Spike
    } else {
        AnomalyType::Drop
    };

    let expected_center = parts.trend[last] + seasonal_last;
    Some(DetectedAnomaly::new(
        metric.metric_name.clone(),
        anomaly_type,
        Severity::from_score(z),
        (z / (threshold * 2.0)).min(1.0),
        metric.current_value,
        (
            expected_center - 2.0 * residual_std,
            expected_center + 2.0 * residual_std,
        ),
        format!(
            "{} residual of {:.2} deviates {:.2} standard deviations from the decomposed baseline",
            metric.metric_name, latest_residual, z
        ),
    ))
}
