//! Statistical detection: z-score outliers confirmed against IQR bounds,
//! plus a trend-change scan over the recent history.

use super::types::{AnomalyType, DetectedAnomaly, Severity};
use crate::config::DetectionConfig;
use crate::metrics::PerformanceMetric;
use crate::stats::{iqr_bounds, mean, trend_strength, z_score};
use tracing::debug;

/// Nominal z-score threshold before the sensitivity multiplier
const Z_THRESHOLD: f64 = 3.0;

/// Nominal relative change for the trend scan before the multiplier
const TREND_CHANGE_THRESHOLD: f64 = 0.30;

/// Points compared on each side of the trend window
const TREND_WINDOW: usize = 5;

/// Minimum history for IQR confirmation; below this quartiles collapse
const MIN_IQR_POINTS: usize = 4;

pub(super) fn detect(
    metrics: &[PerformanceMetric],
    config: &DetectionConfig,
) -> Vec<DetectedAnomaly> {
    let mut anomalies = Vec::new();
    for metric in metrics {
        if let Some(anomaly) = detect_outlier(metric, config.sensitivity) {
            anomalies.push(anomaly);
        }
        if let Some(anomaly) = detect_trend_change(metric, config.sensitivity) {
            anomalies.push(anomaly);
        }
    }
    anomalies
}

/// Z-score outlier gated by IQR confirmation.
///
/// Both signals must agree: the z-score must exceed the threshold AND the
/// current value must fall outside the IQR bounds of the history. A value
/// back inside the bounds is suppressed even with an extreme z-score.
fn detect_outlier(metric: &PerformanceMetric, sensitivity: f64) -> Option<DetectedAnomaly> {
    let threshold = Z_THRESHOLD * sensitivity;
    let z = z_score(metric.current_value, metric.mean, metric.std_deviation);
    if z <= threshold {
        return None;
    }

    let history = metric.historical_series();
    if history.len() < MIN_IQR_POINTS {
        debug!(
            metric = %metric.metric_name,
            points = history.len(),
            "history too short for IQR confirmation; skipping"
        );
        return None;
    }
    let bounds = iqr_bounds(&history)?;
    if bounds.contains(metric.current_value) {
        debug!(
            metric = %metric.metric_name,
            z_score = z,
            "z-score exceeded threshold but value sits within IQR bounds; suppressed"
        );
        return None;
    }

    let anomaly_type = if metric.current_value > metric.mean {
        AnomalyType::Spike
    } else {
        AnomalyType::Drop
    };

    Some(DetectedAnomaly::new(
        metric.metric_name.clone(),
        anomaly_type,
        Severity::from_score(z),
        (z / (threshold * 2.0)).min(1.0),
        metric.current_value,
        (bounds.lower_bound, bounds.upper_bound),
        format!(
            "{} at {:.2} deviates {:.2} standard deviations from its mean of {:.2} and breaches the IQR bounds",
            metric.metric_name, metric.current_value, z, metric.mean
        ),
    ))
}

/// Shift between the mean of the last five points and the five before them.
///
/// Requires at least ten historical points; fewer silently skips the metric.
fn detect_trend_change(metric: &PerformanceMetric, sensitivity: f64) -> Option<DetectedAnomaly> {
    let history = metric.historical_series();
    if history.len() < 2 * TREND_WINDOW {
        return None;
    }

    let recent = mean(&history[history.len() - TREND_WINDOW..]);
    let previous = mean(&history[history.len() - 2 * TREND_WINDOW..history.len() - TREND_WINDOW]);
    if previous.abs() < f64::EPSILON {
        return None;
    }

    let relative_change = ((recent - previous) / previous).abs();
    let threshold = TREND_CHANGE_THRESHOLD * sensitivity;
    if relative_change <= threshold {
        return None;
    }

    // dimensionless multiple of the threshold; feeds the shared severity ladder
    let score = relative_change / threshold;
    let strength = trend_strength(&history[history.len() - 2 * TREND_WINDOW..]).unwrap_or(0.0);

    Some(DetectedAnomaly::new(
        metric.metric_name.clone(),
        AnomalyType::PatternChange,
        Severity::from_score(score),
        (relative_change / (threshold * 2.0)).min(1.0),
        recent,
        (previous * (1.0 - threshold), previous * (1.0 + threshold)),
        format!(
            "{} mean shifted {:.1}% over the last {} points (trend fit {:.2})",
            metric.metric_name,
            relative_change * 100.0,
            TREND_WINDOW,
            strength
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TimeSeriesPoint;
    use chrono::{TimeZone, Utc};

    fn history(values: &[f64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap();
                TimeSeriesPoint::new(ts, v)
            })
            .collect()
    }

    fn config() -> DetectionConfig {
        DetectionConfig::default()
    }

    #[test]
    fn test_outlier_requires_both_signals() {
        // z-score is extreme but history is wide enough that the value sits
        // inside the IQR bounds: no anomaly
        let wide: Vec<f64> = (0..40).map(|i| (i * 10) as f64).collect();
        let metric = PerformanceMetric::new("response_time")
            .with_current_value(210.0)
            .with_mean(200.0)
            .with_std_deviation(1.0)
            .with_historical_values(history(&wide));

        let anomalies = detect(&[metric], &config());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_outlier_fires_when_iqr_confirms() {
        let tight: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
        let metric = PerformanceMetric::new("response_time")
            .with_current_value(180.0)
            .with_mean(102.0)
            .with_std_deviation(2.0)
            .with_historical_values(history(&tight));

        let anomalies = detect(&[metric], &config());
        assert_eq!(anomalies.len(), 1);
        let anomaly = &anomalies[0];
        assert_eq!(anomaly.anomaly_type, AnomalyType::Spike);
        assert_eq!(anomaly.severity, Severity::Critical);
        assert_eq!(anomaly.confidence, 1.0);
        assert!(anomaly.expected_range.0 <= anomaly.expected_range.1);
    }

    #[test]
    fn test_drop_typing_below_mean() {
        let tight: Vec<f64> = (0..40).map(|i| 100.0 + (i % 5) as f64).collect();
        let metric = PerformanceMetric::new("medication_accuracy")
            .with_current_value(20.0)
            .with_mean(102.0)
            .with_std_deviation(2.0)
            .with_historical_values(history(&tight));

        let anomalies = detect(&[metric], &config());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].anomaly_type, AnomalyType::Drop);
    }

    #[test]
    fn test_short_history_skips_outlier_silently() {
        let metric = PerformanceMetric::new("error_rate")
            .with_current_value(10.0)
            .with_mean(1.0)
            .with_std_deviation(0.1)
            .with_historical_values(history(&[1.0, 1.1]));

        assert!(detect(&[metric], &config()).is_empty());
    }

    #[test]
    fn test_trend_change_detected_on_level_shift() {
        // flat at 10, then a sustained level shift to 20
        let series = [
            10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0,
            20.0,
        ];
        let metric = PerformanceMetric::new("request_rate")
            .with_current_value(20.0)
            .with_mean(20.0)
            .with_std_deviation(10.0)
            .with_historical_values(history(&series));

        let anomalies = detect(&[metric], &config());
        assert_eq!(anomalies.len(), 1);
        let anomaly = &anomalies[0];
        assert_eq!(anomaly.anomaly_type, AnomalyType::PatternChange);
        // relative change 1.0 against threshold 0.21: critical on the ladder
        assert_eq!(anomaly.severity, Severity::Critical);
        assert_eq!(anomaly.confidence, 1.0);
    }

    #[test]
    fn test_trend_change_needs_ten_points() {
        let series = [10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0, 20.0];
        let metric = PerformanceMetric::new("request_rate")
            .with_current_value(20.0)
            .with_mean(20.0)
            .with_std_deviation(10.0)
            .with_historical_values(history(&series));

        assert!(detect(&[metric], &config()).is_empty());
    }

    #[test]
    fn test_stable_series_produces_nothing() {
        let series: Vec<f64> = (0..30).map(|i| 50.0 + (i % 3) as f64).collect();
        let metric = PerformanceMetric::new("request_rate")
            .with_current_value(51.0)
            .with_mean(51.0)
            .with_std_deviation(1.0)
            .with_historical_values(history(&series));

        assert!(detect(&[metric], &config()).is_empty());
    }

    #[test]
    fn test_zero_previous_mean_skips_trend_scan() {
        let series = [0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let metric = PerformanceMetric::new("request_rate")
            .with_current_value(5.0)
            .with_mean(5.0)
            .with_std_deviation(5.0)
            .with_historical_values(history(&series));

        assert!(detect(&[metric], &config()).is_empty());
    }
}
