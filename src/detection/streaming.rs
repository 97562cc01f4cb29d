//! Streaming Evaluation
//!
//! ストリーミング評価器（メトリクス別の履歴ウィンドウ）

use crate::stats::{mean, population_std, z_score};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Observations required before a window produces a usable score
const MIN_WINDOW_POINTS: usize = 2;

/// Score for a single streamed observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingScore {
    /// Whether the observation crossed the z-score threshold
    pub is_anomaly: bool,
    /// Normalized anomaly score in `[0, 1]`
    pub score: f64,
    /// Raw z-score against the window baseline
    pub z_score: f64,
}

/// Streaming evaluator keeping a bounded history window per metric.
///
/// Complements the batch service for callers that feed observations one at a
/// time: each observation is scored against the window accumulated so far,
/// then appended, evicting the oldest point at capacity.
#[derive(Debug)]
pub struct StreamingDetector {
    capacity: usize,
    z_threshold: f64,
    windows: HashMap<String, VecDeque<f64>>,
}

impl StreamingDetector {
    /// Creates a detector with the given per-metric window capacity and
    /// z-score threshold
    pub fn new(capacity: usize, z_threshold: f64) -> Self {
        Self {
            capacity: capacity.max(MIN_WINDOW_POINTS),
            z_threshold,
            windows: HashMap::new(),
        }
    }

    /// Scores one observation against its metric's window, then records it
    pub fn observe(&mut self, metric_name: &str, value: f64) -> StreamingScore {
        let window = self
            .windows
            .entry(metric_name.to_string())
            .or_insert_with(VecDeque::new);

        let score = score_against_window(window, value, self.z_threshold);
        if score.is_anomaly {
            debug!(metric = metric_name, value, z = score.z_score, "streamed anomaly");
        }

        if window.len() >= self.capacity {
            window.pop_front();
        }
        window.push_back(value);

        score
    }

    /// Number of points currently buffered for a metric
    pub fn window_len(&self, metric_name: &str) -> usize {
        self.windows.get(metric_name).map_or(0, VecDeque::len)
    }

    /// Drops all buffered windows
    pub fn reset(&mut self) {
        self.windows.clear();
    }
}

fn score_against_window(window: &VecDeque<f64>, value: f64, z_threshold: f64) -> StreamingScore {
    if window.len() < MIN_WINDOW_POINTS {
        return StreamingScore {
            is_anomaly: false,
            score: 0.0,
            z_score: 0.0,
        };
    }

    let values: Vec<f64> = window.iter().copied().collect();
    let z = z_score(value, mean(&values), population_std(&values));

    StreamingScore {
        is_anomaly: z > z_threshold,
        score: (z / (z_threshold * 2.0)).min(1.0),
        z_score: z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underfilled_window_reports_nothing() {
        let mut detector = StreamingDetector::new(100, 3.0);

        let score = detector.observe("cpu", 10.0);
        assert!(!score.is_anomaly);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_spike_against_established_window() {
        let mut detector = StreamingDetector::new(100, 3.0);
        for i in 0..20 {
            detector.observe("cpu", 50.0 + (i % 5) as f64);
        }

        let normal = detector.observe("cpu", 53.0);
        assert!(!normal.is_anomaly);

        let spike = detector.observe("cpu", 150.0);
        assert!(spike.is_anomaly);
        assert!(spike.z_score > 3.0);
    }

    #[test]
    fn test_window_eviction_at_capacity() {
        let mut detector = StreamingDetector::new(5, 3.0);
        for i in 0..12 {
            detector.observe("memory", i as f64);
        }

        assert_eq!(detector.window_len("memory"), 5);
    }

    #[test]
    fn test_metrics_keep_independent_windows() {
        let mut detector = StreamingDetector::new(50, 3.0);
        for _ in 0..10 {
            detector.observe("a", 1.0);
        }

        assert_eq!(detector.window_len("a"), 10);
        assert_eq!(detector.window_len("b"), 0);
    }

    #[test]
    fn test_reset_clears_windows() {
        let mut detector = StreamingDetector::new(50, 3.0);
        detector.observe("a", 1.0);
        detector.reset();

        assert_eq!(detector.window_len("a"), 0);
    }
}
