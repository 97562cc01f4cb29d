//! Input snapshot types consumed by the detection engine.
//!
//! A [`PerformanceMetric`] is an immutable per-metric snapshot supplied by the
//! caller for a single detection run; the engine never mutates it and never
//! persists it.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single observation in a chronological time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation timestamp
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Creates a new time series point
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Direction a metric has been moving over its recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Metric is getting worse
    Declining,
    /// No meaningful movement
    Stable,
    /// Metric is getting better
    Improving,
}

impl Trend {
    /// Numeric sign used as an isolation feature (-1 / 0 / 1)
    pub fn sign(&self) -> f64 {
        match self {
            Trend::Declining => -1.0,
            Trend::Stable => 0.0,
            Trend::Improving => 1.0,
        }
    }
}

/// Distribution percentiles carried with a metric snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Percentiles {
    /// 25th percentile
    pub p25: f64,
    /// 75th percentile
    pub p75: f64,
}

/// Immutable per-metric performance snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PerformanceMetric {
    /// Metric identifier (e.g. `error_rate`, `medication_accuracy`)
    #[validate(length(min = 1, message = "metric_name must not be empty"))]
    pub metric_name: String,
    /// Latest observed value
    pub current_value: f64,
    /// Rolling mean over the baseline window
    pub mean: f64,
    /// Rolling standard deviation over the baseline window
    #[validate(range(min = 0.0, message = "std_deviation must be non-negative"))]
    pub std_deviation: f64,
    /// Chronologically ordered historical observations
    pub historical_values: Vec<TimeSeriesPoint>,
    /// Relative change against the previous observation window (percent)
    pub percentage_change: f64,
    /// Distribution percentiles
    pub percentiles: Percentiles,
    /// Recent movement direction
    pub trend: Trend,
    /// Anomaly flag set by the caller or a previous pass
    pub is_anomaly: bool,
}

impl PerformanceMetric {
    /// Creates a new metric snapshot with neutral defaults
    pub fn new(metric_name: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            current_value: 0.0,
            mean: 0.0,
            std_deviation: 0.0,
            historical_values: Vec::new(),
            percentage_change: 0.0,
            percentiles: Percentiles::default(),
            trend: Trend::Stable,
            is_anomaly: false,
        }
    }

    /// Sets the current value
    pub fn with_current_value(mut self, value: f64) -> Self {
        self.current_value = value;
        self
    }

    /// Sets the rolling mean
    pub fn with_mean(mut self, mean: f64) -> Self {
        self.mean = mean;
        self
    }

    /// Sets the rolling standard deviation
    pub fn with_std_deviation(mut self, std_deviation: f64) -> Self {
        self.std_deviation = std_deviation;
        self
    }

    /// Sets the historical series
    pub fn with_historical_values(mut self, values: Vec<TimeSeriesPoint>) -> Self {
        self.historical_values = values;
        self
    }

    /// Sets the percentage change
    pub fn with_percentage_change(mut self, change: f64) -> Self {
        self.percentage_change = change;
        self
    }

    /// Sets the percentiles
    pub fn with_percentiles(mut self, p25: f64, p75: f64) -> Self {
        self.percentiles = Percentiles { p25, p75 };
        self
    }

    /// Sets the trend direction
    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    /// Sets the caller-provided anomaly flag
    pub fn with_anomaly_flag(mut self, is_anomaly: bool) -> Self {
        self.is_anomaly = is_anomaly;
        self
    }

    /// Historical values as a plain numeric series
    pub fn historical_series(&self) -> Vec<f64> {
        self.historical_values.iter().map(|p| p.value).collect()
    }

    /// Validates the snapshot shape at the service boundary.
    ///
    /// Malformed shapes fail fast here so the algorithms can stay total over
    /// their numeric input: every float must be finite and the standard
    /// deviation non-negative.
    pub fn validate_shape(&self) -> Result<()> {
        self.validate().map_err(|e| {
            Error::Validation(format!("metric '{}': {}", self.metric_name, e))
        })?;

        let named_fields = [
            ("current_value", self.current_value),
            ("mean", self.mean),
            ("std_deviation", self.std_deviation),
            ("percentage_change", self.percentage_change),
            ("percentiles.p25", self.percentiles.p25),
            ("percentiles.p75", self.percentiles.p75),
        ];
        for (name, value) in named_fields {
            if !value.is_finite() {
                return Err(Error::Validation(format!(
                    "metric '{}': {} must be a finite number",
                    self.metric_name, name
                )));
            }
        }

        if let Some(point) = self.historical_values.iter().find(|p| !p.value.is_finite()) {
            return Err(Error::Validation(format!(
                "metric '{}': historical value at {} is not finite",
                self.metric_name, point.timestamp
            )));
        }

        Ok(())
    }
}
