//! Anomaly Detection Types
//!
//! 異常検知用の型定義

use crate::healthcare::{ComplianceAnalysis, ComplianceCategory, PatientSafetyAnalysis, PatientSegment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detection algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionAlgorithm {
    /// Z-score outliers confirmed against IQR bounds, plus trend-change scan
    Statistical,
    /// Seasonal-decomposition residual analysis. The upstream configuration
    /// key is kept as `ml_based` even though no trained model is involved.
    #[serde(rename = "ml_based")]
    Decomposition,
    /// Random-split isolation scoring over the metric batch
    IsolationForest,
    /// Union of statistical and isolation results, deduplicated by metric
    #[default]
    Hybrid,
}

/// Kind of deviation an anomaly represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Sudden move above the expected range
    Spike,
    /// Sudden move below the expected range
    Drop,
    /// Sustained shift in the recent mean
    PatternChange,
    /// Deviation attributable to the seasonal component
    SeasonalDeviation,
}

/// Anomaly severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Within noise, worth recording
    Low,
    /// Worth a look
    Medium,
    /// Needs attention
    High,
    /// Needs immediate attention
    Critical,
}

impl Severity {
    /// Maps a z-scaled detection score onto the shared severity ladder
    pub fn from_score(score: f64) -> Self {
        if score > 4.0 {
            Severity::Critical
        } else if score > 3.0 {
            Severity::High
        } else if score > 2.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// A single detected anomaly, created fresh each detection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedAnomaly {
    /// Metric the anomaly was detected on
    pub metric_name: String,
    /// Kind of deviation
    pub anomaly_type: AnomalyType,
    /// Severity derived from the triggering score
    pub severity: Severity,
    /// Detection confidence in `[0, 1]`
    pub confidence: f64,
    /// Detection timestamp
    pub detected_at: DateTime<Utc>,
    /// Observed value that triggered the anomaly
    pub value: f64,
    /// Range the value was expected to fall into
    pub expected_range: (f64, f64),
    /// Human-readable explanation
    pub description: String,
}

impl DetectedAnomaly {
    /// Creates a new anomaly, clamping confidence into `[0, 1]` and ordering
    /// the expected range
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metric_name: impl Into<String>,
        anomaly_type: AnomalyType,
        severity: Severity,
        confidence: f64,
        value: f64,
        expected_range: (f64, f64),
        description: impl Into<String>,
    ) -> Self {
        let (lo, hi) = expected_range;
        let expected_range = if lo <= hi { (lo, hi) } else { (hi, lo) };

        Self {
            metric_name: metric_name.into(),
            anomaly_type,
            severity,
            confidence: confidence.clamp(0.0, 1.0),
            detected_at: Utc::now(),
            value,
            expected_range,
            description: description.into(),
        }
    }
}

/// Optional healthcare context supplied alongside a detection run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionContext {
    /// Patient cohorts the caller cares about; empty means no cohort filter
    pub patient_segments: Vec<PatientSegment>,
    /// Compliance categories to assess
    pub compliance_categories: Vec<ComplianceCategory>,
}

impl DetectionContext {
    /// Creates an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the patient segments
    pub fn with_patient_segments(mut self, segments: Vec<PatientSegment>) -> Self {
        self.patient_segments = segments;
        self
    }

    /// Sets the compliance categories
    pub fn with_compliance_categories(mut self, categories: Vec<ComplianceCategory>) -> Self {
        self.compliance_categories = categories;
        self
    }
}

/// Anomaly counts broken down by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    /// Increments the counter for one severity
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Anomaly counts broken down by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub spikes: usize,
    pub drops: usize,
    pub pattern_changes: usize,
    pub seasonal_deviations: usize,
}

impl TypeCounts {
    /// Increments the counter for one anomaly type
    pub fn record(&mut self, anomaly_type: AnomalyType) {
        match anomaly_type {
            AnomalyType::Spike => self.spikes += 1,
            AnomalyType::Drop => self.drops += 1,
            AnomalyType::PatternChange => self.pattern_changes += 1,
            AnomalyType::SeasonalDeviation => self.seasonal_deviations += 1,
        }
    }
}

/// Aggregate view over the ranked anomaly list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalySummary {
    /// Total anomalies after confidence filtering
    pub total_anomalies: usize,
    /// Counts by severity
    pub by_severity: SeverityCounts,
    /// Counts by anomaly type
    pub by_type: TypeCounts,
    /// Highest confidence among the anomalies (0 when none)
    pub max_confidence: f64,
    /// Metric of the single most critical anomaly, if any
    pub most_critical_metric: Option<String>,
}

/// Result of a single detection run; immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetectionResult {
    /// Anomalies ranked by severity, then confidence
    pub anomalies: Vec<DetectedAnomaly>,
    /// Patient-safety overlay, when segment context was supplied
    pub patient_safety: Option<PatientSafetyAnalysis>,
    /// Compliance overlay, when category context was supplied
    pub compliance: Option<ComplianceAnalysis>,
    /// Aggregate summary
    pub summary: AnomalySummary,
    /// Up to five remediation recommendations
    pub recommendations: Vec<String>,
}
