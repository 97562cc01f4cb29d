//! Detection service: algorithm dispatch, filtering, ranking and reporting.

use super::types::{
    AnomalyDetectionResult, AnomalySummary, AnomalyType, DetectedAnomaly, DetectionAlgorithm,
    DetectionContext,
};
use super::{decomposition, isolation, statistical};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::healthcare::{assess_compliance, assess_patient_safety, PatientSafetyAnalysis};
use crate::metrics::PerformanceMetric;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

/// Maximum recommendations attached to a result
const MAX_RECOMMENDATIONS: usize = 5;

/// Single-call anomaly detection over a batch of metric snapshots.
///
/// The service holds only its configuration; every call takes an immutable
/// snapshot and returns a fresh result, so concurrent calls need no locking.
#[derive(Debug, Clone)]
pub struct AnomalyDetectionService {
    config: DetectionConfig,
}

impl AnomalyDetectionService {
    /// Creates a service with the given configuration
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Creates a service with the default configuration
    pub fn with_defaults() -> Self {
        Self::new(DetectionConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Runs detection over a metric batch with optional healthcare context.
    ///
    /// Every metric is validated at the boundary before any algorithm runs;
    /// an empty batch is a valid input yielding a neutral result. Detection
    /// itself never errors: metrics that cannot be analyzed are skipped.
    pub fn detect_anomalies(
        &self,
        metrics: &[PerformanceMetric],
        context: Option<&DetectionContext>,
    ) -> Result<AnomalyDetectionResult> {
        for metric in metrics {
            metric.validate_shape()?;
        }

        if metrics.is_empty() {
            return Ok(AnomalyDetectionResult {
                anomalies: Vec::new(),
                patient_safety: None,
                compliance: None,
                summary: AnomalySummary::default(),
                recommendations: Vec::new(),
            });
        }

        info!(
            metric_count = metrics.len(),
            algorithm = ?self.config.algorithm,
            "running anomaly detection"
        );

        // fresh PRNG per call keeps results reproducible and calls independent
        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        let mut anomalies = match self.config.algorithm {
            DetectionAlgorithm::Statistical => statistical::detect(metrics, &self.config),
            DetectionAlgorithm::Decomposition => decomposition::detect(metrics, &self.config),
            DetectionAlgorithm::IsolationForest => {
                isolation::detect(metrics, &self.config, &mut rng)
            }
            DetectionAlgorithm::Hybrid => merge_by_confidence(
                statistical::detect(metrics, &self.config),
                isolation::detect(metrics, &self.config, &mut rng),
            ),
        };

        anomalies.retain(|a| a.confidence >= self.config.confidence_threshold);
        rank(&mut anomalies);
        debug!(anomaly_count = anomalies.len(), "anomalies after filter and rank");

        let patient_safety = match context {
            Some(ctx) if self.config.patient_safety_analysis => {
                Some(assess_patient_safety(metrics, &ctx.patient_segments))
            }
            _ => None,
        };
        let compliance = match context {
            Some(ctx) if self.config.compliance_analysis => {
                Some(assess_compliance(metrics, &ctx.compliance_categories))
            }
            _ => None,
        };

        let summary = build_summary(&anomalies);
        let recommendations =
            build_recommendations(&anomalies, patient_safety.as_ref(), &self.config);

        Ok(AnomalyDetectionResult {
            anomalies,
            patient_safety,
            compliance,
            summary,
            recommendations,
        })
    }
}

/// Union of two anomaly lists, deduplicated by metric name keeping the
/// higher-confidence entry
fn merge_by_confidence(
    primary: Vec<DetectedAnomaly>,
    secondary: Vec<DetectedAnomaly>,
) -> Vec<DetectedAnomaly> {
    let mut best: HashMap<String, DetectedAnomaly> = HashMap::new();
    for anomaly in primary.into_iter().chain(secondary) {
        match best.get(&anomaly.metric_name) {
            Some(existing) if existing.confidence >= anomaly.confidence => {}
            _ => {
                best.insert(anomaly.metric_name.clone(), anomaly);
            }
        }
    }
    best.into_values().collect()
}

/// Orders by severity descending, then confidence descending; metric name
/// breaks remaining ties so results are stable across runs
fn rank(anomalies: &mut [DetectedAnomaly]) {
    anomalies.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal))
            .then_with(|| a.metric_name.cmp(&b.metric_name))
    });
}

fn build_summary(anomalies: &[DetectedAnomaly]) -> AnomalySummary {
    let mut summary = AnomalySummary {
        total_anomalies: anomalies.len(),
        ..AnomalySummary::default()
    };

    for anomaly in anomalies {
        summary.by_severity.record(anomaly.severity);
        summary.by_type.record(anomaly.anomaly_type);
        if anomaly.confidence > summary.max_confidence {
            summary.max_confidence = anomaly.confidence;
        }
    }
    summary.most_critical_metric = anomalies.first().map(|a| a.metric_name.clone());

    summary
}

fn build_recommendations(
    anomalies: &[DetectedAnomaly],
    patient_safety: Option<&PatientSafetyAnalysis>,
    config: &DetectionConfig,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if config.healthcare_recommendations {
        if let Some(safety) = patient_safety {
            if safety.has_anomaly {
                recommendations.push(format!(
                    "Escalate for clinical review: patient safety risk score {:.0} ({:?} urgency)",
                    safety.risk_score, safety.urgency
                ));
            }
        }
    }

    // one recommendation per anomaly type, in ranked order
    let mut seen_types: Vec<AnomalyType> = Vec::new();
    for anomaly in anomalies {
        if seen_types.contains(&anomaly.anomaly_type) {
            continue;
        }
        seen_types.push(anomaly.anomaly_type);
        recommendations.push(match anomaly.anomaly_type {
            AnomalyType::Spike => {
                "Investigate load and capacity: one or more metrics spiked above their expected range"
                    .to_string()
            }
            AnomalyType::Drop => {
                "Check recent deployments and system configuration: metric values dropped sharply"
                    .to_string()
            }
            AnomalyType::PatternChange => {
                "Review recent workflow or population changes: metric behavior shifted from its baseline"
                    .to_string()
            }
            AnomalyType::SeasonalDeviation => {
                "Compare against the same period in previous cycles: values deviate from the seasonal pattern"
                    .to_string()
            }
        });
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Severity;

    fn anomaly(name: &str, severity: Severity, confidence: f64) -> DetectedAnomaly {
        DetectedAnomaly::new(
            name,
            AnomalyType::Spike,
            severity,
            confidence,
            1.0,
            (0.0, 0.5),
            "test",
        )
    }

    #[test]
    fn test_rank_prefers_severity_over_confidence() {
        let mut anomalies = vec![
            anomaly("medium_high_confidence", Severity::Medium, 0.9),
            anomaly("critical_low_confidence", Severity::Critical, 0.5),
        ];
        rank(&mut anomalies);

        assert_eq!(anomalies[0].metric_name, "critical_low_confidence");
        assert_eq!(anomalies[1].metric_name, "medium_high_confidence");
    }

    #[test]
    fn test_rank_breaks_ties_by_confidence() {
        let mut anomalies = vec![
            anomaly("weaker", Severity::High, 0.82),
            anomaly("stronger", Severity::High, 0.95),
        ];
        rank(&mut anomalies);

        assert_eq!(anomalies[0].metric_name, "stronger");
    }

    #[test]
    fn test_merge_keeps_higher_confidence_per_metric() {
        let merged = merge_by_confidence(
            vec![anomaly("a", Severity::High, 0.7), anomaly("b", Severity::Low, 0.9)],
            vec![anomaly("a", Severity::Medium, 0.95)],
        );

        assert_eq!(merged.len(), 2);
        let a = merged.iter().find(|m| m.metric_name == "a").unwrap();
        assert_eq!(a.confidence, 0.95);
        assert_eq!(a.severity, Severity::Medium);
    }

    #[test]
    fn test_summary_counts_and_top_metric() {
        let mut anomalies = vec![
            anomaly("x", Severity::Low, 0.81),
            anomaly("y", Severity::Critical, 0.9),
            anomaly("z", Severity::Critical, 0.85),
        ];
        rank(&mut anomalies);
        let summary = build_summary(&anomalies);

        assert_eq!(summary.total_anomalies, 3);
        assert_eq!(summary.by_severity.critical, 2);
        assert_eq!(summary.by_severity.low, 1);
        assert_eq!(summary.by_type.spikes, 3);
        assert_eq!(summary.max_confidence, 0.9);
        assert_eq!(summary.most_critical_metric.as_deref(), Some("y"));
    }

    #[test]
    fn test_recommendations_dedupe_by_type_and_cap() {
        let anomalies: Vec<DetectedAnomaly> = (0..8)
            .map(|i| anomaly(&format!("m{}", i), Severity::High, 0.9))
            .collect();
        let recommendations =
            build_recommendations(&anomalies, None, &DetectionConfig::default());

        // eight spikes collapse into a single spike recommendation
        assert_eq!(recommendations.len(), 1);
        assert!(recommendations[0].contains("spiked"));
    }
}
