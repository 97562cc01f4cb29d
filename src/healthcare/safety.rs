//! Patient Safety Risk Assessment
//!
//! 患者安全リスク評価

use super::tables::{
    critical_metric_weight, segments_for_metric, SAFETY_REPORT_THRESHOLD, SAFETY_Z_THRESHOLD,
};
use super::types::{PatientSafetyAnalysis, PatientSegment, Urgency};
use crate::metrics::PerformanceMetric;
use crate::stats::z_score;
use tracing::debug;

/// Assesses patient-safety risk across a metric batch.
///
/// Only whitelisted critical metrics participate. Each one is z-scored against
/// its own baseline; past the threshold it contributes
/// `min(100, z * weight * 10)` and the maximum contribution becomes the risk
/// score. `segments` filters which implicated cohorts are reported; an empty
/// list means no filter.
pub fn assess_patient_safety(
    metrics: &[PerformanceMetric],
    segments: &[PatientSegment],
) -> PatientSafetyAnalysis {
    let mut risk_score: f64 = 0.0;
    let mut affected: Vec<PatientSegment> = Vec::new();

    for metric in metrics {
        let weight = match critical_metric_weight(&metric.metric_name) {
            Some(weight) => weight,
            None => continue,
        };

        let z = z_score(metric.current_value, metric.mean, metric.std_deviation);
        if z <= SAFETY_Z_THRESHOLD {
            continue;
        }

        let contribution = (z * weight * 10.0).min(100.0);
        debug!(
            metric = %metric.metric_name,
            z_score = z,
            contribution,
            "critical metric crossed safety threshold"
        );
        if contribution > risk_score {
            risk_score = contribution;
        }

        for segment in segments_for_metric(&metric.metric_name) {
            let selected = segments.is_empty() || segments.contains(segment);
            if selected && !affected.contains(segment) {
                affected.push(*segment);
            }
        }
    }

    PatientSafetyAnalysis {
        has_anomaly: risk_score > SAFETY_REPORT_THRESHOLD,
        urgency: Urgency::from_risk_score(risk_score),
        affected_segments: affected,
        risk_score,
    }
}
