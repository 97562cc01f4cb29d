//! Compliance Violation Detection
//!
//! コンプライアンス違反検出

use super::tables::{relevant_metrics, remediation_for};
use super::types::{ComplianceAnalysis, ComplianceCategory, ComplianceViolation};
use crate::detection::Severity;
use crate::metrics::PerformanceMetric;
use tracing::debug;

/// Score every assessed category starts from
const CATEGORY_BASE_SCORE: f64 = 100.0;

/// Severity of a violation from the magnitude of the metric's change
fn severity_from_change(percentage_change: f64) -> Severity {
    let change = percentage_change.abs();
    if change > 50.0 {
        Severity::Critical
    } else if change > 30.0 {
        Severity::High
    } else if change > 15.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Score penalty applied per violation severity
fn severity_penalty(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 40.0,
        Severity::High => 25.0,
        Severity::Medium => 15.0,
        Severity::Low => 5.0,
    }
}

/// Assesses compliance posture across the supplied categories.
///
/// For each category, every relevant metric flagged `is_anomaly` derives a
/// violation and subtracts a fixed penalty from that category's starting
/// score of 100 (floored at 0). The overall score is the mean across the
/// supplied categories, or 100 when none were supplied.
pub fn assess_compliance(
    metrics: &[PerformanceMetric],
    categories: &[ComplianceCategory],
) -> ComplianceAnalysis {
    if categories.is_empty() {
        return ComplianceAnalysis {
            violations: Vec::new(),
            overall_compliance_score: CATEGORY_BASE_SCORE,
        };
    }

    let mut violations = Vec::new();
    let mut score_total = 0.0;

    for &category in categories {
        let mut category_score = CATEGORY_BASE_SCORE;
        let relevant = relevant_metrics(category);

        for metric in metrics {
            if !metric.is_anomaly || !relevant.contains(&metric.metric_name.as_str()) {
                continue;
            }

            let severity = severity_from_change(metric.percentage_change);
            category_score = (category_score - severity_penalty(severity)).max(0.0);
            debug!(
                category = ?category,
                metric = %metric.metric_name,
                severity = ?severity,
                category_score,
                "compliance violation derived"
            );

            violations.push(ComplianceViolation {
                category,
                metric: metric.metric_name.clone(),
                severity,
                description: format!(
                    "{} moved {:.1}% against its baseline while flagged anomalous",
                    metric.metric_name, metric.percentage_change
                ),
                remediation: remediation_for(category).to_string(),
            });
        }

        score_total += category_score;
    }

    ComplianceAnalysis {
        violations,
        overall_compliance_score: score_total / categories.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomalous_metric(name: &str, percentage_change: f64) -> PerformanceMetric {
        PerformanceMetric::new(name)
            .with_percentage_change(percentage_change)
            .with_anomaly_flag(true)
    }

    #[test]
    fn test_empty_categories_is_fully_compliant() {
        let metrics = vec![anomalous_metric("error_rate", 80.0)];

        let analysis = assess_compliance(&metrics, &[]);
        assert_eq!(analysis.overall_compliance_score, 100.0);
        assert!(analysis.violations.is_empty());
    }

    #[test]
    fn test_severity_ladder_from_percentage_change() {
        assert_eq!(severity_from_change(60.0), Severity::Critical);
        assert_eq!(severity_from_change(-60.0), Severity::Critical);
        assert_eq!(severity_from_change(35.0), Severity::High);
        assert_eq!(severity_from_change(20.0), Severity::Medium);
        assert_eq!(severity_from_change(10.0), Severity::Low);
    }

    #[test]
    fn test_critical_violation_subtracts_forty() {
        let metrics = vec![anomalous_metric("error_rate", 60.0)];

        let analysis = assess_compliance(&metrics, &[ComplianceCategory::HipaaSecurity]);
        assert_eq!(analysis.violations.len(), 1);
        assert_eq!(analysis.violations[0].severity, Severity::Critical);
        assert_eq!(analysis.overall_compliance_score, 60.0);
        assert!(!analysis.violations[0].remediation.is_empty());
    }

    #[test]
    fn test_unflagged_metrics_do_not_violate() {
        let metrics = vec![PerformanceMetric::new("error_rate").with_percentage_change(60.0)];

        let analysis = assess_compliance(&metrics, &[ComplianceCategory::HipaaSecurity]);
        assert!(analysis.violations.is_empty());
        assert_eq!(analysis.overall_compliance_score, 100.0);
    }

    #[test]
    fn test_irrelevant_metrics_do_not_violate() {
        let metrics = vec![anomalous_metric("cache_hit_rate", 90.0)];

        let analysis = assess_compliance(&metrics, &[ComplianceCategory::HipaaPrivacy]);
        assert!(analysis.violations.is_empty());
    }

    #[test]
    fn test_category_score_floors_at_zero() {
        let metrics = vec![
            anomalous_metric("error_rate", 80.0),
            anomalous_metric("failed_login_rate", 70.0),
            anomalous_metric("encryption_failures", 90.0),
        ];

        let analysis = assess_compliance(&metrics, &[ComplianceCategory::HipaaSecurity]);
        assert_eq!(analysis.violations.len(), 3);
        assert_eq!(analysis.overall_compliance_score, 0.0);
    }

    #[test]
    fn test_overall_score_is_mean_across_categories() {
        let metrics = vec![anomalous_metric("error_rate", 60.0)];

        // error_rate is relevant to HipaaSecurity (60) and MedicalAccuracy
        // (60) but not to DataRetention (100)
        let analysis = assess_compliance(
            &metrics,
            &[
                ComplianceCategory::HipaaSecurity,
                ComplianceCategory::MedicalAccuracy,
                ComplianceCategory::DataRetention,
            ],
        );
        let expected = (60.0 + 60.0 + 100.0) / 3.0;
        assert!((analysis.overall_compliance_score - expected).abs() < 1e-9);
        assert_eq!(analysis.violations.len(), 2);
    }
}
