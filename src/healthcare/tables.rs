//! Static healthcare lookup tables.
//!
//! These tables are domain configuration: immutable process-wide constants
//! injected into the matcher functions, so the matchers stay pure and the
//! tables can be tested on their own.

use super::types::{ComplianceCategory, PatientSegment};

/// Z-score a critical metric must exceed before it contributes risk
pub const SAFETY_Z_THRESHOLD: f64 = 3.0;

/// Risk score above which the safety assessment reports an anomaly
pub const SAFETY_REPORT_THRESHOLD: f64 = 30.0;

/// Importance weights for the critical-metric whitelist.
///
/// Only metrics listed here participate in patient-safety scoring.
pub const CRITICAL_METRIC_WEIGHTS: &[(&str, f64)] = &[
    ("error_rate", 8.0),
    ("response_time", 7.0),
    ("medication_accuracy", 10.0),
    ("appointment_compliance", 6.0),
    ("emergency_response", 9.0),
];

/// Which patient cohorts a metric implicates when it misbehaves
pub const SEGMENT_MEMBERSHIP: &[(&str, &[PatientSegment])] = &[
    (
        "error_rate",
        &[PatientSegment::EmergencyPatients, PatientSegment::AtRiskPatients],
    ),
    ("response_time", &[PatientSegment::EmergencyPatients]),
    (
        "medication_accuracy",
        &[PatientSegment::ChronicCarePatients, PatientSegment::AtRiskPatients],
    ),
    ("medication_adherence", &[PatientSegment::ChronicCarePatients]),
    (
        "appointment_compliance",
        &[
            PatientSegment::ReturningPatients,
            PatientSegment::ChronicCarePatients,
            PatientSegment::PreventiveCarePatients,
        ],
    ),
    ("emergency_response", &[PatientSegment::EmergencyPatients]),
];

/// Metric names relevant to each compliance category
pub const COMPLIANCE_RELEVANT_METRICS: &[(ComplianceCategory, &[&str])] = &[
    (
        ComplianceCategory::HipaaPrivacy,
        &["data_access_rate", "unauthorized_access_attempts", "audit_log_volume"],
    ),
    (
        ComplianceCategory::HipaaSecurity,
        &["error_rate", "failed_login_rate", "encryption_failures"],
    ),
    (
        ComplianceCategory::Hitech,
        &["audit_log_volume", "breach_notification_time"],
    ),
    (
        ComplianceCategory::Gdpr,
        &["data_retention_days", "consent_rate", "data_export_latency"],
    ),
    (
        ComplianceCategory::MedicalAccuracy,
        &["medication_accuracy", "diagnosis_accuracy", "error_rate"],
    ),
    (
        ComplianceCategory::PatientConsent,
        &["consent_rate", "consent_withdrawal_rate"],
    ),
    (
        ComplianceCategory::DataRetention,
        &["data_retention_days", "archival_backlog"],
    ),
];

/// Importance weight for a critical metric, `None` outside the whitelist
pub fn critical_metric_weight(metric_name: &str) -> Option<f64> {
    CRITICAL_METRIC_WEIGHTS
        .iter()
        .find(|(name, _)| *name == metric_name)
        .map(|(_, weight)| *weight)
}

/// Patient cohorts implicated by a metric; empty when unmapped
pub fn segments_for_metric(metric_name: &str) -> &'static [PatientSegment] {
    SEGMENT_MEMBERSHIP
        .iter()
        .find(|(name, _)| *name == metric_name)
        .map(|(_, segments)| *segments)
        .unwrap_or(&[])
}

/// Metric names relevant to a compliance category
pub fn relevant_metrics(category: ComplianceCategory) -> &'static [&'static str] {
    COMPLIANCE_RELEVANT_METRICS
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, metrics)| *metrics)
        .unwrap_or(&[])
}

/// Remediation guidance for a compliance category
pub fn remediation_for(category: ComplianceCategory) -> &'static str {
    match category {
        ComplianceCategory::HipaaPrivacy => {
            "Review PHI access logs and re-verify minimum-necessary access policies"
        }
        ComplianceCategory::HipaaSecurity => {
            "Audit authentication failures and confirm encryption controls are intact"
        }
        ComplianceCategory::Hitech => {
            "Confirm breach-notification timelines and audit-trail completeness"
        }
        ComplianceCategory::Gdpr => {
            "Re-check data-subject request handling and retention schedules"
        }
        ComplianceCategory::MedicalAccuracy => {
            "Trigger clinical review of affected records and reconcile source data"
        }
        ComplianceCategory::PatientConsent => {
            "Re-validate consent records for the affected patient population"
        }
        ComplianceCategory::DataRetention => {
            "Verify archival jobs and purge schedules against the retention policy"
        }
    }
}
