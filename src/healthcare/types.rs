//! Healthcare Domain Types
//!
//! ヘルスケア領域の型定義

use crate::detection::Severity;
use serde::{Deserialize, Serialize};

/// Fixed patient cohorts used as static lookup keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientSegment {
    /// First-visit patients
    NewPatients,
    /// Patients with prior visits
    ReturningPatients,
    /// Patients flagged by risk screening
    AtRiskPatients,
    /// Patients in long-term condition management
    ChronicCarePatients,
    /// Patients in screening and prevention programs
    PreventiveCarePatients,
    /// Patients arriving through emergency intake
    EmergencyPatients,
}

/// Regulatory compliance categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    /// HIPAA Privacy Rule
    HipaaPrivacy,
    /// HIPAA Security Rule
    HipaaSecurity,
    /// HITECH breach notification obligations
    Hitech,
    /// GDPR data-subject obligations
    Gdpr,
    /// Clinical accuracy of medical data
    MedicalAccuracy,
    /// Patient consent coverage
    PatientConsent,
    /// Retention schedule adherence
    DataRetention,
}

/// Urgency of a patient-safety finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Review during normal operations
    Routine,
    /// Review within the day
    Urgent,
    /// Page the on-call team
    Emergency,
    /// Immediate clinical escalation
    Critical,
}

impl Urgency {
    /// Maps a 0–100 risk score onto the urgency ladder
    pub fn from_risk_score(risk_score: f64) -> Self {
        if risk_score > 80.0 {
            Urgency::Critical
        } else if risk_score > 60.0 {
            Urgency::Emergency
        } else if risk_score > 40.0 {
            Urgency::Urgent
        } else {
            Urgency::Routine
        }
    }
}

/// Outcome of the patient-safety risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSafetyAnalysis {
    /// Whether the risk score crossed the reporting threshold
    pub has_anomaly: bool,
    /// Escalation urgency derived from the risk score
    pub urgency: Urgency,
    /// Cohorts implicated by the anomalous critical metrics
    pub affected_segments: Vec<PatientSegment>,
    /// Maximum weighted risk contribution, clamped to `[0, 100]`
    pub risk_score: f64,
}

/// A single derived compliance violation; ephemeral, never persisted here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceViolation {
    /// Category the violation falls under
    pub category: ComplianceCategory,
    /// Metric that triggered the violation
    pub metric: String,
    /// Severity derived from the metric's percentage change
    pub severity: Severity,
    /// Human-readable explanation
    pub description: String,
    /// Suggested remediation for the category
    pub remediation: String,
}

/// Outcome of the compliance assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceAnalysis {
    /// Derived violations across all assessed categories
    pub violations: Vec<ComplianceViolation>,
    /// Mean of the per-category scores; 100 when no categories were assessed
    pub overall_compliance_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_ladder() {
        assert_eq!(Urgency::from_risk_score(100.0), Urgency::Critical);
        assert_eq!(Urgency::from_risk_score(80.0), Urgency::Emergency);
        assert_eq!(Urgency::from_risk_score(61.0), Urgency::Emergency);
        assert_eq!(Urgency::from_risk_score(41.0), Urgency::Urgent);
        assert_eq!(Urgency::from_risk_score(40.0), Urgency::Routine);
        assert_eq!(Urgency::from_risk_score(0.0), Urgency::Routine);
    }

    #[test]
    fn test_urgency_ordering() {
        assert!(Urgency::Critical > Urgency::Emergency);
        assert!(Urgency::Emergency > Urgency::Urgent);
        assert!(Urgency::Urgent > Urgency::Routine);
    }

    #[test]
    fn test_segment_serde_names() {
        let json = serde_json::to_string(&PatientSegment::ChronicCarePatients).unwrap();
        assert_eq!(json, "\"chronic_care_patients\"");

        let parsed: ComplianceCategory = serde_json::from_str("\"hipaa_privacy\"").unwrap();
        assert_eq!(parsed, ComplianceCategory::HipaaPrivacy);
    }
}
