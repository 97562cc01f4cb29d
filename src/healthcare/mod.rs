//! Healthcare Anomaly Pattern Matcher
//!
//! ヘルスケア固有の異常パターン照合

mod compliance;
mod safety;
pub mod tables;
mod types;

pub use compliance::assess_compliance;
pub use safety::assess_patient_safety;
pub use types::{
    ComplianceAnalysis, ComplianceCategory, ComplianceViolation, PatientSafetyAnalysis,
    PatientSegment, Urgency,
};
