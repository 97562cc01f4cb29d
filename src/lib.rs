//! # healthwatch-rs
//!
//! Statistical anomaly detection engine for healthcare performance metrics.
//!
//! The engine is a pure, synchronous library: callers hand in a batch of
//! per-metric performance snapshots plus optional patient-segment and
//! compliance context, and get back a ranked, summarized
//! [`AnomalyDetectionResult`]. Three layers cooperate:
//!
//! - [`stats`]: stateless numeric utilities (z-score, IQR bounds, moving
//!   averages, seasonal decomposition)
//! - [`healthcare`]: patient-safety risk scoring and compliance-violation
//!   detection over fixed domain tables
//! - [`detection`]: algorithm dispatch, confidence filtering, ranking and
//!   reporting
//!
//! No I/O happens inside the engine; persistence, transport and
//! authentication belong to the callers.

pub mod config;
pub mod detection;
pub mod error;
pub mod healthcare;
pub mod logging;
pub mod metrics;
pub mod stats;

pub use config::{ConfigLoader, DetectionConfig};
pub use detection::{
    AnomalyDetectionResult, AnomalyDetectionService, AnomalyType, DetectedAnomaly,
    DetectionAlgorithm, DetectionContext, Severity, StreamingDetector,
};
pub use error::{Error, Result};
pub use healthcare::{ComplianceCategory, PatientSegment, Urgency};
pub use metrics::{PerformanceMetric, TimeSeriesPoint, Trend};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::Validation("test".to_string());
        assert!(err.to_string().contains("test"));
    }
}
