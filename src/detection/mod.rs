//! Anomaly Detection Service
//!
//! 異常検知サービス

mod decomposition;
mod isolation;
mod service;
mod statistical;
mod streaming;
mod types;

pub use service::AnomalyDetectionService;
pub use streaming::{StreamingDetector, StreamingScore};
pub use types::{
    AnomalyDetectionResult, AnomalySummary, AnomalyType, DetectedAnomaly, DetectionAlgorithm,
    DetectionContext, Severity, SeverityCounts, TypeCounts,
};
