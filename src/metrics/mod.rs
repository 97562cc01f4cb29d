//! Performance Metric Snapshots
//!
//! メトリクススナップショットの型定義

mod types;

pub use types::{Percentiles, PerformanceMetric, TimeSeriesPoint, Trend};
