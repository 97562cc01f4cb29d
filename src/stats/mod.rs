//! Statistical Analyzer
//!
//! 統計ユーティリティ

mod decompose;
mod descriptive;

pub use decompose::{decompose, Decomposition, DEFAULT_SEASONAL_PERIOD};
pub use descriptive::{
    ewma, iqr_bounds, mean, moving_average, population_std, trend_strength, z_score, IqrBounds,
    DEFAULT_EWMA_ALPHA,
};
