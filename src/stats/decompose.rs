//! Additive seasonal decomposition of a time series.
//!
//! 時系列の季節分解（トレンド・季節成分・残差）

use super::descriptive::moving_average;

/// Default seasonal period (one week of daily observations)
pub const DEFAULT_SEASONAL_PERIOD: usize = 7;

/// Additive decomposition of a series into trend, seasonal and residual parts.
///
/// The components always satisfy `trend[i] + seasonal[i] + residual[i] ==
/// values[i]`; the residual is defined as the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Trailing moving-average trend
    pub trend: Vec<f64>,
    /// Per-phase seasonal component, tiled across the series
    pub seasonal: Vec<f64>,
    /// Remainder after removing trend and seasonal parts
    pub residual: Vec<f64>,
}

impl Decomposition {
    /// Number of points in the decomposed series
    pub fn len(&self) -> usize {
        self.residual.len()
    }

    /// Whether the decomposed series was empty
    pub fn is_empty(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Decomposes a chronological series with the given seasonal period.
///
/// The trend is a trailing moving average over one period; the seasonal
/// component per phase is the mean of the detrended values sharing that phase
/// (`i % period`), tiled back across the series. Fewer than `period` points
/// degrade to a near-zero seasonal estimate rather than an error; callers
/// wanting a meaningful seasonal signal must gate on sample size.
pub fn decompose(values: &[f64], seasonal_period: usize) -> Decomposition {
    let period = seasonal_period.max(1);
    let trend = moving_average(values, period);

    let detrended: Vec<f64> = values
        .iter()
        .zip(trend.iter())
        .map(|(v, t)| v - t)
        .collect();

    let mut phase_sums = vec![0.0; period];
    let mut phase_counts = vec![0usize; period];
    for (i, d) in detrended.iter().enumerate() {
        phase_sums[i % period] += d;
        phase_counts[i % period] += 1;
    }
    let phase_means: Vec<f64> = phase_sums
        .iter()
        .zip(phase_counts.iter())
        .map(|(sum, count)| if *count == 0 { 0.0 } else { sum / *count as f64 })
        .collect();

    let seasonal: Vec<f64> = (0..values.len()).map(|i| phase_means[i % period]).collect();

    let residual: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, v)| v - trend[i] - seasonal[i])
        .collect();

    Decomposition {
        trend,
        seasonal,
        residual,
    }
}
