//! Descriptive statistics over `f64` samples.
//!
//! Quantiles use linear interpolation between closest ranks, so the median
//! of an even-sized sample is the mean of its two middle values.

use crate::error::{InsightsError, Result};

pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(InsightsError::EmptyInputStatistics("mean"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(InsightsError::EmptyInputStatistics("median"));
    }
    quantile(values, 0.5)
}

/// The `q`-th quantile (`0.0..=1.0`) of `values`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(InsightsError::EmptyInputStatistics("quantile"));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(InsightsError::InvalidArgument(format!(
            "quantile must be between 0 and 1, got {}",
            q
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}
