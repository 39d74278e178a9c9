//! Validation of sampled time series at the crate boundary.

use crate::error::{PeriodicityError, Result};
use crate::utils::stats::median_diff;

/// Check that `t` and `x` describe a valid sampled series.
///
/// Requires at least `min_len` samples, equal lengths, finite values, and
/// strictly increasing times.
pub fn validate_samples(t: &[f64], x: &[f64], min_len: usize) -> Result<()> {
    if t.is_empty() {
        return Err(PeriodicityError::EmptyData);
    }
    if x.len() != t.len() {
        return Err(PeriodicityError::DimensionMismatch {
            expected: t.len(),
            got: x.len(),
        });
    }
    validate_times(t, min_len)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(PeriodicityError::NonFiniteData);
    }
    Ok(())
}

/// Check that sampling times are finite, strictly increasing, and numerous enough.
pub fn validate_times(t: &[f64], min_len: usize) -> Result<()> {
    if t.is_empty() {
        return Err(PeriodicityError::EmptyData);
    }
    if t.len() < min_len {
        return Err(PeriodicityError::InsufficientData {
            needed: min_len,
            got: t.len(),
        });
    }
    if t.iter().any(|v| !v.is_finite()) {
        return Err(PeriodicityError::NonFiniteData);
    }
    if let Some(pos) = t.windows(2).position(|w| w[1] <= w[0]) {
        return Err(PeriodicityError::NonIncreasingTime { index: pos + 1 });
    }
    Ok(())
}

/// Check per-sample uncertainties: one per sample, finite, strictly positive.
pub fn validate_uncertainties(dy: &[f64], n: usize) -> Result<()> {
    if dy.len() != n {
        return Err(PeriodicityError::DimensionMismatch {
            expected: n,
            got: dy.len(),
        });
    }
    if dy.iter().any(|v| !v.is_finite()) {
        return Err(PeriodicityError::NonFiniteData);
    }
    if dy.iter().any(|&v| v <= 0.0) {
        return Err(PeriodicityError::InvalidParameter(
            "uncertainties must be strictly positive".into(),
        ));
    }
    Ok(())
}

/// Typical sampling interval: the median spacing between consecutive times.
pub fn median_cadence(t: &[f64]) -> Result<f64> {
    validate_times(t, 2)?;
    let dt = median_diff(t);
    if dt.is_nan() || dt <= 0.0 {
        return Err(PeriodicityError::ComputationError(
            "median sampling interval is not positive".into(),
        ));
    }
    Ok(dt)
}

/// Pseudo-Nyquist frequency `1 / (2 * median(diff(t)))`.
///
/// The true Nyquist limit is undefined for irregular sampling; half the
/// inverse of the typical cadence is the conventional stand-in.
pub fn pseudo_nyquist(t: &[f64]) -> Result<f64> {
    Ok(0.5 / median_cadence(t)?)
}

/// Time span covered by the samples.
pub fn baseline(t: &[f64]) -> f64 {
    match (t.first(), t.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}
