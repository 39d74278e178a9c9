//! Statistical utility functions.

use std::cmp::Ordering;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n.is_multiple_of(2) {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Median of the first differences of a slice.
///
/// For sampling times this is the typical cadence of the series.
/// Returns NaN for fewer than two values.
pub fn median_diff(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    median(&diffs)
}

/// Weighted mean `sum(w * x) / sum(w)`.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if values.is_empty() || total == 0.0 {
        return f64::NAN;
    }
    values
        .iter()
        .zip(weights.iter())
        .map(|(x, w)| x * w)
        .sum::<f64>()
        / total
}

/// Weighted population variance around the weighted mean.
pub fn weighted_variance(values: &[f64], weights: &[f64]) -> f64 {
    let m = weighted_mean(values, weights);
    if m.is_nan() {
        return f64::NAN;
    }
    let total: f64 = weights.iter().sum();
    values
        .iter()
        .zip(weights.iter())
        .map(|(x, w)| w * (x - m).powi(2))
        .sum::<f64>()
        / total
}

/// Quantile of an already sorted slice with linear interpolation between
/// closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// `n` evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Largest value of a slice, ignoring NaN. Returns NaN when nothing is left.
pub fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn median_calculates_correctly() {
        // Odd number of elements
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        // Even number of elements
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-10);
        // Unsorted input
        assert_relative_eq!(median(&[5.0, 1.0, 3.0, 2.0, 4.0]), 3.0, epsilon = 1e-10);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn median_diff_of_uniform_grid() {
        let t: Vec<f64> = (0..50).map(|i| 0.25 * i as f64).collect();
        assert_relative_eq!(median_diff(&t), 0.25, epsilon = 1e-12);
        assert!(median_diff(&[1.0]).is_nan());
    }

    #[test]
    fn median_diff_ignores_gaps() {
        // One large gap must not move the typical cadence
        let t = [0.0, 1.0, 2.0, 3.0, 100.0, 101.0, 102.0];
        assert_relative_eq!(median_diff(&t), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn weighted_mean_and_variance() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let uniform = [1.0; 4];
        assert_relative_eq!(weighted_mean(&x, &uniform), 2.5, epsilon = 1e-12);
        assert_relative_eq!(weighted_variance(&x, &uniform), 1.25, epsilon = 1e-12);

        let w = [0.0, 0.0, 1.0, 1.0];
        assert_relative_eq!(weighted_mean(&x, &w), 3.5, epsilon = 1e-12);
        assert_relative_eq!(weighted_variance(&x, &w), 0.25, epsilon = 1e-12);

        assert!(weighted_mean(&x, &[0.0; 4]).is_nan());
    }

    #[test]
    fn quantile_sorted_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_relative_eq!(quantile_sorted(&sorted, 1.0), 5.0);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5), 3.0);
        assert_relative_eq!(quantile_sorted(&sorted, 0.125), 1.5, epsilon = 1e-12);
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(2.0, 10.0, 5);
        assert_eq!(v, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(linspace(1.0, 3.0, 1), vec![1.0]);
        assert!(linspace(1.0, 3.0, 0).is_empty());
    }

    #[test]
    fn nan_max_skips_nan() {
        assert_relative_eq!(nan_max(&[1.0, f64::NAN, 3.0, 2.0]), 3.0);
        assert!(nan_max(&[f64::NAN]).is_nan());
    }
}
