//! Frequency grid heuristics for Lomb-Scargle periodograms.

use crate::error::{PeriodicityError, Result};

/// Default number of grid samples across each periodogram peak.
pub const DEFAULT_SAMPLES_PER_PEAK: f64 = 5.0;

/// Default multiple of the average Nyquist frequency used as upper limit.
pub const DEFAULT_NYQUIST_FACTOR: f64 = 5.0;

/// Largest frequency grid [`FrequencyGrid::frequencies`] will build.
pub const MAX_GRID_SIZE: usize = 100_000_000;

/// Settings for building an automatic frequency grid.
///
/// The grid spacing is `1 / (baseline * samples_per_peak)` so that every
/// peak, whose width is about `1 / baseline`, is sampled several times.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    /// Approximate number of grid points across each peak.
    pub samples_per_peak: f64,
    /// Upper limit as a multiple of the average Nyquist frequency `0.5 * N / baseline`,
    /// used when no maximum frequency is set.
    pub nyquist_factor: f64,
    /// Lowest frequency of the grid (None = half the grid spacing).
    pub minimum_frequency: Option<f64>,
    /// Highest frequency of the grid (None = from `nyquist_factor`).
    pub maximum_frequency: Option<f64>,
}

impl Default for FrequencyGrid {
    fn default() -> Self {
        Self {
            samples_per_peak: DEFAULT_SAMPLES_PER_PEAK,
            nyquist_factor: DEFAULT_NYQUIST_FACTOR,
            minimum_frequency: None,
            maximum_frequency: None,
        }
    }
}

impl FrequencyGrid {
    /// Create a grid with the given number of samples per peak.
    pub fn new(samples_per_peak: f64) -> Self {
        Self {
            samples_per_peak,
            ..Default::default()
        }
    }

    /// Set the Nyquist factor.
    pub fn with_nyquist_factor(mut self, factor: f64) -> Self {
        self.nyquist_factor = factor;
        self
    }

    /// Set the lowest frequency.
    pub fn with_minimum_frequency(mut self, f: f64) -> Self {
        self.minimum_frequency = Some(f);
        self
    }

    /// Set the highest frequency.
    pub fn with_maximum_frequency(mut self, f: f64) -> Self {
        self.maximum_frequency = Some(f);
        self
    }

    /// Frequency spacing for a series spanning `baseline` time units.
    pub fn spacing(&self, baseline: f64) -> f64 {
        1.0 / (baseline * self.samples_per_peak)
    }

    /// Resolve the `(fmin, fmax)` limits for `n_samples` observations over `baseline`.
    pub fn limits(&self, n_samples: usize, baseline: f64) -> Result<(f64, f64)> {
        self.validate(baseline)?;
        let df = self.spacing(baseline);
        let fmin = self.minimum_frequency.unwrap_or(0.5 * df);
        let fmax = self
            .maximum_frequency
            .unwrap_or_else(|| self.nyquist_factor * 0.5 * n_samples as f64 / baseline);

        if !fmin.is_finite() || fmin < 0.0 {
            return Err(PeriodicityError::InvalidParameter(format!(
                "minimum frequency must be finite and non-negative, got {}",
                fmin
            )));
        }
        if !fmax.is_finite() || fmax < fmin {
            return Err(PeriodicityError::InvalidParameter(format!(
                "maximum frequency {} must be finite and not below minimum frequency {}",
                fmax, fmin
            )));
        }
        Ok((fmin, fmax))
    }

    /// Build the frequency grid for `n_samples` observations over `baseline`.
    pub fn frequencies(&self, n_samples: usize, baseline: f64) -> Result<Vec<f64>> {
        let (fmin, fmax) = self.limits(n_samples, baseline)?;
        let df = self.spacing(baseline);
        let steps = ((fmax - fmin) / df).round();
        if !steps.is_finite() || steps >= MAX_GRID_SIZE as f64 {
            return Err(PeriodicityError::InvalidParameter(format!(
                "frequency range [{}, {}] with spacing {} exceeds {} grid points",
                fmin, fmax, df, MAX_GRID_SIZE
            )));
        }
        let n_freq = 1 + steps as usize;
        Ok((0..n_freq).map(|k| fmin + df * k as f64).collect())
    }

    fn validate(&self, baseline: f64) -> Result<()> {
        if !(baseline.is_finite() && baseline > 0.0) {
            return Err(PeriodicityError::InvalidParameter(
                "time baseline must be positive".into(),
            ));
        }
        if !(self.samples_per_peak.is_finite() && self.samples_per_peak > 0.0) {
            return Err(PeriodicityError::InvalidParameter(format!(
                "samples per peak must be positive, got {}",
                self.samples_per_peak
            )));
        }
        if !(self.nyquist_factor.is_finite() && self.nyquist_factor > 0.0) {
            return Err(PeriodicityError::InvalidParameter(format!(
                "nyquist factor must be positive, got {}",
                self.nyquist_factor
            )));
        }
        Ok(())
    }
}
