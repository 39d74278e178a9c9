//! Generalized Lomb-Scargle periodogram model.
//!
//! Implements the floating-mean, weighted periodogram of Zechmeister &
//! Kürster (2009), which reduces to the classical Lomb (1976) / Scargle
//! (1982) periodogram for uniform weights without mean fitting.
//!
//! For each trial frequency ω the model fits
//!
//! ```text
//! y(t) = [c] + a·sin(ω(t − τ)) + b·cos(ω(t − τ))
//! ```
//!
//! by weighted least squares, where the phase offset τ orthogonalizes the
//! sine and cosine terms, and reports the relative reduction in χ².

use std::f64::consts::PI;

use super::fap::{BootstrapConfig, FapMethod, PeakSignificance};
use super::grid::FrequencyGrid;
use crate::core::{baseline, validate_samples, validate_uncertainties};
use crate::error::{PeriodicityError, Result};
use crate::utils::lstsq::weighted_lstsq;

/// Denominators below this are treated as a vanishing sinusoid component.
const DEGENERATE_TOL: f64 = 1e-14;

/// Normalization applied to periodogram power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Power relative to the χ² of the constant (or zero) reference model; lies in `[0, 1]`.
    #[default]
    Standard,
    /// Unnormalized power spectral density, in units of `y² / dy²`.
    Psd,
}

impl Normalization {
    /// Short name of the normalization.
    pub fn name(&self) -> &'static str {
        match self {
            Normalization::Standard => "standard",
            Normalization::Psd => "psd",
        }
    }
}

/// Lomb-Scargle model bound to one sampled series.
///
/// # Example
/// ```
/// use periodicity::periodogram::{FrequencyGrid, LombScargle};
///
/// let t: Vec<f64> = (0..60).map(|i| i as f64 + 0.3 * (i as f64 * 1.7).sin()).collect();
/// let y: Vec<f64> = t.iter().map(|&ti| (2.0 * std::f64::consts::PI * 0.1 * ti).sin()).collect();
///
/// let model = LombScargle::new(t, y).unwrap();
/// let grid = FrequencyGrid::default().with_maximum_frequency(0.5);
/// let (freq, power) = model.autopower(&grid).unwrap();
/// assert_eq!(freq.len(), power.len());
/// ```
#[derive(Debug, Clone)]
pub struct LombScargle {
    t: Vec<f64>,
    y: Vec<f64>,
    dy: Option<Vec<f64>>,
    fit_mean: bool,
    center_data: bool,
    normalization: Normalization,
}

impl LombScargle {
    /// Create a model for the samples `y` observed at times `t`.
    ///
    /// Times must be finite and strictly increasing, with at least two samples.
    pub fn new(t: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        validate_samples(&t, &y, 2)?;
        Ok(Self {
            t,
            y,
            dy: None,
            fit_mean: true,
            center_data: true,
            normalization: Normalization::Standard,
        })
    }

    /// Attach per-sample measurement uncertainties.
    pub fn with_dy(mut self, dy: Vec<f64>) -> Result<Self> {
        validate_uncertainties(&dy, self.t.len())?;
        self.dy = Some(dy);
        Ok(self)
    }

    /// Whether to fit a constant offset alongside the sinusoid (default true).
    pub fn with_fit_mean(mut self, fit_mean: bool) -> Self {
        self.fit_mean = fit_mean;
        self
    }

    /// Whether to subtract the weighted mean before fitting (default true).
    pub fn with_center_data(mut self, center_data: bool) -> Self {
        self.center_data = center_data;
        self
    }

    /// Set the power normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Sampling times.
    pub fn t(&self) -> &[f64] {
        &self.t
    }

    /// Observed values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Measurement uncertainties, if given.
    pub fn dy(&self) -> Option<&[f64]> {
        self.dy.as_deref()
    }

    /// Whether a constant offset is fitted.
    pub fn fit_mean(&self) -> bool {
        self.fit_mean
    }

    /// Whether the data are centered before fitting.
    pub fn center_data(&self) -> bool {
        self.center_data
    }

    /// Power normalization in use.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Always false: construction requires at least two samples.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Time span of the observations.
    pub fn baseline(&self) -> f64 {
        baseline(&self.t)
    }

    /// Unnormalized inverse-variance weights `dy^-2` (ones without uncertainties).
    pub(crate) fn inverse_variances(&self) -> Vec<f64> {
        match &self.dy {
            Some(dy) => dy.iter().map(|d| 1.0 / (d * d)).collect(),
            None => vec![1.0; self.t.len()],
        }
    }

    /// Inverse-variance weights normalized to sum to one.
    fn weights(&self) -> Vec<f64> {
        let mut w = self.inverse_variances();
        let total: f64 = w.iter().sum();
        for wi in &mut w {
            *wi /= total;
        }
        w
    }

    /// Weighted mean of `y`; the offset removed before fitting.
    pub fn offset(&self) -> f64 {
        if !self.center_data {
            return 0.0;
        }
        let w = self.weights();
        w.iter().zip(self.y.iter()).map(|(wi, yi)| wi * yi).sum()
    }

    /// Same model on resampled values, used by the bootstrap.
    pub(crate) fn with_values(&self, y: Vec<f64>, dy: Option<Vec<f64>>) -> Self {
        Self {
            t: self.t.clone(),
            y,
            dy,
            fit_mean: self.fit_mean,
            center_data: self.center_data,
            normalization: self.normalization,
        }
    }

    /// Automatic frequency grid for this series.
    pub fn autofrequency(&self, grid: &FrequencyGrid) -> Result<Vec<f64>> {
        grid.frequencies(self.t.len(), self.baseline())
    }

    /// `(fmin, fmax)` limits of the automatic grid.
    pub fn frequency_limits(&self, grid: &FrequencyGrid) -> Result<(f64, f64)> {
        grid.limits(self.t.len(), self.baseline())
    }

    /// Periodogram power over the automatic frequency grid.
    pub fn autopower(&self, grid: &FrequencyGrid) -> Result<(Vec<f64>, Vec<f64>)> {
        let frequency = self.autofrequency(grid)?;
        let power = self.power(&frequency);
        Ok((frequency, power))
    }

    /// Periodogram power at the given frequencies.
    ///
    /// A constant series has zero power everywhere. At zero frequency the
    /// sine term vanishes, so only the cosine (constant) term contributes.
    pub fn power(&self, frequency: &[f64]) -> Vec<f64> {
        let w = self.weights();
        let t0 = self.t[0];
        let t: Vec<f64> = self.t.iter().map(|ti| ti - t0).collect();

        let y: Vec<f64> = if self.center_data || self.fit_mean {
            let ybar: f64 = w.iter().zip(self.y.iter()).map(|(wi, yi)| wi * yi).sum();
            self.y.iter().map(|yi| yi - ybar).collect()
        } else {
            self.y.clone()
        };

        let ysum: f64 = w.iter().zip(y.iter()).map(|(wi, yi)| wi * yi).sum();
        let mut yy: f64 = w.iter().zip(y.iter()).map(|(wi, yi)| wi * yi * yi).sum();
        if self.fit_mean {
            yy -= ysum * ysum;
        }

        let scale = match self.normalization {
            Normalization::Standard => {
                // Residual variance is compared to the raw signal energy so the
                // cutoff does not depend on the units of y
                let energy: f64 = w.iter().zip(self.y.iter()).map(|(wi, yi)| wi * yi * yi).sum();
                if yy <= DEGENERATE_TOL * energy {
                    return vec![0.0; frequency.len()];
                }
                1.0 / yy
            }
            Normalization::Psd => 0.5 * self.inverse_variances().iter().sum::<f64>(),
        };

        frequency
            .iter()
            .map(|&f| scale * self.raw_power(&t, &y, &w, ysum, 2.0 * PI * f))
            .collect()
    }

    /// χ² reduction at angular frequency `omega`, before normalization.
    fn raw_power(&self, t: &[f64], y: &[f64], w: &[f64], ysum: f64, omega: f64) -> f64 {
        let mut s2 = 0.0;
        let mut c2 = 0.0;
        let mut s = 0.0;
        let mut c = 0.0;
        for (&ti, &wi) in t.iter().zip(w.iter()) {
            let arg = omega * ti;
            s2 += wi * (2.0 * arg).sin();
            c2 += wi * (2.0 * arg).cos();
            if self.fit_mean {
                s += wi * arg.sin();
                c += wi * arg.cos();
            }
        }
        if self.fit_mean {
            s2 -= 2.0 * s * c;
            c2 -= c * c - s * s;
        }
        let omega_tau = 0.5 * s2.atan2(c2);

        let mut yc = 0.0;
        let mut ys = 0.0;
        let mut cc = 0.0;
        let mut ss = 0.0;
        let mut c_tau = 0.0;
        let mut s_tau = 0.0;
        for ((&ti, &yi), &wi) in t.iter().zip(y.iter()).zip(w.iter()) {
            let arg = omega * ti - omega_tau;
            let (sin_arg, cos_arg) = arg.sin_cos();
            yc += wi * yi * cos_arg;
            ys += wi * yi * sin_arg;
            cc += wi * cos_arg * cos_arg;
            ss += wi * sin_arg * sin_arg;
            c_tau += wi * cos_arg;
            s_tau += wi * sin_arg;
        }
        if self.fit_mean {
            yc -= ysum * c_tau;
            ys -= ysum * s_tau;
            cc -= c_tau * c_tau;
            ss -= s_tau * s_tau;
        }

        let cos_term = if cc > DEGENERATE_TOL { yc * yc / cc } else { 0.0 };
        let sin_term = if ss > DEGENERATE_TOL { ys * ys / ss } else { 0.0 };
        cos_term + sin_term
    }

    fn design_columns(&self, t: &[f64], omega: f64) -> Vec<Vec<f64>> {
        let t0 = self.t[0];
        let mut columns = Vec::with_capacity(3);
        if self.fit_mean {
            columns.push(vec![1.0; t.len()]);
        }
        columns.push(t.iter().map(|ti| (omega * (ti - t0)).sin()).collect());
        columns.push(t.iter().map(|ti| (omega * (ti - t0)).cos()).collect());
        columns
    }

    /// Best-fit parameters at `frequency`.
    ///
    /// Returns `[offset, sin, cos]` amplitudes when the mean is fitted and
    /// `[sin, cos]` otherwise. Phases are referenced to the first sample time.
    pub fn model_parameters(&self, frequency: f64) -> Result<Vec<f64>> {
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(PeriodicityError::InvalidParameter(format!(
                "frequency must be finite and non-negative, got {}",
                frequency
            )));
        }
        let offset = self.offset();
        let y: Vec<f64> = self.y.iter().map(|yi| yi - offset).collect();
        let columns = self.design_columns(&self.t, 2.0 * PI * frequency);
        weighted_lstsq(&columns, &y, &self.weights())
    }

    /// Evaluate the best-fit sinusoid at `frequency` on the times `t_fit`.
    pub fn model(&self, t_fit: &[f64], frequency: f64) -> Result<Vec<f64>> {
        if t_fit.iter().any(|v| !v.is_finite()) {
            return Err(PeriodicityError::NonFiniteData);
        }
        let theta = self.model_parameters(frequency)?;
        let columns = self.design_columns(t_fit, 2.0 * PI * frequency);
        let offset = self.offset();

        Ok((0..t_fit.len())
            .map(|i| {
                offset
                    + columns
                        .iter()
                        .zip(theta.iter())
                        .map(|(col, beta)| col[i] * beta)
                        .sum::<f64>()
            })
            .collect())
    }

    /// False alarm probability of a peak of height `power`.
    ///
    /// The frequency grid must match the one the peak was found on.
    pub fn false_alarm_probability(
        &self,
        power: f64,
        method: FapMethod,
        grid: &FrequencyGrid,
        bootstrap: &BootstrapConfig,
    ) -> Result<f64> {
        PeakSignificance::estimate(self, method, grid, bootstrap)?.false_alarm_probability(power)
    }

    /// Peak heights corresponding to each false alarm probability in `levels`.
    pub fn false_alarm_level(
        &self,
        levels: &[f64],
        method: FapMethod,
        grid: &FrequencyGrid,
        bootstrap: &BootstrapConfig,
    ) -> Result<Vec<f64>> {
        let significance = PeakSignificance::estimate(self, method, grid, bootstrap)?;
        levels
            .iter()
            .map(|&level| significance.false_alarm_level(level))
            .collect()
    }
}
