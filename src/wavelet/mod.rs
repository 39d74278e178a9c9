//! Morlet wavelet power spectra.
//!
//! [`wavelet`] computes the time-resolved wavelet power of a series on a
//! linear grid of trial periods, plus its global (time-averaged) spectrum.
//! [`WaveletAnalysis`] is the underlying transform over an explicit scale set.

mod analysis;
mod morlet;

pub use analysis::{WaveletAnalysis, MIN_SAMPLES};
pub use morlet::{wavenumbers, Morlet, MIN_OMEGA0};

use tracing::{debug, warn};

use crate::core::{median_cadence, validate_samples};
use crate::error::{PeriodicityError, Result};
use crate::utils::stats::linspace;

/// Default number of trial periods.
pub const DEFAULT_N_PERIODS: usize = 1000;

/// Scale resolution of the dyadic scale set bounding the default period range.
const DEFAULT_DJ: f64 = 0.125;

/// Configuration for [`wavelet`].
///
/// # Example
/// ```
/// use periodicity::wavelet::WaveletConfig;
///
/// let config = WaveletConfig::new()
///     .with_period_range(2.0, 50.0)
///     .with_n_periods(200);
/// assert_eq!(config.pmax, Some(50.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletConfig {
    /// Shortest trial period (`<= 0` means twice the median cadence).
    pub pmin: f64,
    /// Longest trial period (None = longest period of the default dyadic scales).
    pub pmax: Option<f64>,
    /// Number of trial periods.
    pub n_periods: usize,
    /// Morlet non-dimensional frequency.
    pub omega0: f64,
    /// Divide power by scale.
    pub unbias: bool,
    /// Average the global spectrum inside the cone of influence only.
    pub mask_coi: bool,
}

impl Default for WaveletConfig {
    fn default() -> Self {
        Self {
            pmin: 0.0,
            pmax: None,
            n_periods: DEFAULT_N_PERIODS,
            omega0: 6.0,
            unbias: true,
            mask_coi: true,
        }
    }
}

impl WaveletConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shortest trial period.
    pub fn with_min_period(mut self, pmin: f64) -> Self {
        self.pmin = pmin;
        self
    }

    /// Set the longest trial period.
    pub fn with_max_period(mut self, pmax: f64) -> Self {
        self.pmax = Some(pmax);
        self
    }

    /// Set both period bounds.
    pub fn with_period_range(self, pmin: f64, pmax: f64) -> Self {
        self.with_min_period(pmin).with_max_period(pmax)
    }

    /// Set the number of trial periods.
    pub fn with_n_periods(mut self, n_periods: usize) -> Self {
        self.n_periods = n_periods;
        self
    }

    /// Set the Morlet non-dimensional frequency.
    pub fn with_omega0(mut self, omega0: f64) -> Self {
        self.omega0 = omega0;
        self
    }

    /// Enable or disable bias rectification.
    pub fn with_unbias(mut self, unbias: bool) -> Self {
        self.unbias = unbias;
        self
    }

    /// Enable or disable cone-of-influence masking of the global spectrum.
    pub fn with_mask_coi(mut self, mask_coi: bool) -> Self {
        self.mask_coi = mask_coi;
        self
    }
}

/// Result of [`wavelet`].
#[derive(Debug, Clone)]
pub struct WaveletResult {
    /// The wavelet analysis the spectra were derived from.
    pub model: WaveletAnalysis,
    /// Trial periods, increasing.
    pub periods: Vec<f64>,
    /// Global wavelet power at each period.
    pub global_power: Vec<f64>,
    /// Wavelet power `[period][time]`.
    pub power: Vec<Vec<f64>>,
}

impl WaveletResult {
    /// Index of the strongest finite global power.
    pub fn peak_index(&self) -> Option<usize> {
        self.global_power
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }

    /// Period of the strongest finite global power.
    pub fn best_period(&self) -> Option<f64> {
        self.peak_index().map(|i| self.periods[i])
    }
}

/// Longest Fourier period of the dyadic scale set `s0 * 2^(j * dj)` covering
/// `n` samples spaced by `dt`, where `s0` is the scale of period `2 * dt`.
fn default_max_period(wavelet: &Morlet, n: usize, dt: f64) -> f64 {
    let s0 = wavelet.scale_from_period(2.0 * dt);
    let octaves = (n as f64 * dt / s0).log2();
    let j_max = (octaves / DEFAULT_DJ).floor().max(0.0);
    wavelet.fourier_period(s0 * 2.0_f64.powf(j_max * DEFAULT_DJ))
}

/// Morlet wavelet power spectrum of `x(t)` on a linear period grid.
///
/// The sampling interval is taken as the median spacing of `t`; the
/// transform treats the samples as evenly spaced by that interval.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`InsufficientData`](crate::PeriodicityError::InsufficientData) | fewer than 4 samples |
/// | [`DimensionMismatch`](crate::PeriodicityError::DimensionMismatch) | `t` and `x` lengths differ |
/// | [`NonIncreasingTime`](crate::PeriodicityError::NonIncreasingTime) | times not strictly increasing |
/// | [`InvalidParameter`](crate::PeriodicityError::InvalidParameter) | empty or inverted period range, `omega0 < 5` |
///
/// # Example
/// ```
/// use periodicity::wavelet::{wavelet, WaveletConfig};
///
/// let t: Vec<f64> = (0..256).map(|i| i as f64).collect();
/// let x: Vec<f64> = t.iter().map(|&ti| (2.0 * std::f64::consts::PI * ti / 16.0).sin()).collect();
///
/// let config = WaveletConfig::new().with_period_range(4.0, 64.0).with_n_periods(121);
/// let result = wavelet(&t, &x, &config).unwrap();
/// assert_eq!(result.periods.len(), 121);
/// assert!((result.best_period().unwrap() - 16.0).abs() < 2.0);
/// ```
#[tracing::instrument(skip_all, fields(n = t.len(), n_periods = config.n_periods))]
pub fn wavelet(t: &[f64], x: &[f64], config: &WaveletConfig) -> Result<WaveletResult> {
    validate_samples(t, x, MIN_SAMPLES)?;
    if config.n_periods == 0 {
        return Err(PeriodicityError::InvalidParameter(
            "n_periods must be at least 1".into(),
        ));
    }
    if !config.pmin.is_finite() {
        return Err(PeriodicityError::InvalidParameter(format!(
            "pmin must be finite, got {}",
            config.pmin
        )));
    }

    let morlet = Morlet::new(config.omega0)?;
    let dt = median_cadence(t)?;

    let pmin = if config.pmin <= 0.0 {
        2.0 * dt
    } else {
        config.pmin
    };
    let pmax = match config.pmax {
        Some(pmax) => pmax,
        None => {
            let pmax = default_max_period(&morlet, t.len(), dt);
            debug!(pmin, pmax, dt, "using default maximum period");
            pmax
        }
    };
    if !(pmax.is_finite() && pmax >= pmin) {
        return Err(PeriodicityError::InvalidParameter(format!(
            "period range [{}, {}] is invalid",
            pmin, pmax
        )));
    }

    let periods = linspace(pmin, pmax, config.n_periods);
    let scales: Vec<f64> = periods
        .iter()
        .map(|&p| morlet.scale_from_period(p))
        .collect();

    let model = WaveletAnalysis::new(x, t, dt, scales, morlet)?
        .with_unbias(config.unbias)
        .with_mask_coi(config.mask_coi);

    let power = model.wavelet_power();
    let global_power = model.global_wavelet_spectrum();
    if config.mask_coi && global_power.iter().all(|p| p.is_nan()) {
        warn!(
            pmin,
            pmax, "every trial period lies outside the cone of influence"
        );
    }

    Ok(WaveletResult {
        model,
        periods,
        global_power,
        power,
    })
}
