//! Lomb-Scargle periodograms for irregularly sampled time series.
//!
//! This module provides:
//! - [`periodogram`]: generalized Lomb-Scargle power spectrum with optional
//!   false alarm probability of the highest peak and false alarm levels
//! - [`window`]: periodogram of the sampling comb, to characterize spectral
//!   leakage from uneven sampling
//! - [`LombScargle`]: the underlying model, for evaluating power at arbitrary
//!   frequencies or the best-fit sinusoid

mod fap;
mod grid;
mod lomb_scargle;

pub use fap::{BootstrapConfig, FapMethod};
pub use grid::{FrequencyGrid, DEFAULT_NYQUIST_FACTOR, DEFAULT_SAMPLES_PER_PEAK, MAX_GRID_SIZE};
pub use lomb_scargle::{LombScargle, Normalization};

use tracing::debug;

use crate::core::pseudo_nyquist;
use crate::error::Result;
use crate::utils::stats::nan_max;
use fap::PeakSignificance;

/// Configuration for [`periodogram`].
///
/// # Example
/// ```
/// use periodicity::periodogram::{FapMethod, PeriodogramConfig};
///
/// let config = PeriodogramConfig::new()
///     .with_max_frequency(2.0)
///     .with_samples_per_peak(10.0)
///     .with_fap_method(FapMethod::Baluev)
///     .with_fap_levels(vec![0.1, 0.01]);
/// assert_eq!(config.fap_method, Some(FapMethod::Baluev));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodogramConfig {
    /// Measurement uncertainties, one per sample.
    pub dx: Option<Vec<f64>>,
    /// Minimum frequency.
    pub f0: f64,
    /// Maximum frequency (None = pseudo-Nyquist limit `1 / (2 * median(diff(t)))`).
    pub fmax: Option<f64>,
    /// Grid samples per periodogram peak.
    pub samples_per_peak: f64,
    /// Method for the false alarm probability of the highest peak.
    pub fap_method: Option<FapMethod>,
    /// False alarm probabilities whose peak heights should be approximated.
    pub fap_levels: Option<Vec<f64>>,
    /// Leave the periodogram unnormalized (power spectral density).
    pub psd: bool,
    /// Settings for [`FapMethod::Bootstrap`].
    pub bootstrap: BootstrapConfig,
}

impl Default for PeriodogramConfig {
    fn default() -> Self {
        Self {
            dx: None,
            f0: 0.0,
            fmax: None,
            samples_per_peak: DEFAULT_SAMPLES_PER_PEAK,
            fap_method: None,
            fap_levels: None,
            psd: false,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl PeriodogramConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set measurement uncertainties.
    pub fn with_uncertainties(mut self, dx: Vec<f64>) -> Self {
        self.dx = Some(dx);
        self
    }

    /// Set minimum frequency.
    pub fn with_min_frequency(mut self, f0: f64) -> Self {
        self.f0 = f0;
        self
    }

    /// Set maximum frequency.
    pub fn with_max_frequency(mut self, fmax: f64) -> Self {
        self.fmax = Some(fmax);
        self
    }

    /// Set samples per peak.
    pub fn with_samples_per_peak(mut self, n: f64) -> Self {
        self.samples_per_peak = n;
        self
    }

    /// Set the false alarm probability method.
    pub fn with_fap_method(mut self, method: FapMethod) -> Self {
        self.fap_method = Some(method);
        self
    }

    /// Set the false alarm probabilities to convert into peak heights.
    pub fn with_fap_levels(mut self, levels: Vec<f64>) -> Self {
        self.fap_levels = Some(levels);
        self
    }

    /// Toggle unnormalized (PSD) power.
    pub fn with_psd(mut self, psd: bool) -> Self {
        self.psd = psd;
        self
    }

    /// Set bootstrap settings.
    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Normalization passed to the model.
    pub fn normalization(&self) -> Normalization {
        if self.psd {
            Normalization::Psd
        } else {
            Normalization::Standard
        }
    }
}

/// Result of [`periodogram`].
#[derive(Debug, Clone)]
pub struct PeriodogramResult {
    /// The model for the given dataset.
    pub model: LombScargle,
    /// Frequency grid.
    pub frequency: Vec<f64>,
    /// Power at each frequency.
    pub power: Vec<f64>,
    /// False alarm probability of the highest peak (only with a FAP method).
    pub fap: Option<f64>,
    /// Peak heights for the requested false alarm probabilities
    /// (only with a FAP method and levels).
    pub fal: Option<Vec<f64>>,
}

impl PeriodogramResult {
    /// Index of the highest peak.
    pub fn peak_index(&self) -> Option<usize> {
        self.power
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }

    /// Frequency of the highest peak.
    pub fn best_frequency(&self) -> Option<f64> {
        self.peak_index().map(|i| self.frequency[i])
    }

    /// Period of the highest peak (None if it sits at zero frequency).
    pub fn best_period(&self) -> Option<f64> {
        self.best_frequency()
            .filter(|&f| f > 0.0)
            .map(|f| 1.0 / f)
    }

    /// Height of the highest peak.
    pub fn peak_power(&self) -> Option<f64> {
        self.peak_index().map(|i| self.power[i])
    }
}

/// Compute the generalized Lomb-Scargle periodogram of `x(t)`.
///
/// When no maximum frequency is configured, the pseudo-Nyquist limit
/// `1 / (2 * median(diff(t)))` is used. With a FAP method, the false alarm
/// probability of the highest peak is evaluated on the same frequency grid,
/// and with FAP levels also the corresponding peak heights.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`EmptyData`](crate::PeriodicityError::EmptyData) | no samples |
/// | [`DimensionMismatch`](crate::PeriodicityError::DimensionMismatch) | `t`, `x` or `dx` lengths differ |
/// | [`NonIncreasingTime`](crate::PeriodicityError::NonIncreasingTime) | times not strictly increasing |
/// | [`InvalidParameter`](crate::PeriodicityError::InvalidParameter) | bad grid limits, uncertainties or FAP levels |
///
/// # Example
/// ```
/// use periodicity::periodogram::{periodogram, PeriodogramConfig};
///
/// let t: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
/// let x: Vec<f64> = t.iter().map(|&ti| (2.0 * std::f64::consts::PI * ti / 4.0).sin()).collect();
///
/// let result = periodogram(&t, &x, &PeriodogramConfig::default()).unwrap();
/// let period = result.best_period().unwrap();
/// assert!((period - 4.0).abs() < 0.1);
/// assert!(result.fap.is_none());
/// ```
#[tracing::instrument(skip_all, fields(n = t.len(), psd = config.psd))]
pub fn periodogram(t: &[f64], x: &[f64], config: &PeriodogramConfig) -> Result<PeriodogramResult> {
    let mut model =
        LombScargle::new(t.to_vec(), x.to_vec())?.with_normalization(config.normalization());
    if let Some(dx) = &config.dx {
        model = model.with_dy(dx.clone())?;
    }

    let fmax = match config.fmax {
        Some(fmax) => fmax,
        None => {
            let fmax = pseudo_nyquist(t)?;
            debug!(fmax, "using pseudo-Nyquist maximum frequency");
            fmax
        }
    };

    let grid = FrequencyGrid::new(config.samples_per_peak)
        .with_minimum_frequency(config.f0)
        .with_maximum_frequency(fmax);
    let (frequency, power) = model.autopower(&grid)?;

    let (fap, fal) = match config.fap_method {
        None => (None, None),
        Some(method) => {
            let significance = PeakSignificance::estimate(&model, method, &grid, &config.bootstrap)?;
            let fap = significance.false_alarm_probability(nan_max(&power))?;
            let fal = match &config.fap_levels {
                Some(levels) => Some(
                    levels
                        .iter()
                        .map(|&level| significance.false_alarm_level(level))
                        .collect::<Result<Vec<f64>>>()?,
                ),
                None => None,
            };
            debug!(%method, fap, "false alarm probability of highest peak");
            (Some(fap), fal)
        }
    };

    Ok(PeriodogramResult {
        model,
        frequency,
        power,
        fap,
        fal,
    })
}

/// Result of [`window`].
#[derive(Debug, Clone)]
pub struct WindowResult {
    /// Frequency grid.
    pub frequency: Vec<f64>,
    /// Power of the sampling window at each frequency.
    pub power: Vec<f64>,
}

/// Periodogram of the window function of the sampling times `t`.
///
/// Treats the sampling comb as a constant unit signal without mean fitting
/// or centering, so its periodogram shows the aliases and leakage induced by
/// the sampling pattern. The grid starts at zero frequency, where the power
/// is one, and extends to five times the average Nyquist frequency.
///
/// # Example
/// ```
/// use periodicity::periodogram::window;
///
/// let t: Vec<f64> = (0..50).map(|i| i as f64 + 0.2 * (i as f64).sin()).collect();
/// let w = window(&t, 5.0).unwrap();
/// assert!((w.power[0] - 1.0).abs() < 1e-12);
/// ```
#[tracing::instrument(skip_all, fields(n = t.len()))]
pub fn window(t: &[f64], samples_per_peak: f64) -> Result<WindowResult> {
    let model = LombScargle::new(t.to_vec(), vec![1.0; t.len()])?
        .with_fit_mean(false)
        .with_center_data(false);
    let grid = FrequencyGrid::new(samples_per_peak).with_minimum_frequency(0.0);
    let (frequency, power) = model.autopower(&grid)?;
    Ok(WindowResult { frequency, power })
}
