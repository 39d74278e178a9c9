//! False alarm probabilities for periodogram peaks.
//!
//! Two estimators are supported:
//! - [`FapMethod::Baluev`]: analytic upper bound of Baluev (2008), based on
//!   extreme value statistics of the periodogram as a random process.
//! - [`FapMethod::Bootstrap`]: empirical distribution of the highest peak
//!   over periodograms of resampled data.

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rand::SeedableRng;
use statrs::function::gamma::ln_gamma;
use tracing::debug;

use super::grid::FrequencyGrid;
use super::lomb_scargle::{LombScargle, Normalization};
use crate::error::{PeriodicityError, Result};
use crate::utils::stats::{nan_max, quantile_sorted, weighted_variance};

const BISECTION_ITERATIONS: usize = 200;

/// Method used to estimate false alarm probabilities and levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FapMethod {
    /// Baluev (2008) analytic approximation.
    Baluev,
    /// Bootstrap resampling of the observations.
    ///
    /// Resampled periodograms are evaluated on the caller's full frequency
    /// grid (minimum frequency and samples per peak included), not on the
    /// default automatic grid up to the maximum frequency.
    Bootstrap,
}

impl FapMethod {
    /// Name accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            FapMethod::Baluev => "baluev",
            FapMethod::Bootstrap => "bootstrap",
        }
    }
}

impl fmt::Display for FapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FapMethod {
    type Err = PeriodicityError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "baluev" => Ok(FapMethod::Baluev),
            "bootstrap" => Ok(FapMethod::Bootstrap),
            other => Err(PeriodicityError::UnknownFapMethod(other.to_string())),
        }
    }
}

/// Configuration for bootstrap false alarm estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapConfig {
    /// Number of resampled periodograms.
    pub n_bootstraps: usize,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_bootstraps: 1000,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Create a config with the given number of resamples.
    pub fn new(n_bootstraps: usize) -> Self {
        Self {
            n_bootstraps,
            ..Default::default()
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Peak significance model for one periodogram.
///
/// Estimated once per model and frequency grid, then queried for any
/// number of peak heights or probabilities.
#[derive(Debug, Clone)]
pub(crate) enum PeakSignificance {
    Baluev(BaluevModel),
    /// Sorted maxima of the bootstrap periodograms.
    Bootstrap(Vec<f64>),
}

impl PeakSignificance {
    pub(crate) fn estimate(
        model: &LombScargle,
        method: FapMethod,
        grid: &FrequencyGrid,
        bootstrap: &BootstrapConfig,
    ) -> Result<Self> {
        match method {
            FapMethod::Baluev => {
                let (_, fmax) = model.frequency_limits(grid)?;
                Ok(PeakSignificance::Baluev(BaluevModel::new(model, fmax)?))
            }
            FapMethod::Bootstrap => {
                let frequency = model.autofrequency(grid)?;
                Ok(PeakSignificance::Bootstrap(bootstrap_maxima(
                    model, &frequency, bootstrap,
                )?))
            }
        }
    }

    pub(crate) fn false_alarm_probability(&self, power: f64) -> Result<f64> {
        if power.is_nan() {
            return Err(PeriodicityError::NonFiniteData);
        }
        Ok(match self {
            PeakSignificance::Baluev(model) => model.fap(power),
            PeakSignificance::Bootstrap(maxima) => {
                let below = maxima.partition_point(|&m| m < power);
                1.0 - below as f64 / maxima.len() as f64
            }
        })
    }

    pub(crate) fn false_alarm_level(&self, level: f64) -> Result<f64> {
        if !(level > 0.0 && level < 1.0) {
            return Err(PeriodicityError::InvalidParameter(format!(
                "false alarm probability must lie in (0, 1), got {}",
                level
            )));
        }
        Ok(match self {
            PeakSignificance::Baluev(model) => model.level(level),
            PeakSignificance::Bootstrap(maxima) => quantile_sorted(maxima, 1.0 - level),
        })
    }
}

/// Baluev (2008) "alias-free" false alarm approximation.
#[derive(Debug, Clone)]
pub(crate) struct BaluevModel {
    n: f64,
    /// Effective number of independent frequencies, `fmax * sqrt(4 pi var(t))`.
    w: f64,
    normalization: Normalization,
}

impl BaluevModel {
    fn new(model: &LombScargle, fmax: f64) -> Result<Self> {
        let n = model.len();
        if n <= 3 {
            return Err(PeriodicityError::InsufficientData { needed: 4, got: n });
        }
        let var_t = weighted_variance(model.t(), &model.inverse_variances());
        let t_eff = (4.0 * PI * var_t).sqrt();
        Ok(Self {
            n: n as f64,
            w: fmax * t_eff,
            normalization: model.normalization(),
        })
    }

    /// FAP for a single frequency.
    fn fap_single(&self, z: f64) -> f64 {
        match self.normalization {
            Normalization::Standard => {
                let nk = self.n - 3.0;
                (1.0 - z).max(0.0).powf(0.5 * nk)
            }
            Normalization::Psd => (-z).exp(),
        }
    }

    /// Expected number of upcrossings of level `z` (Davies bound).
    fn tau(&self, z: f64) -> f64 {
        match self.normalization {
            Normalization::Standard => {
                let nh = self.n - 1.0;
                let nk = self.n - 3.0;
                gamma_factor(nh)
                    * self.w
                    * (1.0 - z).max(0.0).powf(0.5 * (nk - 1.0))
                    * (0.5 * nh * z).sqrt()
            }
            Normalization::Psd => self.w * (-z).exp() * z.sqrt(),
        }
    }

    fn fap(&self, z: f64) -> f64 {
        let z = match self.normalization {
            Normalization::Standard => z.clamp(0.0, 1.0),
            Normalization::Psd => z.max(0.0),
        };
        let fap = 1.0 - (1.0 - self.fap_single(z)) * (-self.tau(z)).exp();
        fap.clamp(0.0, 1.0)
    }

    /// Peak height whose FAP equals `level`, by bisection.
    fn level(&self, level: f64) -> f64 {
        let mut lo = 0.0;
        let mut hi = match self.normalization {
            Normalization::Standard => 1.0,
            Normalization::Psd => {
                let mut hi = 1.0;
                while self.fap(hi) > level && hi < 1e6 {
                    hi *= 2.0;
                }
                hi
            }
        };
        for _ in 0..BISECTION_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.fap(mid) > level {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < 1e-14 {
                break;
            }
        }
        0.5 * (lo + hi)
    }
}

/// `sqrt(2/N) * Γ(N/2) / Γ((N-1)/2)`, close to `1 - 0.75/N` for large N.
fn gamma_factor(n: f64) -> f64 {
    (2.0 / n).sqrt() * (ln_gamma(0.5 * n) - ln_gamma(0.5 * (n - 1.0))).exp()
}

/// Sorted maximum powers of periodograms of data resampled with replacement.
fn bootstrap_maxima(
    model: &LombScargle,
    frequency: &[f64],
    config: &BootstrapConfig,
) -> Result<Vec<f64>> {
    if config.n_bootstraps == 0 {
        return Err(PeriodicityError::InvalidParameter(
            "bootstrap requires at least one resample".into(),
        ));
    }

    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = model.len();
    let y = model.y();
    let dy = model.dy();

    let mut maxima = Vec::with_capacity(config.n_bootstraps);
    for _ in 0..config.n_bootstraps {
        let idx: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
        let y_boot: Vec<f64> = idx.iter().map(|&i| y[i]).collect();
        let dy_boot = dy.map(|d| idx.iter().map(|&i| d[i]).collect());

        let power = model.with_values(y_boot, dy_boot).power(frequency);
        let peak = nan_max(&power);
        maxima.push(if peak.is_nan() { 0.0 } else { peak });
    }

    maxima.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    debug!(
        n_bootstraps = config.n_bootstraps,
        median_peak = quantile_sorted(&maxima, 0.5),
        "bootstrap peak distribution"
    );
    Ok(maxima)
}
