//! Continuous wavelet analysis of a sampled series.
//!
//! Computes the Morlet wavelet transform at an explicit set of scales via
//! FFT convolution, following Torrence & Compo (1998).

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

use super::morlet::{wavenumbers, Morlet};
use crate::core::validate_samples;
use crate::error::{PeriodicityError, Result};
use crate::utils::stats::mean;

/// Minimum number of samples for a wavelet transform.
pub const MIN_SAMPLES: usize = 4;

/// Morlet wavelet analysis of one series.
///
/// The transform is computed once at construction; power and spectra are
/// derived views controlled by [`with_unbias`](Self::with_unbias) and
/// [`with_mask_coi`](Self::with_mask_coi).
#[derive(Debug, Clone)]
pub struct WaveletAnalysis {
    time: Vec<f64>,
    dt: f64,
    wavelet: Morlet,
    scales: Vec<f64>,
    /// Complex coefficients `[n_scales][n_times]`.
    transform: Vec<Vec<Complex64>>,
    unbias: bool,
    mask_coi: bool,
}

impl WaveletAnalysis {
    /// Transform `x(t)` at `scales`, treating samples as spaced by `dt`.
    ///
    /// The mean of `x` is removed before the transform.
    pub fn new(x: &[f64], t: &[f64], dt: f64, scales: Vec<f64>, wavelet: Morlet) -> Result<Self> {
        validate_samples(t, x, MIN_SAMPLES)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PeriodicityError::InvalidParameter(format!(
                "dt must be positive, got {}",
                dt
            )));
        }
        if scales.is_empty() {
            return Err(PeriodicityError::InvalidParameter(
                "at least one scale is required".into(),
            ));
        }
        if scales.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
            return Err(PeriodicityError::InvalidParameter(
                "scales must be positive".into(),
            ));
        }

        let transform = cwt(x, dt, &scales, &wavelet);

        Ok(Self {
            time: t.to_vec(),
            dt,
            wavelet,
            scales,
            transform,
            unbias: true,
            mask_coi: true,
        })
    }

    /// Divide power by scale to rectify the bias toward long periods (default true).
    pub fn with_unbias(mut self, unbias: bool) -> Self {
        self.unbias = unbias;
        self
    }

    /// Restrict the global spectrum to the cone of influence (default true).
    pub fn with_mask_coi(mut self, mask_coi: bool) -> Self {
        self.mask_coi = mask_coi;
        self
    }

    /// Sampling times.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Sampling interval used by the transform.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Mother wavelet.
    pub fn wavelet(&self) -> &Morlet {
        &self.wavelet
    }

    /// Wavelet scales.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Whether power is divided by scale.
    pub fn unbias(&self) -> bool {
        self.unbias
    }

    /// Whether the global spectrum is restricted to the cone of influence.
    pub fn mask_coi(&self) -> bool {
        self.mask_coi
    }

    /// Number of scales.
    pub fn n_scales(&self) -> usize {
        self.scales.len()
    }

    /// Number of time points.
    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    /// Fourier periods equivalent to the scales.
    pub fn fourier_periods(&self) -> Vec<f64> {
        self.scales
            .iter()
            .map(|&s| self.wavelet.fourier_period(s))
            .collect()
    }

    /// Fourier frequencies equivalent to the scales.
    pub fn fourier_frequencies(&self) -> Vec<f64> {
        self.fourier_periods().iter().map(|p| 1.0 / p).collect()
    }

    /// Complex wavelet coefficients `[n_scales][n_times]`.
    pub fn wavelet_transform(&self) -> &[Vec<Complex64>] {
        &self.transform
    }

    /// Wavelet power spectrum `[n_scales][n_times]`.
    ///
    /// `|W(s, t)|²`, divided by `s` when unbiased (Liu et al. 2007).
    pub fn wavelet_power(&self) -> Vec<Vec<f64>> {
        self.transform
            .iter()
            .zip(self.scales.iter())
            .map(|(row, &s)| {
                let norm = if self.unbias { 1.0 / s } else { 1.0 };
                row.iter().map(|c| c.norm_sqr() * norm).collect()
            })
            .collect()
    }

    /// Cone of influence: for each sample, the longest Fourier period not
    /// affected by the series edges.
    pub fn coi(&self) -> Vec<f64> {
        let n = self.n_times();
        (0..n)
            .map(|i| {
                let distance = i.min(n - 1 - i) as f64 * self.dt;
                self.wavelet.coi_period(distance)
            })
            .collect()
    }

    /// `[n_scales][n_times]` mask, true where the point lies inside the cone of influence.
    pub fn coi_mask(&self) -> Vec<Vec<bool>> {
        let coi = self.coi();
        self.fourier_periods()
            .iter()
            .map(|&p| coi.iter().map(|&limit| p <= limit).collect())
            .collect()
    }

    /// Global wavelet spectrum: power averaged over time at each scale.
    ///
    /// With COI masking only samples inside the cone contribute; a scale
    /// with no such sample is NaN.
    pub fn global_wavelet_spectrum(&self) -> Vec<f64> {
        let power = self.wavelet_power();
        if !self.mask_coi {
            return power.iter().map(|row| mean(row)).collect();
        }

        let mask = self.coi_mask();
        power
            .iter()
            .zip(mask.iter())
            .map(|(row, inside)| {
                let (sum, count) = row
                    .iter()
                    .zip(inside.iter())
                    .filter(|(_, &keep)| keep)
                    .fold((0.0, 0usize), |(s, c), (p, _)| (s + p, c + 1));
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            })
            .collect()
    }
}

/// Morlet wavelet transform of `x` at each scale, via FFT convolution.
fn cwt(x: &[f64], dt: f64, scales: &[f64], wavelet: &Morlet) -> Vec<Vec<Complex64>> {
    let n = x.len();
    let x_mean = mean(x);

    // Zero-pad to next power of two
    let npad = n.next_power_of_two();
    let mut signal_fft: Vec<Complex64> = x
        .iter()
        .map(|&v| Complex64::new(v - x_mean, 0.0))
        .chain(std::iter::repeat_n(Complex64::new(0.0, 0.0), npad - n))
        .collect();

    let mut planner = FftPlanner::new();
    let fft_forward = planner.plan_fft_forward(npad);
    let fft_inverse = planner.plan_fft_inverse(npad);
    fft_forward.process(&mut signal_fft);

    let k = wavenumbers(npad, dt);
    // rustfft is unnormalized
    let norm = 1.0 / npad as f64;

    scales
        .iter()
        .map(|&scale| {
            let daughter = wavelet.frequency_response(&k, scale, dt);
            let mut product: Vec<Complex64> = signal_fft
                .iter()
                .zip(daughter.iter())
                .map(|(&s, &d)| s * d)
                .collect();
            fft_inverse.process(&mut product);
            product[..n].iter().map(|&c| c * norm).collect()
        })
        .collect()
}
