//! The Morlet wavelet.

use rustfft::num_complex::Complex64;
use std::f64::consts::{PI, SQRT_2};

use crate::error::{PeriodicityError, Result};

/// Smallest non-dimensional frequency for which the Morlet wavelet is
/// admissible without a correction term.
pub const MIN_OMEGA0: f64 = 5.0;

/// Morlet wavelet: a complex sinusoid under a Gaussian envelope,
/// `ψ(η) = π^(-1/4) exp(i ω0 η) exp(-η² / 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Morlet {
    omega0: f64,
}

impl Default for Morlet {
    fn default() -> Self {
        Self { omega0: 6.0 }
    }
}

impl Morlet {
    /// Create a Morlet wavelet with non-dimensional frequency `omega0`.
    pub fn new(omega0: f64) -> Result<Self> {
        if !omega0.is_finite() || omega0 < MIN_OMEGA0 {
            return Err(PeriodicityError::InvalidParameter(format!(
                "omega0 must be >= {}, got {}",
                MIN_OMEGA0, omega0
            )));
        }
        Ok(Self { omega0 })
    }

    /// Non-dimensional frequency.
    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    /// Ratio of Fourier period to wavelet scale.
    pub fn fourier_factor(&self) -> f64 {
        4.0 * PI / (self.omega0 + (2.0 + self.omega0 * self.omega0).sqrt())
    }

    /// Fourier period equivalent to `scale`.
    pub fn fourier_period(&self, scale: f64) -> f64 {
        scale * self.fourier_factor()
    }

    /// Scale equivalent to a Fourier `period`.
    pub fn scale_from_period(&self, period: f64) -> f64 {
        period / self.fourier_factor()
    }

    /// E-folding time of the wavelet power at `scale` for a spike at an edge.
    pub fn e_folding_time(&self, scale: f64) -> f64 {
        SQRT_2 * scale
    }

    /// Longest Fourier period unaffected by an edge `distance` time units away.
    pub fn coi_period(&self, distance: f64) -> f64 {
        self.fourier_factor() / SQRT_2 * distance
    }

    /// Daughter wavelet at `scale` in the Fourier domain, on angular
    /// wavenumbers `k`, normalized to unit energy for sampling interval `dt`.
    ///
    /// Zero for non-positive wavenumbers (analytic wavelet).
    pub fn frequency_response(&self, k: &[f64], scale: f64, dt: f64) -> Vec<Complex64> {
        let norm = (2.0 * PI * scale / dt).sqrt() * PI.powf(-0.25);
        k.iter()
            .map(|&ki| {
                if ki > 0.0 {
                    let exponent = -0.5 * (scale * ki - self.omega0).powi(2);
                    Complex64::new(norm * exponent.exp(), 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect()
    }
}

/// Angular wavenumbers of an FFT grid of length `npad`.
///
/// Positive frequencies for `i = 1..=npad/2`, negative above.
pub fn wavenumbers(npad: usize, dt: f64) -> Vec<f64> {
    let dk = 2.0 * PI / (npad as f64 * dt);
    (0..npad)
        .map(|i| {
            if i <= npad / 2 {
                i as f64 * dk
            } else {
                -((npad - i) as f64) * dk
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_omega0() {
        assert_relative_eq!(Morlet::default().omega0(), 6.0);
    }

    #[test]
    fn rejects_small_omega0() {
        assert!(Morlet::new(4.0).is_err());
        assert!(Morlet::new(f64::NAN).is_err());
        assert!(Morlet::new(8.0).is_ok());
    }

    #[test]
    fn fourier_factor_for_omega0_6() {
        // Torrence & Compo (1998), Table 1: λ = 1.033 s
        assert_relative_eq!(Morlet::default().fourier_factor(), 1.033, epsilon = 1e-3);
    }

    #[test]
    fn period_scale_round_trip() {
        let w = Morlet::default();
        let scale = w.scale_from_period(12.5);
        assert_relative_eq!(w.fourier_period(scale), 12.5, epsilon = 1e-12);
    }

    #[test]
    fn coi_matches_e_folding_time() {
        // A scale is on the COI boundary when its e-folding time equals the edge distance
        let w = Morlet::default();
        let scale = 3.0;
        let distance = w.e_folding_time(scale);
        assert_relative_eq!(w.coi_period(distance), w.fourier_period(scale), epsilon = 1e-12);
    }

    #[test]
    fn wavenumbers_ordering() {
        let npad = 16;
        let k = wavenumbers(npad, 1.0);
        assert_eq!(k.len(), npad);
        assert!(k[0].abs() < f64::EPSILON);
        for (i, &ki) in k.iter().enumerate().take(npad / 2 + 1).skip(1) {
            assert!(ki > 0.0, "k[{}] = {} should be positive", i, ki);
        }
        for (i, &ki) in k.iter().enumerate().skip(npad / 2 + 1) {
            assert!(ki < 0.0, "k[{}] = {} should be negative", i, ki);
        }
    }

    #[test]
    fn frequency_response_is_analytic() {
        let k = wavenumbers(16, 1.0);
        let daughter = Morlet::default().frequency_response(&k, 4.0, 1.0);
        assert!(daughter[0].norm() < f64::EPSILON);
        for (i, d) in daughter.iter().enumerate().skip(16 / 2 + 1) {
            assert!(d.norm() < f64::EPSILON, "daughter[{}] should be zero", i);
        }
    }

    #[test]
    fn frequency_response_peaks_at_omega0_over_scale() {
        let w = Morlet::default();
        let k = wavenumbers(1024, 1.0);
        let scale = 8.0;
        let daughter = w.frequency_response(&k, scale, 1.0);
        let (peak, _) = daughter
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.re.partial_cmp(&b.re).unwrap())
            .unwrap();
        let expected = w.omega0() / scale;
        let dk = k[1];
        assert!((k[peak] - expected).abs() <= dk);
    }
}
