//! Property-based tests for periodograms and wavelet spectra.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated sampling patterns and signals.

use periodicity::periodogram::{periodogram, window, FapMethod, PeriodogramConfig};
use periodicity::wavelet::{wavelet, WaveletConfig};
use periodicity::PeriodicityError;
use proptest::prelude::*;

/// Strategy for strictly increasing sampling times with gaps in `[0.1, 2.0)`.
fn times_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(0.1..2.0_f64, len).prop_map(|gaps| {
            gaps.iter()
                .scan(0.0, |acc, g| {
                    *acc += g;
                    Some(*acc)
                })
                .collect()
        })
    })
}

/// Strategy for a series sampled on irregular times.
/// Adds a small trend so the values are never constant.
fn series_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    times_strategy(min_len, max_len).prop_flat_map(|t| {
        let n = t.len();
        (Just(t), prop::collection::vec(-100.0..100.0_f64, n)).prop_map(|(t, mut x)| {
            for (i, v) in x.iter_mut().enumerate() {
                *v += i as f64 * 0.01;
            }
            (t, x)
        })
    })
}

/// Strategy for a uniformly sampled sinusoid.
fn uniform_sine_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, f64)> {
    (32usize..200, 0.1..2.0_f64, 4.0..12.0_f64).prop_map(|(n, dt, cycles)| {
        let t: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let period = n as f64 * dt / cycles;
        let x = t
            .iter()
            .map(|&ti| (2.0 * std::f64::consts::PI * ti / period).sin())
            .collect();
        (t, x, dt)
    })
}

// =============================================================================
// Property: frequency grid
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn default_fmax_is_pseudo_nyquist((t, x, dt) in uniform_sine_strategy()) {
        let result = periodogram(&t, &x, &PeriodogramConfig::default()).unwrap();
        let baseline = t[t.len() - 1] - t[0];
        let df = 1.0 / (5.0 * baseline);
        let last = *result.frequency.last().unwrap();
        prop_assert!((last - 0.5 / dt).abs() <= 0.5 * df + 1e-9);
    }

    #[test]
    fn frequencies_increase_and_match_power((t, x) in series_strategy(10, 80)) {
        let result = periodogram(&t, &x, &PeriodogramConfig::default()).unwrap();
        prop_assert_eq!(result.frequency.len(), result.power.len());
        prop_assert!(result.frequency.windows(2).all(|w| w[1] > w[0]));
    }
}

// =============================================================================
// Property: power is finite and normalized
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn standard_power_in_unit_interval((t, x) in series_strategy(10, 80)) {
        let result = periodogram(&t, &x, &PeriodogramConfig::default()).unwrap();
        for &p in &result.power {
            prop_assert!(p.is_finite());
            prop_assert!(p >= -1e-12 && p <= 1.0 + 1e-9, "power {}", p);
        }
    }

    #[test]
    fn psd_power_nonnegative((t, x) in series_strategy(10, 80)) {
        let result = periodogram(&t, &x, &PeriodogramConfig::new().with_psd(true)).unwrap();
        for &p in &result.power {
            prop_assert!(p.is_finite());
            prop_assert!(p >= -1e-9);
        }
    }

    #[test]
    fn window_never_nan(t in times_strategy(3, 80)) {
        let w = window(&t, 5.0).unwrap();
        prop_assert!(w.power.iter().all(|p| !p.is_nan()));
        prop_assert!((w.power[0] - 1.0).abs() < 1e-9);
    }
}

// =============================================================================
// Property: false alarm probabilities
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn baluev_fap_is_a_probability((t, x) in series_strategy(10, 80)) {
        let config = PeriodogramConfig::new()
            .with_fap_method(FapMethod::Baluev)
            .with_fap_levels(vec![0.5, 0.1, 0.01]);
        let result = periodogram(&t, &x, &config).unwrap();

        let fap = result.fap.unwrap();
        prop_assert!((0.0..=1.0).contains(&fap));

        let fal = result.fal.unwrap();
        prop_assert_eq!(fal.len(), 3);
        prop_assert!(fal.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn unknown_fap_names_rejected(name in "[a-z]{1,12}") {
        prop_assume!(name != "baluev" && name != "bootstrap");
        let err = name.parse::<FapMethod>().unwrap_err();
        prop_assert_eq!(err, PeriodicityError::UnknownFapMethod(name));
    }
}

// =============================================================================
// Property: wavelet output shape
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn wavelet_lengths_match_n_periods(
        (t, x) in series_strategy(8, 120),
        n_periods in 1usize..60
    ) {
        let result = wavelet(&t, &x, &WaveletConfig::new().with_n_periods(n_periods)).unwrap();
        prop_assert_eq!(result.periods.len(), n_periods);
        prop_assert_eq!(result.global_power.len(), n_periods);
        prop_assert_eq!(result.power.len(), n_periods);
        prop_assert!(result.power.iter().all(|row| row.len() == t.len()));
        prop_assert!(result.periods.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn wavelet_power_nonnegative((t, x) in series_strategy(8, 120)) {
        let result = wavelet(&t, &x, &WaveletConfig::new().with_n_periods(20)).unwrap();
        for row in &result.power {
            prop_assert!(row.iter().all(|&p| p.is_finite() && p >= 0.0));
        }
    }
}
