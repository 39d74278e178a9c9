//! # periodicity
//!
//! Period detection for unevenly sampled time series.
//!
//! Provides the generalized Lomb-Scargle periodogram with false alarm
//! probabilities (Baluev analytic bound or bootstrap), the periodogram of
//! the sampling window, and Morlet wavelet power spectra with their global
//! (time-averaged) spectrum.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod periodogram;
pub mod utils;
pub mod wavelet;

pub use error::{PeriodicityError, Result};
pub use periodogram::{periodogram, window};
pub use wavelet::wavelet;

pub mod prelude {
    pub use crate::error::{PeriodicityError, Result};
    pub use crate::periodogram::{
        periodogram, window, BootstrapConfig, FapMethod, FrequencyGrid, LombScargle,
        Normalization, PeriodogramConfig, PeriodogramResult, WindowResult,
    };
    pub use crate::wavelet::{wavelet, Morlet, WaveletAnalysis, WaveletConfig, WaveletResult};
}
