//! Core input handling shared by the periodogram and wavelet modules.

mod samples;

pub use samples::{
    baseline, median_cadence, pseudo_nyquist, validate_samples, validate_times,
    validate_uncertainties,
};
