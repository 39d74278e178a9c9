//! Numerical helpers shared by the periodogram and wavelet modules.

pub mod lstsq;
pub mod stats;

pub use lstsq::weighted_lstsq;
pub use stats::{linspace, median, quantile_sorted};
