//! Error types for the periodicity library.

use thiserror::Error;

/// Result type alias for periodicity operations.
pub type Result<T> = std::result::Result<T, PeriodicityError>;

/// Errors that can occur while computing periodograms and wavelet spectra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeriodicityError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between input arrays.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Input contains NaN or infinite values.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Sampling times are not strictly increasing.
    #[error("time array must be strictly increasing (violated at index {index})")]
    NonIncreasingTime { index: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// False alarm method name not recognized.
    #[error("Unknown FAP method {0}")]
    UnknownFapMethod(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = PeriodicityError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = PeriodicityError::InsufficientData { needed: 4, got: 2 };
        assert_eq!(err.to_string(), "insufficient data: need at least 4, got 2");

        let err = PeriodicityError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = PeriodicityError::NonIncreasingTime { index: 7 };
        assert_eq!(
            err.to_string(),
            "time array must be strictly increasing (violated at index 7)"
        );

        let err = PeriodicityError::UnknownFapMethod("naive".to_string());
        assert_eq!(err.to_string(), "Unknown FAP method naive");

        let err = PeriodicityError::InvalidParameter("n_periods must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid parameter: n_periods must be positive"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = PeriodicityError::NonFiniteData;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PeriodicityError>();
    }
}
