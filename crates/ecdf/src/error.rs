//! Error types for the biascorr-ecdf crate.

/// Error type for all fallible operations in the biascorr-ecdf crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcdfError {
    /// Returned when a sample has too few finite values to build a
    /// distribution from.
    #[error("insufficient data: need at least {required} finite values, got {got}")]
    InsufficientData {
        /// Minimum number of finite values required.
        required: usize,
        /// Number of finite values present.
        got: usize,
    },

    /// Returned when a cumulative probability is NaN or outside `[0, 1]`.
    #[error("invalid probability: {p} (must be in [0, 1])")]
    InvalidProbability {
        /// The offending probability.
        p: f64,
    },

    /// Returned when a value domain has crossed or non-finite bounds.
    #[error("invalid value domain: lower={lower}, upper={upper}")]
    InvalidDomain {
        /// Requested lower bound.
        lower: f64,
        /// Requested upper bound.
        upper: f64,
    },
}
