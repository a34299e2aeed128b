//! Error types for the biascorr-mapping crate.

use biascorr_ecdf::EcdfError;

use crate::context::SeriesRole;
use crate::season::GroupLabel;

/// Error type for all fallible operations in the biascorr-mapping crate.
///
/// Every variant describes a single cell; none of them is retryable since
/// the correction is a deterministic function of its input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrectionError {
    /// Returned when a series has fewer samples than
    /// `min_reference_samples`.
    #[error(
        "insufficient data in {role} ({group}): need at least {required} values, got {got}"
    )]
    InsufficientData {
        /// Which series is too short.
        role: SeriesRole,
        /// Seasonal group the shortage was found in.
        group: GroupLabel,
        /// Minimum number of values required.
        required: usize,
        /// Number of usable values present.
        got: usize,
    },

    /// Returned when a reference distribution carries no rank information
    /// (zero variance) or has a zero wet-day mean.
    #[error("degenerate distribution in {role} ({group}): {reason}")]
    DegenerateDistribution {
        /// Which series is degenerate.
        role: SeriesRole,
        /// Seasonal group the degeneracy was found in.
        group: GroupLabel,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the three series disagree on sampling step or the two
    /// reference periods differ too much in length.
    #[error("misaligned series: {reason}")]
    MisalignedSeries {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a time series is malformed.
    #[error("invalid time series: {reason}")]
    InvalidSeries {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Wraps an error from the empirical distribution layer.
    #[error(transparent)]
    Ecdf(#[from] EcdfError),
}

impl CorrectionError {
    /// Maps a distribution build failure to a role-tagged error.
    pub(crate) fn from_build(err: EcdfError, role: SeriesRole, group: GroupLabel) -> Self {
        match err {
            EcdfError::InsufficientData { required, got } => Self::InsufficientData {
                role,
                group,
                required,
                got,
            },
            other => Self::Ecdf(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data() {
        let e = CorrectionError::InsufficientData {
            role: SeriesRole::ObservedReference,
            group: GroupLabel::Month(2),
            required: 30,
            got: 12,
        };
        assert_eq!(
            e.to_string(),
            "insufficient data in observed_reference (month 2): need at least 30 values, got 12"
        );
    }

    #[test]
    fn error_degenerate() {
        let e = CorrectionError::DegenerateDistribution {
            role: SeriesRole::SimulatedReference,
            group: GroupLabel::Whole,
            reason: "zero variance".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "degenerate distribution in simulated_reference (whole series): zero variance"
        );
    }

    #[test]
    fn error_misaligned() {
        let e = CorrectionError::MisalignedSeries {
            reason: "step differs".to_string(),
        };
        assert_eq!(e.to_string(), "misaligned series: step differs");
    }

    #[test]
    fn error_from_build_keeps_counts() {
        let e = CorrectionError::from_build(
            EcdfError::InsufficientData {
                required: 30,
                got: 3,
            },
            SeriesRole::SimulatedReference,
            GroupLabel::DayOfYear(45),
        );
        assert!(matches!(
            e,
            CorrectionError::InsufficientData {
                role: SeriesRole::SimulatedReference,
                group: GroupLabel::DayOfYear(45),
                required: 30,
                got: 3,
            }
        ));
    }

    #[test]
    fn error_ecdf_is_transparent() {
        let e: CorrectionError = EcdfError::InvalidProbability { p: 2.0 }.into();
        assert_eq!(e.to_string(), "invalid probability: 2 (must be in [0, 1])");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CorrectionError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CorrectionError>();
    }
}
