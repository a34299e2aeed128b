//! Configuration for bias correction.

use crate::error::CorrectionError;
use biascorr_ecdf::ExtrapolationPolicy;

/// Largest day-of-year window half-width; beyond this the window covers
/// the whole year.
pub const MAX_WINDOW_HALF_WIDTH: u16 = 183;

/// Distribution-mapping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Plain empirical quantile mapping.
    #[default]
    QuantileMapping,
    /// Scaled distribution mapping with trend preservation.
    ScaledDistributionMapping,
}

impl Method {
    /// Short lowercase name used in logs and output files.
    pub fn name(self) -> &'static str {
        match self {
            Self::QuantileMapping => "quantile_mapping",
            Self::ScaledDistributionMapping => "scaled_distribution_mapping",
        }
    }
}

/// How the series are split into seasonal groups before correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seasonality {
    /// The whole series is one group.
    #[default]
    Whole,
    /// One group per calendar month.
    Monthly,
    /// One group per target calendar day, with reference samples drawn from
    /// `± half_width` days around it on the circular year. Days are matched
    /// by month and day, so leap and non-leap years line up from March 1.
    DayOfYearWindow {
        /// Window half-width in days.
        half_width: u16,
    },
}

/// How a target value is turned into a probability and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantileEstimator {
    /// Linear interpolation on Weibull positions, with tail extrapolation.
    #[default]
    Interpolated,
    /// Step ECDF of the simulated reference, type-7 percentile of the
    /// observed reference. Never extrapolates.
    EcdfPercentile,
}

/// Central tendency removed before the residuals are mapped in continuous
/// scaled distribution mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendModel {
    /// The series mean.
    #[default]
    Mean,
    /// A least-squares line over the sample index.
    Linear,
}

/// Configuration for a bias correction run.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use biascorr_mapping::{CorrectionConfig, Method, Seasonality};
///
/// let config = CorrectionConfig::new()
///     .with_method(Method::ScaledDistributionMapping)
///     .with_seasonality(Seasonality::Monthly)
///     .with_min_reference_samples(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CorrectionConfig {
    method: Method,
    wet_day_threshold: f64,
    min_reference_samples: usize,
    extrapolation_policy: ExtrapolationPolicy,
    frequency_tolerance: f64,
    max_reference_length_ratio: f64,
    seasonality: Seasonality,
    estimator: QuantileEstimator,
    trend_model: TrendModel,
}

impl CorrectionConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `method = QuantileMapping`, `wet_day_threshold = 0.1`,
    /// `min_reference_samples = 30`, `extrapolation_policy = ClampToDomain`,
    /// `frequency_tolerance = 0.01`, `max_reference_length_ratio = 2.0`,
    /// `seasonality = Whole`, `estimator = Interpolated`,
    /// `trend_model = Mean`.
    pub fn new() -> Self {
        Self {
            method: Method::QuantileMapping,
            wet_day_threshold: 0.1,
            min_reference_samples: 30,
            extrapolation_policy: ExtrapolationPolicy::ClampToDomain,
            frequency_tolerance: 0.01,
            max_reference_length_ratio: 2.0,
            seasonality: Seasonality::Whole,
            estimator: QuantileEstimator::Interpolated,
            trend_model: TrendModel::Mean,
        }
    }

    // --- Builder methods ---

    /// Sets the correction method.
    pub fn with_method(mut self, m: Method) -> Self {
        self.method = m;
        self
    }

    /// Sets the wet-day threshold; values at or below it are dry.
    pub fn with_wet_day_threshold(mut self, v: f64) -> Self {
        self.wet_day_threshold = v;
        self
    }

    /// Sets the minimum number of reference samples per group.
    pub fn with_min_reference_samples(mut self, n: usize) -> Self {
        self.min_reference_samples = n;
        self
    }

    /// Sets the tail extrapolation policy.
    pub fn with_extrapolation_policy(mut self, p: ExtrapolationPolicy) -> Self {
        self.extrapolation_policy = p;
        self
    }

    /// Sets the dry-fraction difference tolerated before frequency
    /// adaptation kicks in.
    pub fn with_frequency_tolerance(mut self, v: f64) -> Self {
        self.frequency_tolerance = v;
        self
    }

    /// Sets the largest allowed ratio between the two reference lengths.
    pub fn with_max_reference_length_ratio(mut self, v: f64) -> Self {
        self.max_reference_length_ratio = v;
        self
    }

    /// Sets the seasonal grouping.
    pub fn with_seasonality(mut self, s: Seasonality) -> Self {
        self.seasonality = s;
        self
    }

    /// Sets the quantile estimator.
    pub fn with_estimator(mut self, e: QuantileEstimator) -> Self {
        self.estimator = e;
        self
    }

    /// Sets the trend model for continuous scaled distribution mapping.
    pub fn with_trend_model(mut self, t: TrendModel) -> Self {
        self.trend_model = t;
        self
    }

    // --- Accessors ---

    /// Returns the correction method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the wet-day threshold.
    pub fn wet_day_threshold(&self) -> f64 {
        self.wet_day_threshold
    }

    /// Returns the minimum number of reference samples per group.
    pub fn min_reference_samples(&self) -> usize {
        self.min_reference_samples
    }

    /// Returns the tail extrapolation policy.
    pub fn extrapolation_policy(&self) -> ExtrapolationPolicy {
        self.extrapolation_policy
    }

    /// Returns the frequency adaptation tolerance.
    pub fn frequency_tolerance(&self) -> f64 {
        self.frequency_tolerance
    }

    /// Returns the largest allowed reference length ratio.
    pub fn max_reference_length_ratio(&self) -> f64 {
        self.max_reference_length_ratio
    }

    /// Returns the seasonal grouping.
    pub fn seasonality(&self) -> Seasonality {
        self.seasonality
    }

    /// Returns the quantile estimator.
    pub fn estimator(&self) -> QuantileEstimator {
        self.estimator
    }

    /// Returns the trend model.
    pub fn trend_model(&self) -> TrendModel {
        self.trend_model
    }

    /// Validates this configuration.
    ///
    /// Checks that `wet_day_threshold` is finite and non-negative,
    /// `min_reference_samples` is at least 2, `frequency_tolerance` is in
    /// `[0, 1)`, `max_reference_length_ratio` is finite and at least 1, and
    /// a day-of-year window is no wider than half a year.
    pub fn validate(&self) -> Result<(), CorrectionError> {
        if !self.wet_day_threshold.is_finite() || self.wet_day_threshold < 0.0 {
            return Err(CorrectionError::InvalidConfig {
                reason: format!(
                    "wet_day_threshold must be finite and >= 0, got {}",
                    self.wet_day_threshold
                ),
            });
        }

        if self.min_reference_samples < 2 {
            return Err(CorrectionError::InvalidConfig {
                reason: format!(
                    "min_reference_samples must be >= 2, got {}",
                    self.min_reference_samples
                ),
            });
        }

        if !(0.0..1.0).contains(&self.frequency_tolerance) {
            return Err(CorrectionError::InvalidConfig {
                reason: format!(
                    "frequency_tolerance must be in [0, 1), got {}",
                    self.frequency_tolerance
                ),
            });
        }

        if !self.max_reference_length_ratio.is_finite() || self.max_reference_length_ratio < 1.0 {
            return Err(CorrectionError::InvalidConfig {
                reason: format!(
                    "max_reference_length_ratio must be finite and >= 1, got {}",
                    self.max_reference_length_ratio
                ),
            });
        }

        if let Seasonality::DayOfYearWindow { half_width } = self.seasonality {
            if half_width > MAX_WINDOW_HALF_WIDTH {
                return Err(CorrectionError::InvalidConfig {
                    reason: format!(
                        "day-of-year window half_width must be <= {MAX_WINDOW_HALF_WIDTH}, got {half_width}"
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
