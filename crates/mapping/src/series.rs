//! Time series of one variable at one spatial cell.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::CorrectionError;

/// Ordered `(timestamp, value)` pairs for one variable at one location.
///
/// Timestamps are strictly increasing. `NaN` values mark missing data and
/// pass through corrections unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    times: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a series from parallel timestamp and value vectors.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::InvalidSeries`] if the lengths differ or
    /// the timestamps are not strictly increasing.
    pub fn new(times: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, CorrectionError> {
        if times.len() != values.len() {
            return Err(CorrectionError::InvalidSeries {
                reason: format!(
                    "{} timestamps but {} values",
                    times.len(),
                    values.len()
                ),
            });
        }

        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CorrectionError::InvalidSeries {
                reason: format!(
                    "timestamps must be strictly increasing: {} at index {} is followed by {}",
                    times[i],
                    i,
                    times[i + 1]
                ),
            });
        }

        Ok(Self { times, values })
    }

    /// Creates a daily series starting at midnight of `start`.
    pub fn daily(start: NaiveDate, values: Vec<f64>) -> Self {
        let t0 = start.and_time(chrono::NaiveTime::MIN);
        let times = (0..values.len())
            .map(|i| t0 + TimeDelta::days(i as i64))
            .collect();
        Self { times, values }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamps, strictly increasing.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Values aligned with [`TimeSeries::times`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of finite values.
    pub fn n_finite(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Smallest spacing between consecutive timestamps, used as the
    /// sampling step. `None` for fewer than two samples.
    ///
    /// Using the minimum keeps calendar-month series comparable: every
    /// multi-year monthly series has a 28-day minimum step.
    pub fn step(&self) -> Option<TimeDelta> {
        self.times.windows(2).map(|w| w[1] - w[0]).min()
    }

    /// Returns a series on the same timestamps with new values.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::InvalidSeries`] if `values` has a
    /// different length.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, CorrectionError> {
        if values.len() != self.times.len() {
            return Err(CorrectionError::InvalidSeries {
                reason: format!(
                    "replacement has {} values, series has {} timestamps",
                    values.len(),
                    self.times.len()
                ),
            });
        }
        Ok(Self {
            times: self.times.clone(),
            values,
        })
    }
}
