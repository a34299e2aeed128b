//! Sorted-sample empirical distribution.

use crate::domain::{ExtrapolationPolicy, ValueDomain};
use crate::error::EcdfError;

/// Relative width below which a sample is treated as constant.
const DEGENERATE_REL_TOL: f64 = 1e-12;

/// Smallest sample an interpolating distribution can be built from.
const MIN_POINTS: usize = 2;

/// Outcome of [`EmpiricalDistribution::invert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverted {
    /// The quantile value after the extrapolation policy was applied.
    pub value: f64,
    /// `true` if `p` fell outside the first/last empirical position.
    pub extrapolated: bool,
}

/// Empirical distribution of a finite sample.
///
/// Holds the finite values sorted ascending together with their Weibull
/// plotting positions `i / (n + 1)` for ranks `i = 1..=n`. The positions
/// never reach 0 or 1, so every stored point has a well-defined quantile.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalDistribution {
    values: Vec<f64>,
    positions: Vec<f64>,
}

impl EmpiricalDistribution {
    /// Builds a distribution from the finite values in `data`.
    ///
    /// NaN and infinite values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EcdfError::InsufficientData`] if fewer than
    /// `max(min_samples, 2)` finite values are present.
    pub fn build(data: &[f64], min_samples: usize) -> Result<Self, EcdfError> {
        let mut values = biascorr_stats::finite_values(data);
        let required = min_samples.max(MIN_POINTS);
        if values.len() < required {
            return Err(EcdfError::InsufficientData {
                required,
                got: values.len(),
            });
        }

        values.sort_by(f64::total_cmp);

        let denom = (values.len() + 1) as f64;
        let positions = (1..=values.len()).map(|i| i as f64 / denom).collect();

        Ok(Self { values, positions })
    }

    /// Number of values in the sample.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a built distribution holds at least two values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cumulative probability of each sorted value.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Smallest sample value.
    pub fn min(&self) -> f64 {
        self.values[0]
    }

    /// Largest sample value.
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Returns `true` if all values are (numerically) identical, in which
    /// case ranks carry no information.
    pub fn is_degenerate(&self) -> bool {
        let (lo, hi) = (self.min(), self.max());
        let scale = lo.abs().max(hi.abs()).max(1.0);
        hi - lo <= DEGENERATE_REL_TOL * scale
    }

    /// Cumulative probability of `v`, interpolated linearly in value space.
    ///
    /// Values below the sample minimum map to 0 and values above the
    /// maximum to 1. A value equal to a run of tied sample values maps to
    /// the mean position of that run. NaN maps to NaN.
    pub fn cumulative_probability(&self, v: f64) -> f64 {
        if v.is_nan() {
            return f64::NAN;
        }
        if v < self.min() {
            return 0.0;
        }
        if v > self.max() {
            return 1.0;
        }

        let lo = self.values.partition_point(|&x| x < v);
        let hi = self.values.partition_point(|&x| x <= v);

        if hi > lo {
            // Mean of positions lo+1..=hi over (n+1).
            let mean_rank = (lo + 1 + hi) as f64 / 2.0;
            return mean_rank / (self.values.len() + 1) as f64;
        }

        // values[lo - 1] < v < values[lo]
        let (x0, x1) = (self.values[lo - 1], self.values[lo]);
        let (p0, p1) = (self.positions[lo - 1], self.positions[lo]);
        p0 + (v - x0) * (p1 - p0) / (x1 - x0)
    }

    /// Value at cumulative probability `p`.
    ///
    /// Inside the empirical positions the result is a linear interpolation
    /// between the bracketing sample points. Outside them the line through
    /// the two nearest points is extended, and `policy` decides whether the
    /// result is clamped into `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`EcdfError::InvalidProbability`] if `p` is NaN or outside
    /// `[0, 1]`.
    pub fn invert(
        &self,
        p: f64,
        domain: &ValueDomain,
        policy: ExtrapolationPolicy,
    ) -> Result<Inverted, EcdfError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(EcdfError::InvalidProbability { p });
        }

        let n = self.values.len();
        let (raw, extrapolated) = if p < self.positions[0] {
            (self.line_through(0, 1, p), true)
        } else if p > self.positions[n - 1] {
            (self.line_through(n - 2, n - 1, p), true)
        } else {
            let k = self.positions.partition_point(|&q| q < p);
            if self.positions[k] == p {
                (self.values[k], false)
            } else {
                (self.line_through(k - 1, k, p), false)
            }
        };

        Ok(Inverted {
            value: policy.apply(raw, domain),
            extrapolated,
        })
    }

    /// Step ECDF: the fraction of sample values `<= v`. NaN maps to NaN.
    pub fn ecdf(&self, v: f64) -> f64 {
        if v.is_nan() {
            return f64::NAN;
        }
        self.values.partition_point(|&x| x <= v) as f64 / self.values.len() as f64
    }

    /// R type-7 percentile of the sample at probability `p`.
    ///
    /// # Errors
    ///
    /// Returns [`EcdfError::InvalidProbability`] if `p` is NaN or outside
    /// `[0, 1]`.
    pub fn percentile(&self, p: f64) -> Result<f64, EcdfError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(EcdfError::InvalidProbability { p });
        }
        Ok(biascorr_stats::quantile_type7(&self.values, p))
    }

    /// Evaluates the line through sample points `a` and `b` at probability `p`.
    fn line_through(&self, a: usize, b: usize, p: f64) -> f64 {
        let (x0, x1) = (self.values[a], self.values[b]);
        let (p0, p1) = (self.positions[a], self.positions[b]);
        x0 + (p - p0) * (x1 - x0) / (p1 - p0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dist(values: &[f64]) -> EmpiricalDistribution {
        EmpiricalDistribution::build(values, 2).unwrap()
    }

    const OPEN: ValueDomain = ValueDomain::UNBOUNDED;

    #[test]
    fn build_sorts_and_assigns_weibull_positions() {
        let d = dist(&[3.0, 1.0, 2.0]);
        assert_eq!(d.values(), &[1.0, 2.0, 3.0]);
        assert_relative_eq!(d.positions()[0], 0.25);
        assert_relative_eq!(d.positions()[1], 0.5);
        assert_relative_eq!(d.positions()[2], 0.75);
    }

    #[test]
    fn build_ignores_missing_values() {
        let d = dist(&[f64::NAN, 4.0, f64::INFINITY, 1.0]);
        assert_eq!(d.len(), 2);
        assert_eq!(d.min(), 1.0);
        assert_eq!(d.max(), 4.0);
    }

    #[test]
    fn build_rejects_short_sample() {
        let err = EmpiricalDistribution::build(&[1.0, 2.0, f64::NAN], 5).unwrap_err();
        assert_eq!(
            err,
            EcdfError::InsufficientData {
                required: 5,
                got: 2
            }
        );
    }

    #[test]
    fn build_needs_two_points_even_with_zero_minimum() {
        assert!(matches!(
            EmpiricalDistribution::build(&[1.0], 0),
            Err(EcdfError::InsufficientData { required: 2, got: 1 })
        ));
    }

    #[test]
    fn degenerate_detection() {
        assert!(dist(&[5.0, 5.0, 5.0, 5.0, 5.0]).is_degenerate());
        assert!(!dist(&[5.0, 5.0, 5.0, 5.0, 5.1]).is_degenerate());
    }

    #[test]
    fn cumulative_probability_interpolates() {
        let d = dist(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        // positions 1/6..5/6; 5.0 lies halfway between 4 (2/6) and 6 (3/6)
        assert_relative_eq!(d.cumulative_probability(5.0), 2.5 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(d.cumulative_probability(6.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_probability_saturates() {
        let d = dist(&[2.0, 4.0, 6.0]);
        assert_eq!(d.cumulative_probability(1.0), 0.0);
        assert_eq!(d.cumulative_probability(100.0), 1.0);
        assert!(d.cumulative_probability(f64::NAN).is_nan());
    }

    #[test]
    fn cumulative_probability_of_tie_is_mean_position() {
        let d = dist(&[0.0, 0.0, 0.0, 1.0, 2.0]);
        // ranks 1..=3 tied at 0 → mean rank 2 → 2/6
        assert_relative_eq!(d.cumulative_probability(0.0), 2.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn invert_interpolates_between_points() {
        let d = dist(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let inv = d.invert(0.6, &OPEN, ExtrapolationPolicy::ClampToDomain).unwrap();
        // between 3 (0.5) and 4 (0.6667)
        assert_relative_eq!(inv.value, 3.6, epsilon = 1e-12);
        assert!(!inv.extrapolated);
    }

    #[test]
    fn invert_extrapolates_tails() {
        let d = dist(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let lo = d.invert(0.0, &OPEN, ExtrapolationPolicy::Unclamped).unwrap();
        let hi = d.invert(1.0, &OPEN, ExtrapolationPolicy::Unclamped).unwrap();
        // slope is 6 per unit probability
        assert_relative_eq!(lo.value, 0.0, epsilon = 1e-12);
        assert_relative_eq!(hi.value, 6.0, epsilon = 1e-12);
        assert!(lo.extrapolated && hi.extrapolated);
    }

    #[test]
    fn invert_clamps_to_domain() {
        let d = dist(&[0.5, 3.0, 3.5, 4.0]);
        let clamped = d
            .invert(0.0, &ValueDomain::non_negative(), ExtrapolationPolicy::ClampToDomain)
            .unwrap();
        let raw = d
            .invert(0.0, &ValueDomain::non_negative(), ExtrapolationPolicy::Unclamped)
            .unwrap();
        assert!(raw.value < 0.0);
        assert_eq!(clamped.value, 0.0);
    }

    #[test]
    fn invert_rejects_bad_probability() {
        let d = dist(&[1.0, 2.0]);
        for p in [-0.1, 1.1, f64::NAN] {
            assert!(matches!(
                d.invert(p, &OPEN, ExtrapolationPolicy::Unclamped),
                Err(EcdfError::InvalidProbability { .. })
            ));
        }
    }

    #[test]
    fn ecdf_and_percentile() {
        let sim = dist(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        let obs = dist(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let p = sim.ecdf(6.0);
        assert_relative_eq!(p, 0.6, epsilon = 1e-12);
        assert_relative_eq!(obs.percentile(p).unwrap(), 3.4, epsilon = 1e-12);
    }
}
