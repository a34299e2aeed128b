//! Physical value bounds and the tail extrapolation policy.

use crate::error::EcdfError;

/// Valid range of a physical quantity.
///
/// Either bound may be absent. Precipitation and radiation use
/// [`ValueDomain::non_negative`]; temperature is usually unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueDomain {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl ValueDomain {
    /// A domain with no bounds.
    pub const UNBOUNDED: Self = Self {
        lower: None,
        upper: None,
    };

    /// A domain with no bounds.
    pub fn unbounded() -> Self {
        Self::UNBOUNDED
    }

    /// The domain `[0, +inf)`.
    pub fn non_negative() -> Self {
        Self {
            lower: Some(0.0),
            upper: None,
        }
    }

    /// Creates a domain from optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EcdfError::InvalidDomain`] if a bound is NaN or infinite, or
    /// if `lower > upper`.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Result<Self, EcdfError> {
        let lo = lower.unwrap_or(f64::NEG_INFINITY);
        let hi = upper.unwrap_or(f64::INFINITY);
        let bad_bound =
            lower.is_some_and(|v| !v.is_finite()) || upper.is_some_and(|v| !v.is_finite());
        if bad_bound || lo > hi {
            return Err(EcdfError::InvalidDomain {
                lower: lo,
                upper: hi,
            });
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound, if any.
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Upper bound, if any.
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Returns `true` if `v` lies within the bounds. NaN is never contained.
    pub fn contains(&self, v: f64) -> bool {
        !v.is_nan()
            && self.lower.is_none_or(|lo| v >= lo)
            && self.upper.is_none_or(|hi| v <= hi)
    }

    /// Clamps `v` into the domain. NaN passes through.
    pub fn clamp(&self, v: f64) -> f64 {
        let mut out = v;
        if let Some(lo) = self.lower {
            if out < lo {
                out = lo;
            }
        }
        if let Some(hi) = self.upper {
            if out > hi {
                out = hi;
            }
        }
        out
    }
}

/// What to do with values extrapolated beyond the empirical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrapolationPolicy {
    /// Clamp results into the [`ValueDomain`].
    #[default]
    ClampToDomain,
    /// Return the raw linear extrapolation.
    Unclamped,
}

impl ExtrapolationPolicy {
    /// Applies the policy to `v`.
    pub fn apply(self, v: f64, domain: &ValueDomain) -> f64 {
        match self {
            Self::ClampToDomain => domain.clamp(v),
            Self::Unclamped => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_contains_everything_finite() {
        let d = ValueDomain::unbounded();
        assert!(d.contains(-1e300));
        assert!(d.contains(1e300));
        assert!(!d.contains(f64::NAN));
        assert_eq!(d.clamp(-5.0), -5.0);
    }

    #[test]
    fn non_negative_clamps_below_zero() {
        let d = ValueDomain::non_negative();
        assert_eq!(d.clamp(-0.3), 0.0);
        assert_eq!(d.clamp(2.5), 2.5);
        assert!(!d.contains(-0.1));
    }

    #[test]
    fn bounded_domain() {
        let d = ValueDomain::new(Some(0.0), Some(100.0)).unwrap();
        assert_eq!(d.clamp(120.0), 100.0);
        assert_eq!(d.clamp(-1.0), 0.0);
        assert!(d.clamp(f64::NAN).is_nan());
    }

    #[test]
    fn crossed_bounds_rejected() {
        assert!(matches!(
            ValueDomain::new(Some(5.0), Some(1.0)),
            Err(EcdfError::InvalidDomain { .. })
        ));
        assert!(ValueDomain::new(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn policy_unclamped_is_identity() {
        let d = ValueDomain::non_negative();
        assert_eq!(ExtrapolationPolicy::Unclamped.apply(-2.0, &d), -2.0);
        assert_eq!(ExtrapolationPolicy::ClampToDomain.apply(-2.0, &d), 0.0);
    }
}
