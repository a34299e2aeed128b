//! Empirical distributions for distribution-mapping bias correction.
//!
//! An [`EmpiricalDistribution`] is a sorted copy of a sample's finite values
//! with Weibull plotting positions `rank / (n + 1)`. Two lookups are
//! provided and they treat the tails differently:
//!
//! - [`EmpiricalDistribution::cumulative_probability`] interpolates in
//!   value space and **saturates** to 0 or 1 outside the sample range;
//! - [`EmpiricalDistribution::invert`] interpolates in probability space and
//!   **extrapolates** beyond the first/last position with the slope of the
//!   two nearest points, clamped to a [`ValueDomain`] under
//!   [`ExtrapolationPolicy::ClampToDomain`].
//!
//! # Quick Start
//!
//! ```
//! use biascorr_ecdf::{EmpiricalDistribution, ExtrapolationPolicy, ValueDomain};
//!
//! let obs = EmpiricalDistribution::build(&[1.0, 2.0, 3.0, 4.0, 5.0], 5).unwrap();
//! let p = obs.cumulative_probability(3.0);
//! let back = obs
//!     .invert(p, &ValueDomain::unbounded(), ExtrapolationPolicy::ClampToDomain)
//!     .unwrap();
//! assert_eq!(back.value, 3.0);
//! ```

mod distribution;
mod domain;
mod error;

pub use distribution::{EmpiricalDistribution, Inverted};
pub use domain::{ExtrapolationPolicy, ValueDomain};
pub use error::EcdfError;
