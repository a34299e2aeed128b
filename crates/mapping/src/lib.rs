//! Empirical bias correction of simulated climate series.
//!
//! Corrects a simulated target series against an observed reference,
//! using the simulated reference to learn the model bias. Two methods are
//! provided:
//!
//! - **Quantile mapping** replaces each target value by the observed value
//!   at the same cumulative probability in the simulated reference.
//! - **Scaled distribution mapping** maps detrended residuals (continuous
//!   variables) or wet-day scale factors (zero-inflated variables) and
//!   re-injects the simulated change between reference and target.
//!
//! # Pipeline
//!
//! 1. **Validate** the configuration and the three series (sampling step,
//!    reference lengths, sample counts)
//! 2. **Stratify** into seasonal groups ([`Seasonality`])
//! 3. **Adapt** wet-day frequencies (zero-inflated variables only)
//! 4. **Map** each group with the chosen [`Method`]
//! 5. **Scatter** the corrected values back onto the target timestamps
//!
//! Missing values (`NaN`) pass through unchanged. Cells are independent;
//! [`correct_batch`] corrects many of them on the rayon thread pool.
//!
//! # Quick Start
//!
//! ```
//! use biascorr_mapping::{
//!     CorrectionConfig, CorrectionContext, TimeSeries, ValueDomain, VariableKind, correct_qm,
//! };
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
//! let ctx = CorrectionContext::new(
//!     TimeSeries::daily(start, vec![1.0, 2.0, 3.0, 4.0, 5.0]),
//!     TimeSeries::daily(start, vec![2.0, 4.0, 6.0, 8.0, 10.0]),
//!     TimeSeries::daily(start, vec![6.0]),
//!     VariableKind::Continuous,
//!     ValueDomain::unbounded(),
//! );
//! let config = CorrectionConfig::new().with_min_reference_samples(5);
//!
//! let result = correct_qm(&ctx, &config).unwrap();
//! assert!((result.corrected().values()[0] - 3.0).abs() < 1e-12);
//! ```

mod batch;
mod config;
mod context;
mod error;
pub mod frequency;
mod qm;
mod result;
mod sdm;
mod season;
mod series;

pub use batch::{BatchReport, CellOutcome, correct_batch, correct_batch_cancellable};
pub use config::{
    CorrectionConfig, MAX_WINDOW_HALF_WIDTH, Method, QuantileEstimator, Seasonality, TrendModel,
};
pub use context::{CorrectionContext, SeriesRole, VariableKind};
pub use error::CorrectionError;
pub use frequency::{DriedSide, FrequencyAdaptation};
pub use result::{CorrectionResult, Diagnostics, TrendComponent};
pub use season::GroupLabel;
pub use series::TimeSeries;

// Re-export the distribution layer used in the public API.
pub use biascorr_ecdf::{EcdfError, EmpiricalDistribution, ExtrapolationPolicy, ValueDomain};

use tracing::debug;

/// Corrects the simulated target of `context` with the method in `config`.
///
/// # Errors
///
/// Returns [`CorrectionError`] if the configuration or the context is
/// invalid, or if a seasonal group has too few or degenerate reference
/// values.
#[tracing::instrument(
    skip_all,
    fields(
        method = config.method().name(),
        kind = ?context.kind(),
        n_target = context.simulated_target().len()
    )
)]
pub fn correct(
    context: &CorrectionContext,
    config: &CorrectionConfig,
) -> Result<CorrectionResult, CorrectionError> {
    config.validate()?;
    context.validate(config)?;

    let groups = season::stratify(context, config.seasonality());
    let mut output = context.simulated_target().values().to_vec();
    let mut outcomes = Vec::with_capacity(groups.len());

    for group in &groups {
        let values = group.values(context);
        let outcome = match config.method() {
            Method::QuantileMapping => {
                qm::map_group(&values, context.kind(), context.domain(), config)?
            }
            Method::ScaledDistributionMapping => {
                sdm::map_group(&values, context.kind(), context.domain(), config)?
            }
        };

        for (&i, &v) in group.target.iter().zip(&outcome.values) {
            output[i] = v;
        }
        debug!(
            group = %group.label,
            n_observed = group.observed.len(),
            n_target = group.target.len(),
            n_extrapolated = outcome.n_extrapolated,
            "group corrected"
        );
        outcomes.push((group.label, outcome));
    }

    let corrected = context.simulated_target().with_values(output)?;
    let mut result = CorrectionResult::new(corrected, config.method(), context.kind());
    for (label, outcome) in &outcomes {
        result.record(*label, outcome);
    }
    Ok(result)
}

/// Corrects `context` by quantile mapping, whatever method `config` names.
///
/// # Errors
///
/// See [`correct`].
pub fn correct_qm(
    context: &CorrectionContext,
    config: &CorrectionConfig,
) -> Result<CorrectionResult, CorrectionError> {
    correct(context, &config.clone().with_method(Method::QuantileMapping))
}

/// Corrects `context` by scaled distribution mapping, whatever method
/// `config` names.
///
/// # Errors
///
/// See [`correct`].
pub fn correct_sdm(
    context: &CorrectionContext,
    config: &CorrectionConfig,
) -> Result<CorrectionResult, CorrectionError> {
    correct(
        context,
        &config.clone().with_method(Method::ScaledDistributionMapping),
    )
}
