//! Empirical quantile mapping.
//!
//! Each target value is located in the simulated-reference distribution
//! and replaced by the observed-reference value at the same cumulative
//! probability. Zero-inflated variables are mapped on their wet days only,
//! after the dry-day frequencies have been reconciled.

use biascorr_ecdf::{EmpiricalDistribution, ExtrapolationPolicy, Inverted, ValueDomain};

use crate::config::{CorrectionConfig, QuantileEstimator};
use crate::context::{SeriesRole, VariableKind};
use crate::error::CorrectionError;
use crate::frequency::adapt_frequency;
use crate::result::GroupOutcome;
use crate::season::{GroupLabel, GroupValues};

/// Builds a distribution for `role`, rejecting samples without spread.
pub(crate) fn reference_distribution(
    values: &[f64],
    min_samples: usize,
    role: SeriesRole,
    group: GroupLabel,
) -> Result<EmpiricalDistribution, CorrectionError> {
    let dist = EmpiricalDistribution::build(values, min_samples)
        .map_err(|e| CorrectionError::from_build(e, role, group))?;
    if dist.is_degenerate() {
        return Err(CorrectionError::DegenerateDistribution {
            role,
            group,
            reason: format!("zero variance (all {} values equal {})", dist.len(), dist.min()),
        });
    }
    Ok(dist)
}

/// Maps one finite value from `sim` to `obs`.
pub(crate) fn map_value(
    v: f64,
    sim: &EmpiricalDistribution,
    obs: &EmpiricalDistribution,
    domain: &ValueDomain,
    policy: ExtrapolationPolicy,
    estimator: QuantileEstimator,
) -> Result<Inverted, CorrectionError> {
    match estimator {
        QuantileEstimator::Interpolated => {
            let p = sim.cumulative_probability(v);
            Ok(obs.invert(p, domain, policy)?)
        }
        QuantileEstimator::EcdfPercentile => {
            let p = sim.ecdf(v);
            Ok(Inverted {
                value: policy.apply(obs.percentile(p)?, domain),
                extrapolated: false,
            })
        }
    }
}

/// Quantile-maps the target values of one group.
pub(crate) fn map_group(
    group: &GroupValues,
    kind: VariableKind,
    domain: &ValueDomain,
    config: &CorrectionConfig,
) -> Result<GroupOutcome, CorrectionError> {
    match kind {
        VariableKind::Continuous => map_continuous(group, domain, config),
        VariableKind::ZeroInflated => map_zero_inflated(group, domain, config),
    }
}

fn map_continuous(
    group: &GroupValues,
    domain: &ValueDomain,
    config: &CorrectionConfig,
) -> Result<GroupOutcome, CorrectionError> {
    let (min, label) = (config.min_reference_samples(), group.label);
    let obs = reference_distribution(&group.observed, min, SeriesRole::ObservedReference, label)?;
    let sim = reference_distribution(&group.simulated, min, SeriesRole::SimulatedReference, label)?;

    let mut n_extrapolated = 0;
    let mut values = Vec::with_capacity(group.target.len());
    for &v in &group.target {
        if !v.is_finite() {
            values.push(v);
            continue;
        }
        let mapped = map_value(
            v,
            &sim,
            &obs,
            domain,
            config.extrapolation_policy(),
            config.estimator(),
        )?;
        n_extrapolated += usize::from(mapped.extrapolated);
        values.push(mapped.value);
    }

    Ok(GroupOutcome {
        values,
        n_extrapolated,
        adaptation: None,
        trend: None,
    })
}

fn map_zero_inflated(
    group: &GroupValues,
    domain: &ValueDomain,
    config: &CorrectionConfig,
) -> Result<GroupOutcome, CorrectionError> {
    let threshold = config.wet_day_threshold();
    let adapted = adapt_frequency(
        &group.observed,
        &group.simulated,
        &group.target,
        threshold,
        config.frequency_tolerance(),
    );

    let min = config.min_reference_samples();
    let obs = reference_distribution(
        &wet_values(&adapted.observed, threshold),
        min,
        SeriesRole::ObservedReference,
        group.label,
    )?;
    let sim = reference_distribution(
        &wet_values(&adapted.simulated_reference, threshold),
        min,
        SeriesRole::SimulatedReference,
        group.label,
    )?;
    let floor = obs.min();

    let mut n_extrapolated = 0;
    let mut values = Vec::with_capacity(adapted.simulated_target.len());
    for &v in &adapted.simulated_target {
        if v.is_nan() {
            values.push(v);
        } else if v <= threshold {
            values.push(0.0);
        } else {
            let mapped = map_value(
                v,
                &sim,
                &obs,
                domain,
                config.extrapolation_policy(),
                config.estimator(),
            )?;
            n_extrapolated += usize::from(mapped.extrapolated);
            values.push(mapped.value.max(floor));
        }
    }

    Ok(GroupOutcome {
        values,
        n_extrapolated,
        adaptation: adapted.report,
        trend: None,
    })
}

/// Finite values strictly above `threshold`.
pub(crate) fn wet_values(values: &[f64], threshold: f64) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > threshold)
        .collect()
}
