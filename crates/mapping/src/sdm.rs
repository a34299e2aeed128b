//! Scaled distribution mapping.
//!
//! Like quantile mapping, but the change signal of the simulation between
//! its reference and target periods is carried into the corrected series:
//! additively on detrended residuals for continuous variables and
//! multiplicatively on wet-day scale factors for zero-inflated ones.

use biascorr_ecdf::{ExtrapolationPolicy, ValueDomain};
use biascorr_stats::{LinearFit, finite_mean};

use crate::config::{CorrectionConfig, TrendModel};
use crate::context::{SeriesRole, VariableKind};
use crate::error::CorrectionError;
use crate::frequency::adapt_frequency;
use crate::qm::{map_value, reference_distribution, wet_values};
use crate::result::{GroupOutcome, TrendComponent};
use crate::season::{GroupLabel, GroupValues};

/// Central tendency of one series, evaluated per sample index.
#[derive(Debug, Clone, Copy)]
enum Centre {
    Constant(f64),
    Line(LinearFit),
}

impl Centre {
    fn fit(values: &[f64], model: TrendModel) -> Option<Self> {
        let mean = finite_mean(values)?;
        Some(match model {
            TrendModel::Mean => Self::Constant(mean),
            TrendModel::Linear => Self::Line(LinearFit::fit(values)),
        })
    }

    fn at(&self, t: usize) -> f64 {
        match self {
            Self::Constant(c) => *c,
            Self::Line(line) => line.at(t),
        }
    }

    fn residuals(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(t, &v)| v - self.at(t))
            .collect()
    }
}

/// Applies scaled distribution mapping to the target values of one group.
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
    let model = config.trend_model();

    let obs_centre = Centre::fit(&group.observed, model)
        .ok_or_else(|| no_values(SeriesRole::ObservedReference, label, min))?;
    let sim_centre = Centre::fit(&group.simulated, model)
        .ok_or_else(|| no_values(SeriesRole::SimulatedReference, label, min))?;

    let obs_res = reference_distribution(
        &obs_centre.residuals(&group.observed),
        min,
        SeriesRole::ObservedReference,
        label,
    )?;
    let sim_res = reference_distribution(
        &sim_centre.residuals(&group.simulated),
        min,
        SeriesRole::SimulatedReference,
        label,
    )?;

    // An all-missing target has nothing to correct.
    let Some(tgt_centre) = Centre::fit(&group.target, model) else {
        return Ok(GroupOutcome {
            values: group.target.clone(),
            n_extrapolated: 0,
            adaptation: None,
            trend: None,
        });
    };

    let obs_mean = finite_mean(&group.observed).unwrap_or(0.0);
    let sim_mean = finite_mean(&group.simulated).unwrap_or(0.0);
    let tgt_mean = finite_mean(&group.target).unwrap_or(0.0);
    let delta = tgt_mean - sim_mean;

    let mut n_extrapolated = 0;
    let mut values = Vec::with_capacity(group.target.len());
    for (t, &v) in group.target.iter().enumerate() {
        if !v.is_finite() {
            values.push(v);
            continue;
        }
        let residual = v - tgt_centre.at(t);
        let mapped = map_value(
            residual,
            &sim_res,
            &obs_res,
            &ValueDomain::UNBOUNDED,
            ExtrapolationPolicy::Unclamped,
            config.estimator(),
        )?;
        n_extrapolated += usize::from(mapped.extrapolated);

        let shifted = mapped.value + obs_mean + delta + (tgt_centre.at(t) - tgt_mean);
        values.push(config.extrapolation_policy().apply(shifted, domain));
    }

    Ok(GroupOutcome {
        values,
        n_extrapolated,
        adaptation: None,
        trend: Some(TrendComponent::Additive(delta)),
    })
}

fn map_zero_inflated(
    group: &GroupValues,
    domain: &ValueDomain,
    config: &CorrectionConfig,
) -> Result<GroupOutcome, CorrectionError> {
    let (min, label) = (config.min_reference_samples(), group.label);
    let threshold = config.wet_day_threshold();
    let adapted = adapt_frequency(
        &group.observed,
        &group.simulated,
        &group.target,
        threshold,
        config.frequency_tolerance(),
    );

    let obs_wet = wet_values(&adapted.observed, threshold);
    let sim_wet = wet_values(&adapted.simulated_reference, threshold);
    let tgt_wet = wet_values(&adapted.simulated_target, threshold);

    let sim_wet_mean = finite_mean(&sim_wet).filter(|m| *m > 0.0).ok_or_else(|| {
        CorrectionError::DegenerateDistribution {
            role: SeriesRole::SimulatedReference,
            group: label,
            reason: "zero wet-day mean".to_string(),
        }
    })?;
    let obs_wet_mean = finite_mean(&obs_wet).unwrap_or(0.0);

    let obs_scale = reference_distribution(
        &scale(&obs_wet, obs_wet_mean),
        min,
        SeriesRole::ObservedReference,
        label,
    )?;
    let sim_scale = reference_distribution(
        &scale(&sim_wet, sim_wet_mean),
        min,
        SeriesRole::SimulatedReference,
        label,
    )?;
    let floor = obs_scale.min() * obs_wet_mean;

    // With no wet target day every finite value becomes 0.
    let tgt_wet_mean = finite_mean(&tgt_wet);
    let factor = tgt_wet_mean.map(|m| m / sim_wet_mean);

    let mut n_extrapolated = 0;
    let mut values = Vec::with_capacity(adapted.simulated_target.len());
    for &v in &adapted.simulated_target {
        if v.is_nan() {
            values.push(v);
            continue;
        }
        let (Some(tgt_mean), Some(factor)) = (tgt_wet_mean, factor) else {
            values.push(0.0);
            continue;
        };
        if v <= threshold {
            values.push(0.0);
            continue;
        }

        let mapped = map_value(
            v / tgt_mean,
            &sim_scale,
            &obs_scale,
            &ValueDomain::non_negative(),
            config.extrapolation_policy(),
            config.estimator(),
        )?;
        n_extrapolated += usize::from(mapped.extrapolated);

        let rescaled = (mapped.value * obs_wet_mean * factor).max(floor);
        values.push(config.extrapolation_policy().apply(rescaled, domain));
    }

    Ok(GroupOutcome {
        values,
        n_extrapolated,
        adaptation: adapted.report,
        trend: factor.map(TrendComponent::Multiplicative),
    })
}

fn scale(wet: &[f64], mean: f64) -> Vec<f64> {
    wet.iter().map(|v| v / mean).collect()
}

fn no_values(role: SeriesRole, group: GroupLabel, required: usize) -> CorrectionError {
    CorrectionError::InsufficientData {
        role,
        group,
        required,
        got: 0,
    }
}
