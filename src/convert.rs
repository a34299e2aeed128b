//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use biascorr_io::WriterConfig;
use biascorr_mapping::{
    CorrectionConfig, ExtrapolationPolicy, Method, QuantileEstimator, Seasonality, TrendModel,
    VariableKind,
};

use crate::cli::MethodArg;
use crate::config::{CorrectionToml, OutputToml};

/// Parses a method name: `qm`/`quantile_mapping` or
/// `sdm`/`scaled_distribution_mapping`.
pub fn parse_method(s: &str) -> Result<Method> {
    match s.to_lowercase().as_str() {
        "qm" | "quantile_mapping" => Ok(Method::QuantileMapping),
        "sdm" | "scaled_distribution_mapping" => Ok(Method::ScaledDistributionMapping),
        other => bail!("unknown method: {other:?}"),
    }
}

pub fn method_from_arg(arg: MethodArg) -> Method {
    match arg {
        MethodArg::Qm => Method::QuantileMapping,
        MethodArg::Sdm => Method::ScaledDistributionMapping,
    }
}

pub fn parse_variable_kind(s: &str) -> Result<VariableKind> {
    match s.to_lowercase().as_str() {
        "continuous" => Ok(VariableKind::Continuous),
        "zero_inflated" => Ok(VariableKind::ZeroInflated),
        other => bail!("unknown variable kind: {other:?}"),
    }
}

pub fn parse_extrapolation(s: &str) -> Result<ExtrapolationPolicy> {
    match s.to_lowercase().as_str() {
        "clamp_to_domain" => Ok(ExtrapolationPolicy::ClampToDomain),
        "unclamped" => Ok(ExtrapolationPolicy::Unclamped),
        other => bail!("unknown extrapolation policy: {other:?}"),
    }
}

/// Parses a seasonality name; `half_width` is only used by `day_of_year`.
pub fn parse_seasonality(s: &str, half_width: u16) -> Result<Seasonality> {
    match s.to_lowercase().as_str() {
        "whole" => Ok(Seasonality::Whole),
        "monthly" => Ok(Seasonality::Monthly),
        "day_of_year" => Ok(Seasonality::DayOfYearWindow { half_width }),
        other => bail!("unknown seasonality: {other:?}"),
    }
}

pub fn parse_estimator(s: &str) -> Result<QuantileEstimator> {
    match s.to_lowercase().as_str() {
        "interpolated" => Ok(QuantileEstimator::Interpolated),
        "ecdf_percentile" => Ok(QuantileEstimator::EcdfPercentile),
        other => bail!("unknown quantile estimator: {other:?}"),
    }
}

pub fn parse_trend_model(s: &str) -> Result<TrendModel> {
    match s.to_lowercase().as_str() {
        "mean" => Ok(TrendModel::Mean),
        "linear" => Ok(TrendModel::Linear),
        other => bail!("unknown trend model: {other:?}"),
    }
}

/// Builds and validates a [`CorrectionConfig`] from the TOML correction
/// section.
pub fn build_correction_config(c: &CorrectionToml) -> Result<CorrectionConfig> {
    let cfg = CorrectionConfig::new()
        .with_method(parse_method(&c.method)?)
        .with_wet_day_threshold(c.wet_day_threshold)
        .with_min_reference_samples(c.min_reference_samples)
        .with_extrapolation_policy(parse_extrapolation(&c.extrapolation)?)
        .with_frequency_tolerance(c.frequency_tolerance)
        .with_max_reference_length_ratio(c.max_reference_length_ratio)
        .with_seasonality(parse_seasonality(&c.seasonality, c.window_half_width)?)
        .with_estimator(parse_estimator(&c.estimator)?)
        .with_trend_model(parse_trend_model(&c.trend_model)?);
    cfg.validate().context("invalid [correction] section")?;
    Ok(cfg)
}

/// Builds the variable-kind override, if the config sets one.
pub fn build_kind_override(c: &CorrectionToml) -> Result<Option<VariableKind>> {
    c.variable_kind.as_deref().map(parse_variable_kind).transpose()
}

/// Builds and validates a [`WriterConfig`] from the TOML output section.
pub fn build_writer_config(o: &OutputToml) -> Result<WriterConfig> {
    let cfg = WriterConfig::default()
        .with_pretty(o.pretty)
        .with_diagnostics(o.diagnostics)
        .with_time_format(&o.time_format);
    cfg.validate().context("invalid [output] section")?;
    Ok(cfg)
}
