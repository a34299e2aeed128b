use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level biascorr configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BiascorrConfig {
    /// Correction settings.
    #[serde(default)]
    pub correction: CorrectionToml,

    /// Result file settings.
    #[serde(default)]
    pub output: OutputToml,
}

impl BiascorrConfig {
    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionToml {
    #[serde(default = "default_method")]
    pub method: String,
    /// Overrides the kind declared in the cell file.
    #[serde(default)]
    pub variable_kind: Option<String>,
    #[serde(default = "default_wet_day_threshold")]
    pub wet_day_threshold: f64,
    #[serde(default = "default_min_reference_samples")]
    pub min_reference_samples: usize,
    #[serde(default = "default_extrapolation")]
    pub extrapolation: String,
    #[serde(default = "default_frequency_tolerance")]
    pub frequency_tolerance: f64,
    #[serde(default = "default_max_reference_length_ratio")]
    pub max_reference_length_ratio: f64,
    #[serde(default = "default_seasonality")]
    pub seasonality: String,
    /// Half-width in days for `seasonality = "day_of_year"`.
    #[serde(default = "default_window_half_width")]
    pub window_half_width: u16,
    #[serde(default = "default_estimator")]
    pub estimator: String,
    #[serde(default = "default_trend_model")]
    pub trend_model: String,
}

impl Default for CorrectionToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            variable_kind: None,
            wet_day_threshold: default_wet_day_threshold(),
            min_reference_samples: default_min_reference_samples(),
            extrapolation: default_extrapolation(),
            frequency_tolerance: default_frequency_tolerance(),
            max_reference_length_ratio: default_max_reference_length_ratio(),
            seasonality: default_seasonality(),
            window_half_width: default_window_half_width(),
            estimator: default_estimator(),
            trend_model: default_trend_model(),
        }
    }
}

fn default_method() -> String {
    "qm".to_string()
}
fn default_wet_day_threshold() -> f64 {
    0.1
}
fn default_min_reference_samples() -> usize {
    30
}
fn default_extrapolation() -> String {
    "clamp_to_domain".to_string()
}
fn default_frequency_tolerance() -> f64 {
    0.01
}
fn default_max_reference_length_ratio() -> f64 {
    2.0
}
fn default_seasonality() -> String {
    "whole".to_string()
}
fn default_window_half_width() -> u16 {
    15
}
fn default_estimator() -> String {
    "interpolated".to_string()
}
fn default_trend_model() -> String {
    "mean".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default = "default_true")]
    pub diagnostics: bool,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            pretty: true,
            diagnostics: true,
            time_format: default_time_format(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_time_format() -> String {
    "%Y-%m-%dT%H:%M:%S".to_string()
}
