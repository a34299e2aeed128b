//! Result types for bias correction.

use crate::config::Method;
use crate::context::VariableKind;
use crate::frequency::FrequencyAdaptation;
use crate::season::GroupLabel;
use crate::series::TimeSeries;

/// Change signal carried from the simulated reference to the target by
/// scaled distribution mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendComponent {
    /// `mean(target) - mean(simulated_reference)`, added to the mapped
    /// residuals (continuous variables).
    Additive(f64),
    /// `mean_wet(target) / mean_wet(simulated_reference)`, multiplied onto
    /// the mapped scale factors (zero-inflated variables).
    Multiplicative(f64),
}

/// Diagnostics from one correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    method: Method,
    kind: VariableKind,
    n_groups: usize,
    n_extrapolated: usize,
    frequency_adaptations: Vec<(GroupLabel, FrequencyAdaptation)>,
    trends: Vec<(GroupLabel, TrendComponent)>,
}

impl Diagnostics {
    /// Method used.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Variable kind corrected.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Number of seasonal groups corrected.
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    /// Number of target values whose quantile fell outside the empirical
    /// range of the observed reference.
    pub fn n_extrapolated(&self) -> usize {
        self.n_extrapolated
    }

    /// Frequency adaptations, one per group where the dry fractions were
    /// reconciled.
    pub fn frequency_adaptations(&self) -> &[(GroupLabel, FrequencyAdaptation)] {
        &self.frequency_adaptations
    }

    /// Returns `true` if any group had its wet-day frequency adapted.
    pub fn frequency_adapted(&self) -> bool {
        !self.frequency_adaptations.is_empty()
    }

    /// Trend components injected per group (scaled distribution mapping
    /// only).
    pub fn trends(&self) -> &[(GroupLabel, TrendComponent)] {
        &self.trends
    }
}

/// Corrected series plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionResult {
    corrected: TimeSeries,
    diagnostics: Diagnostics,
}

impl CorrectionResult {
    pub(crate) fn new(corrected: TimeSeries, method: Method, kind: VariableKind) -> Self {
        Self {
            corrected,
            diagnostics: Diagnostics {
                method,
                kind,
                n_groups: 0,
                n_extrapolated: 0,
                frequency_adaptations: Vec::new(),
                trends: Vec::new(),
            },
        }
    }

    pub(crate) fn record(&mut self, label: GroupLabel, outcome: &GroupOutcome) {
        let d = &mut self.diagnostics;
        d.n_groups += 1;
        d.n_extrapolated += outcome.n_extrapolated;
        if let Some(adaptation) = outcome.adaptation {
            d.frequency_adaptations.push((label, adaptation));
        }
        if let Some(trend) = outcome.trend {
            d.trends.push((label, trend));
        }
    }

    /// Corrected values on the target timestamps.
    pub fn corrected(&self) -> &TimeSeries {
        &self.corrected
    }

    /// Diagnostics from the run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Output of one method kernel for one seasonal group.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupOutcome {
    /// Corrected values, aligned with the group's target indices.
    pub(crate) values: Vec<f64>,
    pub(crate) n_extrapolated: usize,
    pub(crate) adaptation: Option<FrequencyAdaptation>,
    pub(crate) trend: Option<TrendComponent>,
}
