//! The three aligned series that make up one correction cell.

use std::fmt;

use biascorr_ecdf::ValueDomain;

use crate::config::CorrectionConfig;
use crate::error::CorrectionError;
use crate::season::GroupLabel;
use crate::series::TimeSeries;

/// Which of the three input series a value or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesRole {
    /// Observations over the reference period.
    ObservedReference,
    /// Model output over the reference period.
    SimulatedReference,
    /// Model output to be corrected.
    SimulatedTarget,
}

impl fmt::Display for SeriesRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ObservedReference => "observed_reference",
            Self::SimulatedReference => "simulated_reference",
            Self::SimulatedTarget => "simulated_target",
        };
        f.write_str(s)
    }
}

/// Statistical character of the corrected variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    /// Continuous variable such as temperature.
    #[default]
    Continuous,
    /// Variable with a point mass at zero such as precipitation.
    ZeroInflated,
}

/// Input for correcting one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionContext {
    observed_reference: TimeSeries,
    simulated_reference: TimeSeries,
    simulated_target: TimeSeries,
    kind: VariableKind,
    domain: ValueDomain,
}

impl CorrectionContext {
    /// Bundles the three series with the variable description.
    ///
    /// Alignment is checked by [`CorrectionContext::validate`], which the
    /// correction entry points call.
    pub fn new(
        observed_reference: TimeSeries,
        simulated_reference: TimeSeries,
        simulated_target: TimeSeries,
        kind: VariableKind,
        domain: ValueDomain,
    ) -> Self {
        Self {
            observed_reference,
            simulated_reference,
            simulated_target,
            kind,
            domain,
        }
    }

    /// Observations over the reference period.
    pub fn observed_reference(&self) -> &TimeSeries {
        &self.observed_reference
    }

    /// Model output over the reference period.
    pub fn simulated_reference(&self) -> &TimeSeries {
        &self.simulated_reference
    }

    /// Model output to be corrected.
    pub fn simulated_target(&self) -> &TimeSeries {
        &self.simulated_target
    }

    /// Returns the series playing `role`.
    pub fn series(&self, role: SeriesRole) -> &TimeSeries {
        match role {
            SeriesRole::ObservedReference => &self.observed_reference,
            SeriesRole::SimulatedReference => &self.simulated_reference,
            SeriesRole::SimulatedTarget => &self.simulated_target,
        }
    }

    /// Statistical character of the variable.
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Physical bounds of the variable.
    pub fn domain(&self) -> &ValueDomain {
        &self.domain
    }

    /// Checks that the context can be corrected under `config`.
    ///
    /// The three series must share a sampling step, the two references
    /// must not differ in length by more than
    /// `max_reference_length_ratio`, and each reference must hold at least
    /// `min_reference_samples` finite values. The target may have any
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::MisalignedSeries`] or
    /// [`CorrectionError::InsufficientData`].
    pub fn validate(&self, config: &CorrectionConfig) -> Result<(), CorrectionError> {
        let roles = [
            SeriesRole::ObservedReference,
            SeriesRole::SimulatedReference,
            SeriesRole::SimulatedTarget,
        ];

        let mut steps = roles
            .iter()
            .filter_map(|&role| self.series(role).step().map(|s| (role, s)));
        if let Some((first_role, first_step)) = steps.next() {
            for (role, step) in steps {
                if step != first_step {
                    return Err(CorrectionError::MisalignedSeries {
                        reason: format!(
                            "{role} has a step of {}s, {first_role} has {}s",
                            step.num_seconds(),
                            first_step.num_seconds()
                        ),
                    });
                }
            }
        }

        for role in [SeriesRole::ObservedReference, SeriesRole::SimulatedReference] {
            let got = self.series(role).n_finite();
            if got < config.min_reference_samples() {
                return Err(CorrectionError::InsufficientData {
                    role,
                    group: GroupLabel::Whole,
                    required: config.min_reference_samples(),
                    got,
                });
            }
        }

        let n_obs = self.observed_reference.len() as f64;
        let n_sim = self.simulated_reference.len() as f64;
        let ratio = n_obs.max(n_sim) / n_obs.min(n_sim);
        if ratio > config.max_reference_length_ratio() {
            return Err(CorrectionError::MisalignedSeries {
                reason: format!(
                    "reference lengths {} and {} differ by a factor of {ratio:.2} (max {})",
                    self.observed_reference.len(),
                    self.simulated_reference.len(),
                    config.max_reference_length_ratio()
                ),
            });
        }

        Ok(())
    }
}
