//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering every problem in a cell
//! file into a single [`IoError::Validation`], plus standalone checks on the
//! raw records.

use std::collections::HashSet;

use biascorr_mapping::{SeriesRole, ValueDomain};

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Appends every error recorded by `other`.
    pub(crate) fn merge(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `Ok(())` if nothing was recorded, otherwise one
    /// [`IoError::Validation`] whose details join all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Record checks
// ---------------------------------------------------------------------------

/// Check that cell identifiers are non-empty and unique.
pub(crate) fn validate_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let mut seen = HashSet::new();

    for (i, id) in ids.into_iter().enumerate() {
        if id.is_empty() {
            c.push(format!("cell {i} has an empty id"));
        } else if !seen.insert(id) {
            c.push(format!("duplicate cell id '{id}'"));
        }
    }

    c
}

/// Check that a series record has one value per timestamp.
pub(crate) fn validate_record_length(
    cell: &str,
    role: SeriesRole,
    time_len: usize,
    values_len: usize,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if time_len != values_len {
        c.push(format!(
            "cell '{cell}' {role}: {time_len} timestamps but {values_len} values"
        ));
    }

    c
}

/// Check that every present observation lies inside the variable's domain.
///
/// Simulated values may leave the domain; correction pulls them back in.
pub(crate) fn validate_observations_in_domain(
    cell: &str,
    values: &[Option<f64>],
    domain: &ValueDomain,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, v) in values.iter().enumerate() {
        if let Some(v) = *v
            && !domain.contains(v)
        {
            c.push(format!(
                "cell '{cell}' observed_reference: value {v} at index {i} is outside the variable domain"
            ));
        }
    }

    c
}
