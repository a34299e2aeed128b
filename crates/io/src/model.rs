//! Serialised layout of cell files and result files.
//!
//! A cell file looks like
//!
//! ```json
//! {
//!   "variable": { "name": "pr", "units": "mm/day", "kind": "zero_inflated", "lower": 0.0 },
//!   "cells": [
//!     {
//!       "id": "cell_0001",
//!       "observed_reference":  { "time": ["1981-01-01", "..."], "values": [0.0, null, "..."] },
//!       "simulated_reference": { "time": ["..."], "values": ["..."] },
//!       "simulated_target":    { "time": ["..."], "values": ["..."] }
//!     }
//!   ]
//! }
//! ```
//!
//! Timestamps are ISO dates or ISO date-times without offset; `null` marks a
//! missing value.

use biascorr_mapping::{SeriesRole, VariableKind};
use serde::{Deserialize, Serialize};

/// Variable kind as written in a cell file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindRecord {
    #[default]
    Continuous,
    ZeroInflated,
}

impl From<KindRecord> for VariableKind {
    fn from(k: KindRecord) -> Self {
        match k {
            KindRecord::Continuous => VariableKind::Continuous,
            KindRecord::ZeroInflated => VariableKind::ZeroInflated,
        }
    }
}

impl From<VariableKind> for KindRecord {
    fn from(k: VariableKind) -> Self {
        match k {
            VariableKind::Continuous => KindRecord::Continuous,
            VariableKind::ZeroInflated => KindRecord::ZeroInflated,
        }
    }
}

/// Description of the variable shared by every cell in a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableMeta {
    /// Short variable name, e.g. `"tas"` or `"pr"`.
    pub name: String,
    /// Units, carried through to the output untouched.
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub kind: KindRecord,
    /// Physical lower bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Physical upper bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesRecord {
    pub time: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellRecord {
    pub id: String,
    pub observed_reference: SeriesRecord,
    pub simulated_reference: SeriesRecord,
    pub simulated_target: SeriesRecord,
}

impl CellRecord {
    /// The three series paired with their role.
    pub fn series(&self) -> [(SeriesRole, &SeriesRecord); 3] {
        [
            (SeriesRole::ObservedReference, &self.observed_reference),
            (SeriesRole::SimulatedReference, &self.simulated_reference),
            (SeriesRole::SimulatedTarget, &self.simulated_target),
        ]
    }
}

/// Top-level layout of an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellFileRecord {
    pub variable: VariableMeta,
    pub cells: Vec<CellRecord>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Outcome of one cell in a result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    Corrected,
    Failed,
    Skipped,
}

/// Change signal re-injected by scaled distribution mapping for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub group: String,
    /// `"additive"` or `"multiplicative"`.
    pub component: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsRecord {
    pub n_groups: usize,
    pub n_extrapolated: usize,
    /// Groups whose wet-day frequency was adapted.
    pub n_frequency_adapted: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trends: Vec<TrendRecord>,
}

/// One cell of a result file.
///
/// Failed and skipped cells carry the target timestamps with all-`null`
/// values so that every output cell has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellResultRecord {
    pub id: String,
    pub status: CellStatus,
    pub time: Vec<String>,
    pub values: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsRecord>,
}

/// Top-level layout of an output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub variable: VariableMeta,
    /// Method name as returned by `Method::name`.
    pub method: String,
    pub cells: Vec<CellResultRecord>,
}
