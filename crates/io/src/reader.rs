//! Reading and validating cell files.

use std::path::Path;

use biascorr_mapping::{CorrectionContext, SeriesRole, TimeSeries, ValueDomain, VariableKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::error::IoError;
use crate::model::{CellFileRecord, CellRecord, SeriesRecord, VariableMeta};
use crate::validate::{validate_ids, validate_observations_in_domain, validate_record_length};

// ---------------------------------------------------------------------------
// CellFile
// ---------------------------------------------------------------------------

/// One validated cell: an identifier and its correction input.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: String,
    context: CorrectionContext,
}

impl Cell {
    /// The cell identifier from the input file.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The three series and variable settings of this cell.
    pub fn context(&self) -> &CorrectionContext {
        &self.context
    }
}

/// A validated cell file.
///
/// Every series has parsed, strictly increasing timestamps and one value per
/// timestamp; missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFile {
    variable: VariableMeta,
    cells: Vec<Cell>,
}

impl CellFile {
    /// Variable metadata shared by every cell.
    pub fn variable(&self) -> &VariableMeta {
        &self.variable
    }

    /// Cells in file order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the file has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Overrides the variable kind declared in the file.
    pub fn with_kind(mut self, kind: VariableKind) -> Self {
        self.variable.kind = kind.into();
        for cell in &mut self.cells {
            let ctx = &cell.context;
            cell.context = CorrectionContext::new(
                ctx.observed_reference().clone(),
                ctx.simulated_reference().clone(),
                ctx.simulated_target().clone(),
                kind,
                *ctx.domain(),
            );
        }
        self
    }

    /// Correction inputs in file order.
    pub fn to_contexts(&self) -> Vec<CorrectionContext> {
        self.cells.iter().map(|c| c.context.clone()).collect()
    }

    /// Validates the raw layout and converts it into correction inputs.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every structural problem, or
    /// [`IoError::InvalidTime`] for the first timestamp that does not parse.
    pub fn from_record(record: CellFileRecord) -> Result<Self, IoError> {
        let CellFileRecord { variable, cells } = record;

        let domain = ValueDomain::new(variable.lower, variable.upper).map_err(|e| {
            IoError::Validation {
                count: 1,
                details: format!("variable '{}': {e}", variable.name),
            }
        })?;

        let mut checks = validate_ids(cells.iter().map(|c| c.id.as_str()));
        for cell in &cells {
            for (role, series) in cell.series() {
                checks.merge(validate_record_length(
                    &cell.id,
                    role,
                    series.time.len(),
                    series.values.len(),
                ));
            }
            checks.merge(validate_observations_in_domain(
                &cell.id,
                &cell.observed_reference.values,
                &domain,
            ));
        }
        checks.finish()?;

        let kind = VariableKind::from(variable.kind);
        let cells = cells
            .into_iter()
            .map(|c| build_cell(c, kind, domain))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { variable, cells })
    }
}

fn build_cell(
    record: CellRecord,
    kind: VariableKind,
    domain: ValueDomain,
) -> Result<Cell, IoError> {
    let observed =
        build_series(&record.id, SeriesRole::ObservedReference, record.observed_reference)?;
    let simulated =
        build_series(&record.id, SeriesRole::SimulatedReference, record.simulated_reference)?;
    let target = build_series(&record.id, SeriesRole::SimulatedTarget, record.simulated_target)?;

    Ok(Cell {
        context: CorrectionContext::new(observed, simulated, target, kind, domain),
        id: record.id,
    })
}

fn build_series(cell: &str, role: SeriesRole, record: SeriesRecord) -> Result<TimeSeries, IoError> {
    let times = record
        .time
        .iter()
        .map(|s| {
            parse_time(s).map_err(|reason| IoError::InvalidTime {
                cell: cell.to_owned(),
                value: s.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let values = record
        .values
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();

    TimeSeries::new(times, values).map_err(|e| IoError::Validation {
        count: 1,
        details: format!("cell '{cell}' {role}: {e}"),
    })
}

/// Parses an ISO date-time (`2000-01-31T12:00:00`) or an ISO date, which is
/// taken at midnight.
pub(crate) fn parse_time(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(t) = s.parse::<NaiveDateTime>() {
        return Ok(t);
    }
    s.parse::<NaiveDate>()
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// read_cells
// ---------------------------------------------------------------------------

/// Read and validate a JSON cell file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::Json`] if it is not a well-formed cell file, and the errors of
/// [`CellFile::from_record`] for invalid content.
pub fn read_cells(path: &Path) -> Result<CellFile, IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, &e))?;
    debug!(path = %path.display(), bytes = text.len(), "cell file loaded");

    let record: CellFileRecord =
        serde_json::from_str(&text).map_err(|e| IoError::json(path, &e))?;
    let file = CellFile::from_record(record)?;

    info!(
        path = %path.display(),
        variable = %file.variable.name,
        n_cells = file.len(),
        "read cell file"
    );
    Ok(file)
}
