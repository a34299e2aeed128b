//! Writing corrected cells to a JSON result file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use biascorr_mapping::{CellOutcome, CorrectionResult, Method, TrendComponent};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::error::IoError;
use crate::model::{CellResultRecord, CellStatus, DiagnosticsRecord, ResultFile, TrendRecord};
use crate::reader::{Cell, CellFile};

/// Configuration for writing result files.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Indent the JSON output.
    pretty: bool,
    /// Attach per-cell diagnostics to corrected cells.
    include_diagnostics: bool,
    /// `chrono` format string for output timestamps.
    time_format: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_diagnostics: true,
            time_format: "%Y-%m-%dT%H:%M:%S".into(),
        }
    }
}

impl WriterConfig {
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_diagnostics(mut self, include: bool) -> Self {
        self.include_diagnostics = include;
        self
    }

    /// Sets the timestamp format, e.g. `"%Y-%m-%d"` for daily data.
    pub fn with_time_format(mut self, fmt: impl Into<String>) -> Self {
        self.time_format = fmt.into();
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the time format is empty or cannot
    /// render a timestamp without an offset (unknown specifiers, `%z`).
    pub fn validate(&self) -> Result<(), IoError> {
        if self.time_format.is_empty() {
            return Err(IoError::Validation {
                count: 1,
                details: "time_format must not be empty".to_string(),
            });
        }
        let sample = NaiveDate::MIN.and_time(NaiveTime::MIN);
        format_time(&sample, &self.time_format)?;
        Ok(())
    }
}

/// Write one result per cell of `file` to `path`.
///
/// `outcomes` must be in the order of `file.cells()`, as returned by
/// `correct_batch`. Failed and skipped cells are written with `null` values;
/// failed cells also carry the error message.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid or the
/// outcome count does not match the cell count, and [`IoError::Io`] or
/// [`IoError::Json`] if the file cannot be written.
pub fn write_results(
    path: &Path,
    file: &CellFile,
    method: Method,
    outcomes: &[CellOutcome],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    if outcomes.len() != file.len() {
        return Err(IoError::Validation {
            count: 1,
            details: format!("{} outcomes for {} cells", outcomes.len(), file.len()),
        });
    }

    let cells = file
        .cells()
        .iter()
        .zip(outcomes)
        .map(|(cell, outcome)| cell_record(cell, outcome, config))
        .collect::<Result<Vec<CellResultRecord>, IoError>>()?;
    let n_failed = cells
        .iter()
        .filter(|c| c.status == CellStatus::Failed)
        .count();

    let output = ResultFile {
        variable: file.variable().clone(),
        method: method.name().to_string(),
        cells,
    };

    let handle = File::create(path).map_err(|e| IoError::io(path, &e))?;
    let mut w = BufWriter::new(handle);
    let written = if config.pretty {
        serde_json::to_writer_pretty(&mut w, &output)
    } else {
        serde_json::to_writer(&mut w, &output)
    };
    written.map_err(|e| IoError::json(path, &e))?;
    w.flush().map_err(|e| IoError::io(path, &e))?;

    info!(
        path = %path.display(),
        n_cells = output.cells.len(),
        n_failed,
        "wrote results"
    );
    Ok(())
}

/// Read a result file written by [`write_results`].
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist and
/// [`IoError::Json`] if it is not a result file.
pub fn read_results(path: &Path) -> Result<ResultFile, IoError> {
    let text = std::fs::read_to_string(path).map_err(|e| IoError::io(path, &e))?;
    serde_json::from_str(&text).map_err(|e| IoError::json(path, &e))
}

fn cell_record(
    cell: &Cell,
    outcome: &CellOutcome,
    config: &WriterConfig,
) -> Result<CellResultRecord, IoError> {
    let target = cell.context().simulated_target();
    let time = format_times(target.times(), &config.time_format)?;

    let record = match outcome {
        CellOutcome::Corrected(result) => CellResultRecord {
            id: cell.id().to_string(),
            status: CellStatus::Corrected,
            time,
            values: result
                .corrected()
                .values()
                .iter()
                .map(|&v| (!v.is_nan()).then_some(v))
                .collect(),
            error: None,
            diagnostics: config.include_diagnostics.then(|| diagnostics(result)),
        },
        CellOutcome::Failed(e) => CellResultRecord {
            id: cell.id().to_string(),
            status: CellStatus::Failed,
            values: vec![None; time.len()],
            time,
            error: Some(e.to_string()),
            diagnostics: None,
        },
        CellOutcome::Skipped => CellResultRecord {
            id: cell.id().to_string(),
            status: CellStatus::Skipped,
            values: vec![None; time.len()],
            time,
            error: None,
            diagnostics: None,
        },
    };
    Ok(record)
}

fn format_times(times: &[NaiveDateTime], fmt: &str) -> Result<Vec<String>, IoError> {
    times.iter().map(|t| format_time(t, fmt)).collect()
}

/// Renders `t` with `fmt`, reporting a format chrono cannot render instead
/// of panicking the way `to_string` would.
fn format_time(t: &NaiveDateTime, fmt: &str) -> Result<String, IoError> {
    use std::fmt::Write as _;

    let mut out = String::new();
    write!(out, "{}", t.format(fmt)).map_err(|_| IoError::Validation {
        count: 1,
        details: format!("time_format {fmt:?} cannot render a timestamp"),
    })?;
    Ok(out)
}

fn diagnostics(result: &CorrectionResult) -> DiagnosticsRecord {
    let d = result.diagnostics();
    DiagnosticsRecord {
        n_groups: d.n_groups(),
        n_extrapolated: d.n_extrapolated(),
        n_frequency_adapted: d.frequency_adaptations().len(),
        trends: d
            .trends()
            .iter()
            .map(|(label, trend)| {
                let (component, value) = match *trend {
                    TrendComponent::Additive(v) => ("additive", v),
                    TrendComponent::Multiplicative(v) => ("multiplicative", v),
                };
                TrendRecord {
                    group: label.to_string(),
                    component: component.to_string(),
                    value,
                }
            })
            .collect(),
    }
}
