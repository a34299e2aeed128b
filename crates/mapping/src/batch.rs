//! Data-parallel correction of many independent cells.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::CorrectionConfig;
use crate::context::CorrectionContext;
use crate::correct;
use crate::error::CorrectionError;
use crate::result::CorrectionResult;

/// Outcome of correcting one cell in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    /// The cell was corrected.
    Corrected(CorrectionResult),
    /// The cell could not be corrected; the rest of the batch is unaffected.
    Failed(CorrectionError),
    /// The batch was cancelled before this cell started.
    Skipped,
}

impl CellOutcome {
    /// Returns the result if the cell was corrected.
    pub fn result(&self) -> Option<&CorrectionResult> {
        match self {
            Self::Corrected(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the error if the cell failed.
    pub fn error(&self) -> Option<&CorrectionError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Per-cell outcomes of a batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    outcomes: Vec<CellOutcome>,
}

impl BatchReport {
    /// Outcomes in the order the cells were given.
    pub fn outcomes(&self) -> &[CellOutcome] {
        &self.outcomes
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if the batch had no cells.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of corrected cells.
    pub fn n_corrected(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Corrected(_)))
    }

    /// Number of failed cells.
    pub fn n_failed(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Failed(_)))
    }

    /// Number of cells skipped after cancellation.
    pub fn n_skipped(&self) -> usize {
        self.count(|o| matches!(o, CellOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&CellOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Corrects every cell on the rayon thread pool.
///
/// A failing cell is reported as [`CellOutcome::Failed`] and logged; it
/// never aborts the batch.
///
/// # Errors
///
/// Returns [`CorrectionError::InvalidConfig`] if `config` is invalid,
/// before any cell is processed.
pub fn correct_batch(
    cells: &[CorrectionContext],
    config: &CorrectionConfig,
) -> Result<BatchReport, CorrectionError> {
    correct_batch_cancellable(cells, config, &AtomicBool::new(false))
}

/// Like [`correct_batch`], but checks `cancel` before each cell starts.
///
/// Cells that have not started when `cancel` is set are reported as
/// [`CellOutcome::Skipped`]. Cells already running finish normally.
///
/// # Errors
///
/// Returns [`CorrectionError::InvalidConfig`] if `config` is invalid.
#[tracing::instrument(skip_all, fields(n_cells = cells.len(), method = config.method().name()))]
pub fn correct_batch_cancellable(
    cells: &[CorrectionContext],
    config: &CorrectionConfig,
    cancel: &AtomicBool,
) -> Result<BatchReport, CorrectionError> {
    config.validate()?;

    let outcomes: Vec<CellOutcome> = cells
        .par_iter()
        .enumerate()
        .map(|(i, cell)| {
            if cancel.load(Ordering::Relaxed) {
                return CellOutcome::Skipped;
            }
            match correct(cell, config) {
                Ok(result) => CellOutcome::Corrected(result),
                Err(e) => {
                    warn!(cell = i, error = %e, "cell correction failed");
                    CellOutcome::Failed(e)
                }
            }
        })
        .collect();

    let report = BatchReport { outcomes };
    debug!(
        corrected = report.n_corrected(),
        failed = report.n_failed(),
        skipped = report.n_skipped(),
        "batch finished"
    );
    Ok(report)
}
