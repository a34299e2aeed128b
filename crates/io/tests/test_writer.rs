//! Integration test: cell file -> batch correction -> result file.

use approx::assert_relative_eq;
use biascorr_io::model::{CellFileRecord, CellRecord, SeriesRecord};
use biascorr_io::{
    CellStatus, IoError, KindRecord, VariableMeta, WriterConfig, read_cells, read_results,
    write_results,
};
use biascorr_mapping::{CellOutcome, CorrectionConfig, Method, correct_batch};

fn daily(year: i32, n: usize) -> Vec<String> {
    let start = chrono::NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date");
    start
        .iter_days()
        .take(n)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

fn series(year: i32, values: Vec<Option<f64>>) -> SeriesRecord {
    SeriesRecord {
        time: daily(year, values.len()),
        values,
    }
}

/// Observations `1..=40`, simulation `2, 4, ..., 80`: QM halves every value.
fn halving_cell(id: &str) -> CellRecord {
    CellRecord {
        id: id.into(),
        observed_reference: series(1981, (1..=40).map(|i| Some(i as f64)).collect()),
        simulated_reference: series(1981, (1..=40).map(|i| Some(2.0 * i as f64)).collect()),
        simulated_target: series(2071, vec![Some(10.0), None, Some(20.0)]),
    }
}

fn constant_cell(id: &str) -> CellRecord {
    CellRecord {
        id: id.into(),
        observed_reference: series(1981, (1..=40).map(|i| Some(i as f64)).collect()),
        simulated_reference: series(1981, vec![Some(5.0); 40]),
        simulated_target: series(2071, vec![Some(5.0), Some(6.0), Some(7.0)]),
    }
}

fn write_input(dir: &tempfile::TempDir, cells: Vec<CellRecord>) -> std::path::PathBuf {
    let record = CellFileRecord {
        variable: VariableMeta {
            name: "tas".into(),
            units: "degC".into(),
            kind: KindRecord::Continuous,
            lower: None,
            upper: None,
        },
        cells,
    };
    let path = dir.path().join("cells.json");
    let text = serde_json::to_string(&record).expect("serialise cells");
    std::fs::write(&path, text).expect("write cells");
    path
}

#[test]
fn corrected_and_failed_cells_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = write_input(&dir, vec![halving_cell("good"), constant_cell("flat")]);
    let output = dir.path().join("out.json");

    let file = read_cells(&input).expect("valid cell file");
    let report = correct_batch(&file.to_contexts(), &CorrectionConfig::new()).unwrap();
    write_results(
        &output,
        &file,
        Method::QuantileMapping,
        report.outcomes(),
        &WriterConfig::default(),
    )
    .expect("write succeeds");

    let result = read_results(&output).expect("read back");
    assert_eq!(result.method, "quantile_mapping");
    assert_eq!(result.variable.units, "degC");
    assert_eq!(result.cells.len(), 2);

    let good = &result.cells[0];
    assert_eq!(good.id, "good");
    assert_eq!(good.status, CellStatus::Corrected);
    assert_eq!(
        good.time,
        vec!["2071-01-01T00:00:00", "2071-01-02T00:00:00", "2071-01-03T00:00:00"]
    );
    assert_relative_eq!(good.values[0].unwrap(), 5.0, epsilon = 1e-9);
    assert_eq!(good.values[1], None);
    assert_relative_eq!(good.values[2].unwrap(), 10.0, epsilon = 1e-9);
    let diagnostics = good.diagnostics.as_ref().expect("diagnostics attached");
    assert_eq!(diagnostics.n_groups, 1);
    assert_eq!(diagnostics.n_frequency_adapted, 0);

    let flat = &result.cells[1];
    assert_eq!(flat.status, CellStatus::Failed);
    assert_eq!(flat.values, vec![None, None, None]);
    assert_eq!(flat.time.len(), 3);
    let message = flat.error.as_deref().expect("error message");
    assert!(message.starts_with("degenerate distribution in simulated_reference"));
}

#[test]
fn skipped_cells_have_no_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = write_input(&dir, vec![halving_cell("a")]);
    let output = dir.path().join("out.json");

    let file = read_cells(&input).expect("valid cell file");
    let config = WriterConfig::default()
        .with_pretty(false)
        .with_time_format("%Y-%m-%d");
    write_results(
        &output,
        &file,
        Method::ScaledDistributionMapping,
        &[CellOutcome::Skipped],
        &config,
    )
    .expect("write succeeds");

    let result = read_results(&output).expect("read back");
    let cell = &result.cells[0];
    assert_eq!(cell.status, CellStatus::Skipped);
    assert_eq!(cell.error, None);
    assert_eq!(cell.time[0], "2071-01-01");
    assert!(cell.values.iter().all(Option::is_none));
}

#[test]
fn outcome_count_must_match_cells() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = write_input(&dir, vec![halving_cell("a"), halving_cell("b")]);
    let file = read_cells(&input).expect("valid cell file");

    let err = write_results(
        &dir.path().join("out.json"),
        &file,
        Method::QuantileMapping,
        &[CellOutcome::Skipped],
        &WriterConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Validation { count: 1, .. }), "got {err:?}");
}

#[test]
fn unrenderable_time_format_is_rejected_before_writing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = write_input(&dir, vec![halving_cell("a")]);
    let output = dir.path().join("out.json");
    let file = read_cells(&input).expect("valid cell file");

    let err = write_results(
        &output,
        &file,
        Method::QuantileMapping,
        &[CellOutcome::Skipped],
        &WriterConfig::default().with_time_format("%Y-%m-%d %z"),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Validation { count: 1, .. }), "got {err:?}");
    assert!(!output.exists());
}
