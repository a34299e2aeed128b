use std::sync::atomic::AtomicBool;

use biascorr_mapping::{
    CellOutcome, CorrectionConfig, CorrectionContext, CorrectionError, TimeSeries, ValueDomain,
    VariableKind, correct_batch, correct_batch_cancellable, correct_qm,
};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1991, 1, 1).expect("valid date")
}

fn cell(seed: u64) -> CorrectionContext {
    let mut rng = StdRng::seed_from_u64(seed);
    let obs_dist = Normal::new(5.0, 2.0).expect("valid normal params");
    let sim_dist = Normal::new(7.0, 2.5).expect("valid normal params");
    let obs = (0..365).map(|_| obs_dist.sample(&mut rng)).collect();
    let sim = (0..365).map(|_| sim_dist.sample(&mut rng)).collect();
    let target = (0..100).map(|_| sim_dist.sample(&mut rng)).collect();
    CorrectionContext::new(
        TimeSeries::daily(start(), obs),
        TimeSeries::daily(start(), sim),
        TimeSeries::daily(start(), target),
        VariableKind::Continuous,
        ValueDomain::unbounded(),
    )
}

fn constant_cell() -> CorrectionContext {
    CorrectionContext::new(
        TimeSeries::daily(start(), vec![1.0; 50]),
        TimeSeries::daily(start(), vec![2.0; 50]),
        TimeSeries::daily(start(), vec![2.0; 5]),
        VariableKind::Continuous,
        ValueDomain::unbounded(),
    )
}

#[test]
fn failing_cell_does_not_abort_the_batch() {
    let cells = vec![cell(1), constant_cell(), cell(2)];
    let report = correct_batch(&cells, &CorrectionConfig::new()).unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.n_corrected(), 2);
    assert_eq!(report.n_failed(), 1);
    assert_eq!(report.n_skipped(), 0);
    assert!(matches!(
        report.outcomes()[1].error(),
        Some(CorrectionError::DegenerateDistribution { .. })
    ));
}

#[test]
fn batch_outcomes_follow_input_order() {
    let cells: Vec<_> = (10..18).map(cell).collect();
    let config = CorrectionConfig::new();
    let report = correct_batch(&cells, &config).unwrap();

    for (ctx, outcome) in cells.iter().zip(report.outcomes()) {
        let expected = correct_qm(ctx, &config).unwrap();
        assert_eq!(outcome.result(), Some(&expected));
    }
}

#[test]
fn cancelled_batch_skips_every_cell() {
    let cells = vec![cell(3), cell(4)];
    let cancel = AtomicBool::new(true);
    let report = correct_batch_cancellable(&cells, &CorrectionConfig::new(), &cancel).unwrap();
    assert_eq!(report.n_skipped(), 2);
    assert!(report.outcomes().iter().all(|o| *o == CellOutcome::Skipped));
}

#[test]
fn invalid_config_fails_the_whole_batch() {
    let cells = vec![cell(5)];
    let config = CorrectionConfig::new().with_min_reference_samples(0);
    assert!(matches!(
        correct_batch(&cells, &config),
        Err(CorrectionError::InvalidConfig { .. })
    ));
}

#[test]
fn empty_batch() {
    let report = correct_batch(&[], &CorrectionConfig::new()).unwrap();
    assert!(report.is_empty());
}
