use approx::assert_relative_eq;
use biascorr_mapping::{
    CorrectionConfig, CorrectionContext, CorrectionError, DriedSide, Method, QuantileEstimator,
    SeriesRole, TimeSeries, ValueDomain, VariableKind, correct, correct_qm,
};
use chrono::{NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma as GammaDist, Normal};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1981, 1, 1).expect("valid date")
}

fn future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2071, 1, 1).expect("valid date")
}

fn normal_series(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(mean, sd).expect("valid normal params");
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

/// Daily precipitation: dry with probability `dry_prob`, otherwise Gamma.
fn precip_series(n: usize, dry_prob: f64, scale: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = GammaDist::new(0.8, scale).expect("valid gamma params");
    (0..n)
        .map(|_| {
            if rng.random_bool(dry_prob) {
                0.0
            } else {
                // keep wet days clearly above the wet-day threshold
                0.2 + dist.sample(&mut rng)
            }
        })
        .collect()
}

fn temperature_context(obs: Vec<f64>, sim: Vec<f64>, target: Vec<f64>) -> CorrectionContext {
    CorrectionContext::new(
        TimeSeries::daily(start(), obs),
        TimeSeries::daily(start(), sim),
        TimeSeries::daily(future(), target),
        VariableKind::Continuous,
        ValueDomain::unbounded(),
    )
}

fn precip_context(obs: Vec<f64>, sim: Vec<f64>, target: Vec<f64>) -> CorrectionContext {
    CorrectionContext::new(
        TimeSeries::daily(start(), obs),
        TimeSeries::daily(start(), sim),
        TimeSeries::daily(future(), target),
        VariableKind::ZeroInflated,
        ValueDomain::non_negative(),
    )
}

// ---------------------------------------------------------------------------
// Continuous variables
// ---------------------------------------------------------------------------

#[test]
fn identical_references_return_interior_target_values() {
    let reference = normal_series(500, 10.0, 3.0, 1);
    let target = normal_series(200, 10.5, 3.0, 2);
    let ctx = temperature_context(reference.clone(), reference.clone(), target.clone());

    let result = correct_qm(&ctx, &CorrectionConfig::new()).unwrap();

    let lo = reference.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = reference.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut n_interior = 0;
    for (&got, &v) in result.corrected().values().iter().zip(&target) {
        if v > lo && v < hi {
            assert_relative_eq!(got, v, epsilon = 1e-9);
            n_interior += 1;
        }
    }
    assert!(n_interior > 150, "only {n_interior} interior values");
}

#[test]
fn corrected_series_keeps_target_timestamps() {
    let ctx = temperature_context(
        normal_series(100, 0.0, 1.0, 3),
        normal_series(100, 1.0, 1.0, 4),
        normal_series(40, 1.0, 1.0, 5),
    );
    let result = correct_qm(&ctx, &CorrectionConfig::new()).unwrap();
    assert_eq!(result.corrected().times(), ctx.simulated_target().times());
    assert_eq!(result.diagnostics().method(), Method::QuantileMapping);
    assert_eq!(result.diagnostics().n_groups(), 1);
}

#[test]
fn mean_bias_is_removed() {
    let obs = normal_series(3000, 15.0, 4.0, 6);
    let sim = normal_series(3000, 18.0, 4.0, 7);
    let target = normal_series(3000, 18.0, 4.0, 8);
    let ctx = temperature_context(obs, sim, target);

    let result = correct_qm(&ctx, &CorrectionConfig::new()).unwrap();
    let mean = mean_of(result.corrected().values());
    assert!((mean - 15.0).abs() < 0.5, "corrected mean {mean}");
}

#[test]
fn ecdf_percentile_estimator_reproduces_worked_example() {
    let ctx = temperature_context(
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![2.0, 4.0, 6.0, 8.0, 10.0],
        vec![6.0],
    );
    let config = CorrectionConfig::new()
        .with_min_reference_samples(5)
        .with_estimator(QuantileEstimator::EcdfPercentile);
    let result = correct_qm(&ctx, &config).unwrap();
    assert_relative_eq!(result.corrected().values()[0], 3.4, epsilon = 1e-12);

    // Weibull positions put 6 exactly on the median rank.
    let config = config.with_estimator(QuantileEstimator::Interpolated);
    let weibull = correct_qm(&ctx, &config).unwrap();
    assert_relative_eq!(weibull.corrected().values()[0], 3.0, epsilon = 1e-12);
}

#[test]
fn constant_simulated_reference_is_degenerate() {
    let ctx = temperature_context(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![5.0; 5], vec![5.0, 6.0]);
    let config = CorrectionConfig::new().with_min_reference_samples(5);
    let err = correct_qm(&ctx, &config).unwrap_err();
    assert!(
        matches!(
            err,
            CorrectionError::DegenerateDistribution {
                role: SeriesRole::SimulatedReference,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn too_few_reference_values() {
    let ctx = temperature_context(
        normal_series(10, 0.0, 1.0, 9),
        normal_series(10, 0.0, 1.0, 10),
        vec![0.0],
    );
    let err = correct_qm(&ctx, &CorrectionConfig::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "insufficient data in observed_reference (whole series): need at least 30 values, got 10"
    );
}

#[test]
fn mismatched_sampling_step_is_rejected() {
    let t0 = future().and_hms_opt(0, 0, 0).expect("valid time");
    let hourly: Vec<_> = (0..50).map(|i| t0 + TimeDelta::hours(i)).collect();
    let ctx = CorrectionContext::new(
        TimeSeries::daily(start(), normal_series(50, 0.0, 1.0, 11)),
        TimeSeries::daily(start(), normal_series(50, 0.0, 1.0, 12)),
        TimeSeries::new(hourly, normal_series(50, 0.0, 1.0, 13)).unwrap(),
        VariableKind::Continuous,
        ValueDomain::unbounded(),
    );
    assert!(matches!(
        correct_qm(&ctx, &CorrectionConfig::new()),
        Err(CorrectionError::MisalignedSeries { .. })
    ));
}

#[test]
fn invalid_config_is_rejected_before_correction() {
    let ctx = temperature_context(vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0]);
    let config = CorrectionConfig::new().with_wet_day_threshold(-1.0);
    assert!(matches!(
        correct(&ctx, &config),
        Err(CorrectionError::InvalidConfig { .. })
    ));
}

#[test]
fn missing_target_values_stay_missing() {
    let mut target = normal_series(60, 0.0, 1.0, 14);
    target[3] = f64::NAN;
    target[40] = f64::NAN;
    let ctx = temperature_context(
        normal_series(100, 0.0, 1.0, 15),
        normal_series(100, 0.5, 1.0, 16),
        target,
    );
    let result = correct_qm(&ctx, &CorrectionConfig::new()).unwrap();
    let values = result.corrected().values();
    assert!(values[3].is_nan() && values[40].is_nan());
    assert_eq!(values.iter().filter(|v| v.is_nan()).count(), 2);
}

// ---------------------------------------------------------------------------
// Zero-inflated variables
// ---------------------------------------------------------------------------

#[test]
fn wetter_simulation_is_dried_to_observed_frequency() {
    // 10 values each: obs 60 % dry, sim 40 % dry
    let obs = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0];
    let sim = vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.7, 1.0, 2.0, 3.0, 4.0];
    let target = vec![0.0, 0.6, 1.5, 3.0];
    let config = CorrectionConfig::new().with_min_reference_samples(4);
    let result = correct_qm(&precip_context(obs, sim, target), &config).unwrap();

    let adaptations = result.diagnostics().frequency_adaptations();
    assert_eq!(adaptations.len(), 1);
    let report = adaptations[0].1;
    assert_eq!(report.dried(), DriedSide::Simulated);
    assert_relative_eq!(report.observed_dry_fraction(), 0.6);
    assert_relative_eq!(report.simulated_dry_fraction(), 0.4);
    assert_relative_eq!(report.adapted_dry_fraction(), 0.6);
    assert_eq!(report.n_reference_dried(), 2);

    // 0.6 falls under the raised threshold of 0.7 and becomes dry
    let values = result.corrected().values();
    assert_eq!(values[0], 0.0);
    assert_eq!(values[1], 0.0);
    assert!(values[2] >= 1.0 && values[3] >= 1.0);
}

#[test]
fn drier_simulation_dries_the_observations() {
    // obs 40 % dry, sim 60 % dry
    let obs = vec![0.0, 0.0, 0.0, 0.0, 0.3, 0.4, 1.0, 2.0, 3.0, 4.0];
    let sim = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0];
    let config = CorrectionConfig::new().with_min_reference_samples(4);
    let result = correct_qm(&precip_context(obs, sim, vec![0.0, 2.0]), &config).unwrap();

    let report = result.diagnostics().frequency_adaptations()[0].1;
    assert_eq!(report.dried(), DriedSide::Observed);
    assert_eq!(report.n_reference_dried(), 2);
    assert_eq!(report.n_target_dried(), 0);
    assert_relative_eq!(report.adapted_dry_fraction(), 0.6);
    // sim 2.0 sits on the obs value of the same wet rank
    assert_relative_eq!(result.corrected().values()[1], 2.0, epsilon = 1e-12);
}

#[test]
fn synthetic_precipitation_stays_non_negative() {
    let obs = precip_series(3650, 0.6, 6.0, 21);
    let sim = precip_series(3650, 0.4, 4.0, 22);
    let target = precip_series(3650, 0.4, 5.0, 23);
    let ctx = precip_context(obs, sim, target.clone());

    let result = correct_qm(&ctx, &CorrectionConfig::new()).unwrap();
    let values = result.corrected().values();
    assert!(values.iter().all(|&v| v >= 0.0));
    assert!(result.diagnostics().frequency_adapted());

    // dry target days stay dry; adapted days join them
    let report = result.diagnostics().frequency_adaptations()[0].1;
    let n_dry_in = target.iter().filter(|&&v| v <= 0.1).count();
    let n_dry_out = values.iter().filter(|&&v| v == 0.0).count();
    assert_eq!(n_dry_out, n_dry_in + report.n_target_dried());
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
