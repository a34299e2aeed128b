//! Wet-day frequency adaptation for zero-inflated variables.
//!
//! Reconciles the dry-day fractions of the observed and simulated reference
//! series before their wet-day distributions are mapped onto each other.
//! The wetter side has its zero threshold raised until its dry fraction
//! matches the drier side; the values below the raised threshold become 0.

use tracing::debug;

/// Which side of the reference pair had its threshold raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriedSide {
    /// The simulated reference (and with it the simulated target) was
    /// wetter than the observations.
    Simulated,
    /// The observations were wetter than the simulated reference.
    Observed,
}

/// Record of one frequency adaptation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAdaptation {
    dried: DriedSide,
    observed_dry_fraction: f64,
    simulated_dry_fraction: f64,
    adapted_dry_fraction: f64,
    raised_threshold: f64,
    n_reference_dried: usize,
    n_target_dried: usize,
}

impl FrequencyAdaptation {
    /// Side whose threshold was raised.
    pub fn dried(&self) -> DriedSide {
        self.dried
    }

    /// Dry fraction of the observed reference before adaptation.
    pub fn observed_dry_fraction(&self) -> f64 {
        self.observed_dry_fraction
    }

    /// Dry fraction of the simulated reference before adaptation.
    pub fn simulated_dry_fraction(&self) -> f64 {
        self.simulated_dry_fraction
    }

    /// Dry fraction of the dried side after adaptation.
    pub fn adapted_dry_fraction(&self) -> f64 {
        self.adapted_dry_fraction
    }

    /// Raised zero threshold of the dried side.
    pub fn raised_threshold(&self) -> f64 {
        self.raised_threshold
    }

    /// Number of reference values set to zero.
    pub fn n_reference_dried(&self) -> usize {
        self.n_reference_dried
    }

    /// Number of target values set to zero.
    pub fn n_target_dried(&self) -> usize {
        self.n_target_dried
    }
}

/// Series after frequency adaptation.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedSeries {
    /// Observed reference values.
    pub observed: Vec<f64>,
    /// Simulated reference values.
    pub simulated_reference: Vec<f64>,
    /// Simulated target values.
    pub simulated_target: Vec<f64>,
    /// What was changed, or `None` when the fractions already agreed.
    pub report: Option<FrequencyAdaptation>,
}

/// Matches the dry-day fractions of the two reference series.
///
/// A value is dry when it is at or below `threshold`. When the dry
/// fractions differ by more than `tolerance`, the wetter reference has its
/// smallest wet values set to 0 until its dry fraction matches the other
/// one. If the simulated reference is the wetter side, the same raised
/// threshold is applied to the simulated target. Values already dry and
/// missing values are left untouched, so the rank order of the remaining
/// wet values is preserved.
///
/// Ties at the raised threshold are dried together, so the adapted
/// fraction can overshoot by the size of the tie run.
#[tracing::instrument(
    skip_all,
    fields(n_obs = observed.len(), n_sim = simulated_reference.len())
)]
pub fn adapt_frequency(
    observed: &[f64],
    simulated_reference: &[f64],
    simulated_target: &[f64],
    threshold: f64,
    tolerance: f64,
) -> AdaptedSeries {
    let mut out = AdaptedSeries {
        observed: observed.to_vec(),
        simulated_reference: simulated_reference.to_vec(),
        simulated_target: simulated_target.to_vec(),
        report: None,
    };

    let dry_obs = biascorr_stats::fraction_at_or_below(observed, threshold);
    let dry_sim = biascorr_stats::fraction_at_or_below(simulated_reference, threshold);

    let (dried, target_fraction) = if dry_obs - dry_sim > tolerance {
        (DriedSide::Simulated, dry_obs)
    } else if dry_sim - dry_obs > tolerance {
        (DriedSide::Observed, dry_sim)
    } else {
        return out;
    };

    let reference = match dried {
        DriedSide::Simulated => &mut out.simulated_reference,
        DriedSide::Observed => &mut out.observed,
    };
    let Some(raised) = raised_threshold(reference, threshold, target_fraction) else {
        return out;
    };

    let n_reference_dried = dry_between(reference, threshold, raised);
    let adapted_dry_fraction = biascorr_stats::fraction_at_or_below(reference, threshold);
    let n_target_dried = match dried {
        DriedSide::Simulated => dry_between(&mut out.simulated_target, threshold, raised),
        DriedSide::Observed => 0,
    };

    debug!(
        ?dried,
        dry_obs,
        dry_sim,
        adapted = adapted_dry_fraction,
        raised,
        n_reference_dried,
        n_target_dried,
        "wet-day frequency adapted"
    );

    out.report = Some(FrequencyAdaptation {
        dried,
        observed_dry_fraction: dry_obs,
        simulated_dry_fraction: dry_sim,
        adapted_dry_fraction,
        raised_threshold: raised,
        n_reference_dried,
        n_target_dried,
    });
    out
}

/// Threshold at which `values` reaches a dry fraction of `target_fraction`.
///
/// Returns `None` when no additional value needs to be dried.
fn raised_threshold(values: &[f64], threshold: f64, target_fraction: f64) -> Option<f64> {
    let mut wet: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > threshold)
        .collect();
    let n_finite = values.iter().filter(|v| v.is_finite()).count();
    let n_dry = n_finite - wet.len();

    let desired = ((target_fraction * n_finite as f64).round() as usize).min(n_finite);
    let k = desired.checked_sub(n_dry).filter(|&k| k > 0)?;

    wet.sort_by(f64::total_cmp);
    Some(wet[k - 1])
}

/// Sets values in `(threshold, raised]` to zero and returns how many changed.
fn dry_between(values: &mut [f64], threshold: f64, raised: f64) -> usize {
    let mut n = 0;
    for v in values.iter_mut().filter(|v| **v > threshold && **v <= raised) {
        *v = 0.0;
        n += 1;
    }
    n
}
