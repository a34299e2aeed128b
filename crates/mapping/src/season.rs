//! Seasonal stratification of the three series into correction groups.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDateTime};

use crate::config::Seasonality;
use crate::context::CorrectionContext;

/// Number of ordinal days on the circular year used for window distances.
const YEAR_DAYS: u32 = 366;

/// Days before the first of each month in a leap year.
const LEAP_MONTH_OFFSETS: [u32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Identifies one seasonal group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupLabel {
    /// The whole series.
    Whole,
    /// Calendar month (1..=12).
    Month(u32),
    /// Calendar day (1..=366, counted as in a leap year) at the centre of a
    /// window.
    DayOfYear(u32),
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => f.write_str("whole series"),
            Self::Month(m) => write!(f, "month {m}"),
            Self::DayOfYear(d) => write!(f, "day-of-year {d}"),
        }
    }
}

/// Indices into each of the three series that are corrected together.
///
/// Target indices of distinct groups never overlap, while reference
/// indices may be shared between overlapping day-of-year windows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Group {
    pub(crate) label: GroupLabel,
    pub(crate) observed: Vec<usize>,
    pub(crate) simulated: Vec<usize>,
    pub(crate) target: Vec<usize>,
}

impl Group {
    /// Copies this group's values out of the three series.
    pub(crate) fn values(&self, ctx: &CorrectionContext) -> GroupValues {
        GroupValues {
            label: self.label,
            observed: gather(ctx.observed_reference().values(), &self.observed),
            simulated: gather(ctx.simulated_reference().values(), &self.simulated),
            target: gather(ctx.simulated_target().values(), &self.target),
        }
    }
}

/// The values of one [`Group`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupValues {
    pub(crate) label: GroupLabel,
    pub(crate) observed: Vec<f64>,
    pub(crate) simulated: Vec<f64>,
    pub(crate) target: Vec<f64>,
}

/// Splits the context into groups according to `seasonality`.
///
/// Groups are produced only for seasons present in the target, in
/// ascending label order.
pub(crate) fn stratify(ctx: &CorrectionContext, seasonality: Seasonality) -> Vec<Group> {
    let obs = ctx.observed_reference().times();
    let sim = ctx.simulated_reference().times();
    let tgt = ctx.simulated_target().times();

    match seasonality {
        Seasonality::Whole => vec![Group {
            label: GroupLabel::Whole,
            observed: (0..obs.len()).collect(),
            simulated: (0..sim.len()).collect(),
            target: (0..tgt.len()).collect(),
        }],
        Seasonality::Monthly => by_key(tgt, |t| t.month())
            .into_iter()
            .map(|(month, target)| Group {
                label: GroupLabel::Month(month),
                observed: matching(obs, |t| t.month() == month),
                simulated: matching(sim, |t| t.month() == month),
                target,
            })
            .collect(),
        Seasonality::DayOfYearWindow { half_width } => {
            let half_width = u32::from(half_width);
            by_key(tgt, calendar_day)
                .into_iter()
                .map(|(doy, target)| {
                    let near =
                        |t: &NaiveDateTime| circular_distance(calendar_day(t), doy) <= half_width;
                    Group {
                        label: GroupLabel::DayOfYear(doy),
                        observed: matching(obs, near),
                        simulated: matching(sim, near),
                        target,
                    }
                })
                .collect()
        }
    }
}

/// Copies the values at `idx`.
fn gather(values: &[f64], idx: &[usize]) -> Vec<f64> {
    idx.iter().map(|&i| values[i]).collect()
}

/// Day of year of `t`'s month and day in a leap year, so March 1 is day 61
/// in every year and February 29 has a slot of its own.
fn calendar_day(t: &NaiveDateTime) -> u32 {
    LEAP_MONTH_OFFSETS[t.month0() as usize] + t.day()
}

/// Distance between two ordinal days on a 366-day circle.
fn circular_distance(a: u32, b: u32) -> u32 {
    let d = a.abs_diff(b) % YEAR_DAYS;
    d.min(YEAR_DAYS - d)
}

fn by_key<F>(times: &[NaiveDateTime], key: F) -> BTreeMap<u32, Vec<usize>>
where
    F: Fn(&NaiveDateTime) -> u32,
{
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, t) in times.iter().enumerate() {
        groups.entry(key(t)).or_default().push(i);
    }
    groups
}

fn matching<F>(times: &[NaiveDateTime], pred: F) -> Vec<usize>
where
    F: Fn(&NaiveDateTime) -> bool,
{
    times
        .iter()
        .enumerate()
        .filter(|(_, t)| pred(t))
        .map(|(i, _)| i)
        .collect()
}
