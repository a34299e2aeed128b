//! Statistical helper functions for the biascorr crates.
//!
//! Everything here works on plain `&[f64]` slices. Functions that accept
//! series with missing data say so explicitly; the rest expect finite input.

/// Type-7 sample quantile: linear interpolation between order statistics
/// at `h = (n - 1) p`.
///
/// `sorted` must be ascending and non-empty.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Copies the finite values of `data` into a new vector, preserving order.
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|x| x.is_finite()).collect()
}

/// Mean over the finite values of `data`. Returns `None` if there are none.
pub fn finite_mean(data: &[f64]) -> Option<f64> {
    let (sum, n) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Fraction of finite values that are `<= threshold`.
///
/// Non-finite values are excluded from both numerator and denominator.
/// Returns 0.0 when there are no finite values.
pub fn fraction_at_or_below(data: &[f64], threshold: f64) -> f64 {
    let (below, n) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((0usize, 0usize), |(b, n), &x| {
            (b + usize::from(x <= threshold), n + 1)
        });
    if n == 0 {
        return 0.0;
    }
    below as f64 / n as f64
}

/// Ordinary least-squares line `intercept + slope * t` over the sample index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    intercept: f64,
    slope: f64,
}

impl LinearFit {
    /// Fits a line to `data` against `t = 0, 1, ..., n-1`.
    ///
    /// Non-finite values are skipped, but keep their index position. With
    /// fewer than two finite points the slope is 0 and the intercept is the
    /// finite mean (or 0.0 when nothing is finite).
    pub fn fit(data: &[f64]) -> Self {
        let pairs: Vec<(f64, f64)> = data
            .iter()
            .enumerate()
            .filter(|(_, y)| y.is_finite())
            .map(|(t, &y)| (t as f64, y))
            .collect();

        if pairs.len() < 2 {
            let intercept = pairs.first().map_or(0.0, |&(_, y)| y);
            return Self {
                intercept,
                slope: 0.0,
            };
        }

        let n = pairs.len() as f64;
        let mean_t = pairs.iter().map(|(t, _)| t).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sp = 0.0;
        let mut ss_t = 0.0;
        for &(t, y) in &pairs {
            sp += (t - mean_t) * (y - mean_y);
            ss_t += (t - mean_t) * (t - mean_t);
        }

        let slope = if ss_t.abs() > 1e-15 { sp / ss_t } else { 0.0 };
        Self {
            intercept: mean_y - slope * mean_t,
            slope,
        }
    }

    /// Intercept at `t = 0`.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Change per time step.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Evaluates the line at index `t`.
    pub fn at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64
    }
}
