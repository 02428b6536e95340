//! Frequency tables.
//!
//! Continuous samples are split into `k` equal-width intervals between the
//! sample minimum and maximum; discrete samples are counted per integer value.
//!
//! # Interval convention
//!
//! Intervals are left-closed, right-open: `[lower, upper)`. The last interval
//! ends exactly at the sample maximum and additionally counts every
//! observation equal to it, so the table covers `[min, max]` with no gaps and
//! no double counting.
//!
//! # Examples
//!
//! ```
//! use u_simulation::binning::{bin_continuous, bin_discrete};
//!
//! let t = bin_continuous(&[0.0, 0.5, 1.0, 1.5, 2.0], 2).unwrap();
//! assert_eq!(t.observed, vec![2, 3]);
//! assert_eq!(t.lower, vec![0.0, 1.0]);
//! assert_eq!(t.upper, vec![1.0, 2.0]);
//!
//! let v = bin_discrete(&[3, 1, 3, 5]).unwrap();
//! assert_eq!(v.values, vec![1, 2, 3, 4, 5]);
//! assert_eq!(v.observed, vec![1, 0, 2, 0, 1]);
//! ```

use crate::error::{Result, SimulationError};
use crate::generator::Sample;

/// Observed frequencies over equal-width intervals (continuous samples).
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTable {
    /// Lower bound of each interval (inclusive).
    pub lower: Vec<f64>,
    /// Upper bound of each interval (exclusive, except for the last).
    pub upper: Vec<f64>,
    /// Class mark: midpoint of each interval.
    pub mark: Vec<f64>,
    /// Number of observations in each interval.
    pub observed: Vec<u64>,
}

/// One row of an [`IntervalTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRow {
    /// 1-based interval number.
    pub number: usize,
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Interval midpoint.
    pub mark: f64,
    /// Observed frequency.
    pub observed: u64,
}

impl IntervalTable {
    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether the table has no intervals.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Sum of observed frequencies.
    pub fn total(&self) -> u64 {
        self.observed.iter().sum()
    }

    /// Common interval width.
    pub fn width(&self) -> f64 {
        match (self.lower.first(), self.upper.last()) {
            (Some(&lo), Some(&hi)) => (hi - lo) / self.len() as f64,
            _ => 0.0,
        }
    }

    /// Iterates over rows for display.
    pub fn rows(&self) -> impl Iterator<Item = IntervalRow> + '_ {
        self.lower
            .iter()
            .zip(&self.upper)
            .zip(&self.mark)
            .zip(&self.observed)
            .enumerate()
            .map(|(i, (((&lower, &upper), &mark), &observed))| IntervalRow {
                number: i + 1,
                lower,
                upper,
                mark,
                observed,
            })
    }
}

/// Observed frequencies per integer value (discrete samples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTable {
    /// Every integer from the sample minimum to the maximum, inclusive.
    pub values: Vec<u64>,
    /// Number of observations equal to each value (zeros kept).
    pub observed: Vec<u64>,
}

/// One row of a [`ValueTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRow {
    /// The integer value.
    pub value: u64,
    /// Observed frequency.
    pub observed: u64,
}

impl ValueTable {
    /// Number of distinct values in the range.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of observed frequencies.
    pub fn total(&self) -> u64 {
        self.observed.iter().sum()
    }

    /// Iterates over rows for display.
    pub fn rows(&self) -> impl Iterator<Item = ValueRow> + '_ {
        self.values
            .iter()
            .zip(&self.observed)
            .map(|(&value, &observed)| ValueRow { value, observed })
    }
}

/// Either kind of frequency table.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyTable {
    /// Equal-width intervals of a continuous sample.
    Intervals(IntervalTable),
    /// Per-value counts of a discrete sample.
    Values(ValueTable),
}

impl FrequencyTable {
    /// Observed frequencies in table order.
    pub fn observed(&self) -> &[u64] {
        match self {
            Self::Intervals(t) => &t.observed,
            Self::Values(t) => &t.observed,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.observed().len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.observed().is_empty()
    }

    /// Sum of observed frequencies (the sample size).
    pub fn total(&self) -> u64 {
        self.observed().iter().sum()
    }
}

/// Builds an [`IntervalTable`] with `k` equal-width intervals.
///
/// Each observation is assigned to the first interval whose `[lower, upper)`
/// contains it; observations equal to the maximum are then added to the
/// last interval.
///
/// # Errors
///
/// - [`SimulationError::InvalidBinCount`] if `k == 0`
/// - [`SimulationError::EmptySample`] if `sample` is empty
/// - [`SimulationError::NonFiniteValue`] if an observation is NaN or infinite
pub fn bin_continuous(sample: &[f64], k: usize) -> Result<IntervalTable> {
    if k < 1 {
        return Err(SimulationError::InvalidBinCount { bins: k });
    }
    if sample.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if let Some(index) = sample.iter().position(|v| !v.is_finite()) {
        return Err(SimulationError::NonFiniteValue { index });
    }

    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / k as f64;

    let mut lower = Vec::with_capacity(k);
    let mut upper = Vec::with_capacity(k);
    let mut lo = min;
    for _ in 0..k {
        lower.push(lo);
        lo = (lo + width).min(max);
        upper.push(lo);
    }
    // Accumulated rounding must not leave a gap below max.
    upper[k - 1] = max;

    let mut observed = vec![0_u64; k];
    for &x in sample {
        if let Some(j) = (0..k).find(|&j| lower[j] <= x && x < upper[j]) {
            observed[j] += 1;
        }
    }
    observed[k - 1] += sample.iter().filter(|&&x| x == max).count() as u64;

    let mark = lower
        .iter()
        .zip(&upper)
        .map(|(&lo, &hi)| (lo + hi) / 2.0)
        .collect();

    Ok(IntervalTable {
        lower,
        upper,
        mark,
        observed,
    })
}

/// Builds a [`ValueTable`] covering every integer from min to max.
///
/// # Errors
///
/// [`SimulationError::EmptySample`] if `sample` is empty.
pub fn bin_discrete(sample: &[u64]) -> Result<ValueTable> {
    let min = *sample.iter().min().ok_or(SimulationError::EmptySample)?;
    let max = *sample.iter().max().ok_or(SimulationError::EmptySample)?;

    let values: Vec<u64> = (min..=max).collect();
    let mut observed = vec![0_u64; values.len()];
    for &x in sample {
        observed[(x - min) as usize] += 1;
    }

    Ok(ValueTable { values, observed })
}

/// Bins a [`Sample`]: intervals for continuous samples, values for discrete
/// ones (`k` is ignored in that case).
pub fn bin_sample(sample: &Sample, k: usize) -> Result<FrequencyTable> {
    match sample {
        Sample::Continuous(data) => bin_continuous(data, k).map(FrequencyTable::Intervals),
        Sample::Discrete(data) => bin_discrete(data).map(FrequencyTable::Values),
    }
}
