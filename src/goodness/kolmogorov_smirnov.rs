//! Kolmogorov–Smirnov goodness-of-fit test on frequency tables.
//!
//! The statistic is the largest absolute gap between the cumulative observed
//! and cumulative expected proportions, taken over the rows in table order:
//!
//! ```text
//! D = max_j | Σ_{i≤j} Oᵢ/n − Σ_{i≤j} Eᵢ/n |,   n = Σ Oᵢ
//! ```
//!
//! The critical value is the 95th percentile of the two-sided one-sample
//! Kolmogorov distribution for n observations.

use crate::error::{Result, SimulationError};

use super::critical::kolmogorov_quantile;
use super::CONFIDENCE_LEVEL;

/// Outcome of a Kolmogorov–Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    /// Confidence level of the critical value (0.95).
    pub confidence_level: f64,
    /// Number of observations n (sum of observed frequencies).
    pub sample_count: u64,
    /// Computed D statistic.
    pub computed: f64,
    /// Tabulated D at `confidence_level` for n observations.
    pub critical: f64,
}

/// Kolmogorov–Smirnov test of `observed` against `expected` frequencies.
///
/// # Errors
///
/// - [`SimulationError::LengthMismatch`] if the slices differ in length
/// - [`SimulationError::EmptySample`] if the observed frequencies sum to zero
///
/// # Examples
///
/// ```
/// use u_simulation::goodness::ks;
///
/// let r = ks(&[10, 20, 30], &[10.0, 20.0, 30.0]).unwrap();
/// assert_eq!(r.computed, 0.0);
/// assert_eq!(r.sample_count, 60);
/// assert!(r.critical > 0.0);
/// ```
pub fn ks(observed: &[u64], expected: &[f64]) -> Result<KsResult> {
    if observed.len() != expected.len() {
        return Err(SimulationError::LengthMismatch {
            observed: observed.len(),
            expected: expected.len(),
        });
    }

    let n: u64 = observed.iter().sum();
    if n == 0 {
        return Err(SimulationError::EmptySample);
    }
    let nf = n as f64;

    let mut cum_observed = 0.0;
    let mut cum_expected = 0.0;
    let mut computed = 0.0_f64;
    for (&o, &e) in observed.iter().zip(expected) {
        cum_observed += o as f64 / nf;
        cum_expected += e / nf;
        computed = computed.max((cum_observed - cum_expected).abs());
    }

    let critical = kolmogorov_quantile(CONFIDENCE_LEVEL, n).ok_or(SimulationError::EmptySample)?;

    Ok(KsResult {
        confidence_level: CONFIDENCE_LEVEL,
        sample_count: n,
        computed,
        critical,
    })
}
