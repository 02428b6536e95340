//! Chi-squared goodness-of-fit test with minimum-expected-frequency merging.
//!
//! # Algorithm
//!
//! 1. Merge adjacent bins left to right until each merged bin expects ≥ 5
//!    observations ([`merge_bins`]).
//! 2. χ² = Σ (Oᵢ − Eᵢ)² / Eᵢ over the merged bins.
//! 3. df = merged bins − 1 − (parameters estimated from the sample).
//! 4. Critical value = 95th percentile of χ²(df), when df > 0.
//!
//! # Reference
//!
//! Cochran, W.G. (1954). "Some methods for strengthening the common χ² tests".
//! *Biometrics* 10(4), 417–451.

use crate::distribution::DistributionKind;
use crate::error::{Result, SimulationError};

use super::critical::chi_squared_quantile;
use super::CONFIDENCE_LEVEL;

/// Minimum expected frequency of a merged bin.
pub const MIN_EXPECTED: f64 = 5.0;

/// Outcome of a Chi-squared goodness-of-fit test.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquaredResult {
    /// Confidence level of the critical value (0.95).
    pub confidence_level: f64,
    /// Merged bins − 1 − estimated parameters. May be zero or negative.
    pub degrees_of_freedom: i64,
    /// Computed χ² statistic.
    pub computed: f64,
    /// Tabulated χ² at `confidence_level`. `None` when df ≤ 0: too few merged
    /// bins remain to run the test.
    pub critical: Option<f64>,
    /// Observed frequencies after merging.
    pub merged_observed: Vec<u64>,
    /// Expected frequencies after merging.
    pub merged_expected: Vec<f64>,
}

impl ChiSquaredResult {
    /// Whether enough merged bins remain for the test to be meaningful.
    pub fn is_testable(&self) -> bool {
        self.degrees_of_freedom > 0
    }

    /// Number of bins after merging.
    pub fn merged_bins(&self) -> usize {
        self.merged_expected.len()
    }
}

/// Merges adjacent bins until each expects at least [`MIN_EXPECTED`].
///
/// Bins are accumulated in order; a merged bin is closed as soon as its
/// expected sum reaches 5. A trailing remainder is folded into the last
/// merged bin. If no bin ever reaches 5, the whole table becomes a single bin.
///
/// Inputs are assumed to have equal length; extra entries of the longer
/// slice are ignored.
///
/// # Examples
///
/// ```
/// use u_simulation::goodness::merge_bins;
///
/// let (o, e) = merge_bins(&[1, 2, 6, 3, 1], &[2.0, 3.5, 6.0, 4.0, 0.5]);
/// // [1+2] closes at 5.5, [6] at 6.0, the [3+1] remainder joins the last bin
/// assert_eq!(o, vec![3, 10]);
/// assert_eq!(e, vec![5.5, 10.5]);
/// ```
pub fn merge_bins(observed: &[u64], expected: &[f64]) -> (Vec<u64>, Vec<f64>) {
    let mut merged_observed = Vec::new();
    let mut merged_expected = Vec::new();
    let mut acc_observed = 0_u64;
    let mut acc_expected = 0.0;

    for (&o, &e) in observed.iter().zip(expected) {
        acc_observed += o;
        acc_expected += e;
        if acc_expected >= MIN_EXPECTED {
            merged_observed.push(acc_observed);
            merged_expected.push(acc_expected);
            acc_observed = 0;
            acc_expected = 0.0;
        }
    }

    match (merged_observed.last_mut(), merged_expected.last_mut()) {
        (Some(last_o), Some(last_e)) => {
            if acc_observed > 0 || acc_expected > 0.0 {
                *last_o += acc_observed;
                *last_e += acc_expected;
            }
        }
        _ => {
            merged_observed.push(acc_observed);
            merged_expected.push(acc_expected);
        }
    }

    (merged_observed, merged_expected)
}

/// Chi-squared goodness-of-fit test of `observed` against `expected`.
///
/// `kind` determines how many parameters were estimated from the sample
/// (see [`DistributionKind::estimated_parameters`]).
///
/// # Errors
///
/// - [`SimulationError::LengthMismatch`] if the slices differ in length
/// - [`SimulationError::EmptySample`] if they are empty
/// - [`SimulationError::InvalidFrequency`] for a negative or non-finite expected value
/// - [`SimulationError::ZeroExpected`] if a merged bin expects nothing while
///   degrees of freedom are positive
///
/// With degrees of freedom ≤ 0 the result is still returned, with
/// `critical: None`. A zero-expected bin holding observations then makes
/// `computed` infinite.
///
/// # Examples
///
/// ```
/// use u_simulation::distribution::DistributionKind;
/// use u_simulation::goodness::chi_squared;
///
/// let observed = [98, 105, 97, 100];
/// let expected = [100.0; 4];
/// let r = chi_squared(&observed, &expected, DistributionKind::Uniform).unwrap();
/// assert_eq!(r.degrees_of_freedom, 3);
/// assert!(r.computed < r.critical.unwrap());
/// ```
pub fn chi_squared(
    observed: &[u64],
    expected: &[f64],
    kind: DistributionKind,
) -> Result<ChiSquaredResult> {
    if observed.len() != expected.len() {
        return Err(SimulationError::LengthMismatch {
            observed: observed.len(),
            expected: expected.len(),
        });
    }
    if observed.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if let Some(index) = expected.iter().position(|e| !(e.is_finite() && *e >= 0.0)) {
        return Err(SimulationError::InvalidFrequency { index });
    }

    let (merged_observed, merged_expected) = merge_bins(observed, expected);
    let degrees_of_freedom = merged_expected.len() as i64 - 1 - kind.estimated_parameters();
    if degrees_of_freedom > 0 {
        if let Some(bin) = merged_expected.iter().position(|&e| e <= 0.0) {
            return Err(SimulationError::ZeroExpected { bin });
        }
    }

    // A zero-expected bin only survives when df <= 0; it contributes +inf
    // if anything was observed in it.
    let computed = merged_observed
        .iter()
        .zip(&merged_expected)
        .map(|(&o, &e)| {
            if e > 0.0 {
                (o as f64 - e).powi(2) / e
            } else if o > 0 {
                f64::INFINITY
            } else {
                0.0
            }
        })
        .sum();

    let critical = if degrees_of_freedom > 0 {
        chi_squared_quantile(CONFIDENCE_LEVEL, degrees_of_freedom as f64)
    } else {
        None
    };

    Ok(ChiSquaredResult {
        confidence_level: CONFIDENCE_LEVEL,
        degrees_of_freedom,
        computed,
        critical,
        merged_observed,
        merged_expected,
    })
}

/// [`chi_squared`] with the distribution given as a tag (`U`, `N`, `EN`, `P`
/// or a name).
///
/// # Errors
///
/// [`SimulationError::InvalidDistribution`] for an unknown tag, otherwise as
/// [`chi_squared`].
pub fn chi_squared_tagged(
    observed: &[u64],
    expected: &[f64],
    tag: &str,
) -> Result<ChiSquaredResult> {
    let kind: DistributionKind = tag.parse()?;
    chi_squared(observed, expected, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_no_merge_needed() {
        let (o, e) = merge_bins(&[10, 12, 8], &[10.0, 10.0, 10.0]);
        assert_eq!(o, vec![10, 12, 8]);
        assert_eq!(e, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn merge_leading_small_bins() {
        let (o, e) = merge_bins(&[1, 1, 3, 9], &[1.0, 1.5, 3.0, 9.0]);
        assert_eq!(o, vec![5, 9]);
        assert_eq!(e, vec![5.5, 9.0]);
    }

    #[test]
    fn merge_trailing_remainder_folded() {
        let (o, e) = merge_bins(&[7, 6, 2, 1], &[6.0, 6.0, 2.0, 1.0]);
        assert_eq!(o, vec![7, 9]);
        assert_eq!(e, vec![6.0, 9.0]);
    }

    #[test]
    fn merge_remainder_with_only_observed() {
        // Remainder has expected 0 but observed > 0: still folded.
        let (o, e) = merge_bins(&[5, 2], &[5.0, 0.0]);
        assert_eq!(o, vec![7]);
        assert_eq!(e, vec![5.0]);
    }

    #[test]
    fn merge_all_small_single_bin() {
        let (o, e) = merge_bins(&[1, 0, 2], &[1.0, 1.0, 1.0]);
        assert_eq!(o, vec![3]);
        assert_eq!(e, vec![3.0]);
    }

    #[test]
    fn chi_squared_basic() {
        let observed = [12, 8, 10, 10];
        let expected = [10.0; 4];
        let r = chi_squared(&observed, &expected, DistributionKind::Uniform).unwrap();
        // (4 + 4 + 0 + 0) / 10
        assert!((r.computed - 0.8).abs() < 1e-12);
        assert_eq!(r.degrees_of_freedom, 3);
        assert!((r.critical.unwrap() - 7.815).abs() < 1e-2);
        assert!(r.is_testable());
        assert_eq!(r.confidence_level, 0.95);
        assert_eq!(r.merged_bins(), 4);
    }

    #[test]
    fn chi_squared_df_per_distribution() {
        let observed = [10; 6];
        let expected = [10.0; 6];
        let cases = [
            (DistributionKind::Uniform, 5),
            (DistributionKind::NegExponential, 4),
            (DistributionKind::Poisson, 4),
            (DistributionKind::Normal, 3),
        ];
        for (kind, df) in cases {
            let r = chi_squared(&observed, &expected, kind).unwrap();
            assert_eq!(r.degrees_of_freedom, df, "{kind}");
            assert_eq!(r.computed, 0.0);
        }
    }

    #[test]
    fn chi_squared_insufficient_bins_reported() {
        // Everything merges into two bins; Normal estimates two parameters.
        let r = chi_squared(&[3, 4, 3, 4], &[3.0, 3.0, 3.0, 3.0], DistributionKind::Normal)
            .unwrap();
        assert_eq!(r.merged_bins(), 2);
        assert_eq!(r.degrees_of_freedom, -1);
        assert!(r.critical.is_none());
        assert!(!r.is_testable());
    }

    #[test]
    fn chi_squared_single_bin_uniform() {
        let r = chi_squared(&[2, 1], &[1.5, 1.5], DistributionKind::Uniform).unwrap();
        assert_eq!(r.degrees_of_freedom, 0);
        assert!(r.critical.is_none());
    }

    #[test]
    fn chi_squared_deterministic() {
        let o = [3, 9, 14, 20, 15, 8, 2];
        let e = [2.5, 8.0, 15.5, 19.0, 14.5, 9.0, 2.5];
        let a = chi_squared(&o, &e, DistributionKind::Normal).unwrap();
        let b = chi_squared(&o, &e, DistributionKind::Normal).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn chi_squared_edge_cases() {
        assert_eq!(
            chi_squared(&[1, 2], &[1.0], DistributionKind::Uniform),
            Err(SimulationError::LengthMismatch {
                observed: 2,
                expected: 1
            })
        );
        assert_eq!(
            chi_squared(&[], &[], DistributionKind::Uniform),
            Err(SimulationError::EmptySample)
        );
        assert_eq!(
            chi_squared(&[1, 2], &[1.0, -1.0], DistributionKind::Uniform),
            Err(SimulationError::InvalidFrequency { index: 1 })
        );
    }

    #[test]
    fn chi_squared_zero_expected_single_bin_reported() {
        let r = chi_squared(&[1, 2], &[0.0, 0.0], DistributionKind::Uniform).unwrap();
        assert_eq!(r.degrees_of_freedom, 0);
        assert_eq!(r.critical, None);
        assert!(!r.is_testable());
        assert_eq!(r.computed, f64::INFINITY);

        let r = chi_squared(&[2], &[0.0], DistributionKind::Poisson).unwrap();
        assert_eq!(r.degrees_of_freedom, -1);
        assert_eq!(r.merged_expected, vec![0.0]);
        assert_eq!(r.computed, f64::INFINITY);

        let r = chi_squared(&[0], &[0.0], DistributionKind::Uniform).unwrap();
        assert_eq!(r.computed, 0.0);
    }

    #[test]
    fn chi_squared_tag_parsing() {
        let r = chi_squared_tagged(&[10, 10], &[10.0, 10.0], "U").unwrap();
        assert_eq!(r.degrees_of_freedom, 1);
        assert!(matches!(
            chi_squared_tagged(&[10, 10], &[10.0, 10.0], "Z"),
            Err(SimulationError::InvalidDistribution { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn merged_bins_meet_minimum(
            pairs in proptest::collection::vec((0_u64..50, 0.0_f64..20.0), 1..=40),
        ) {
            let observed: Vec<u64> = pairs.iter().map(|p| p.0).collect();
            let expected: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let (mo, me) = merge_bins(&observed, &expected);

            prop_assert!(me.len() <= expected.len());
            prop_assert_eq!(mo.len(), me.len());
            prop_assert_eq!(mo.iter().sum::<u64>(), observed.iter().sum::<u64>());
            let total_e: f64 = expected.iter().sum();
            prop_assert!((me.iter().sum::<f64>() - total_e).abs() < 1e-9 * total_e.max(1.0));
            if me.len() > 1 || me[0] >= MIN_EXPECTED {
                for &e in &me {
                    prop_assert!(e >= MIN_EXPECTED, "merged expected {e}");
                }
            }
        }

        #[test]
        fn no_merge_gives_k_minus_one_df(
            observed in proptest::collection::vec(0_u64..100, 2..=30),
            e in 5.0_f64..100.0,
        ) {
            let expected = vec![e; observed.len()];
            let r = chi_squared(&observed, &expected, DistributionKind::Uniform).unwrap();
            prop_assert_eq!(r.degrees_of_freedom, observed.len() as i64 - 1);
            prop_assert!(r.computed >= 0.0);
        }
    }
}
