//! Expected frequencies under the theoretical distribution.
//!
//! For each row of a [`FrequencyTable`], computes the count predicted by the
//! distribution with parameters either estimated from the sample
//! ([`expected_frequencies`]) or supplied by the caller
//! ([`expected_frequencies_with`]).
//!
//! # Formulas (n = table total)
//!
//! | Distribution | Expected frequency of row i |
//! |---|---|
//! | Uniform | n / k |
//! | Normal | n · φ(markᵢ; μ, σ) · (upperᵢ − lowerᵢ) (midpoint rule) |
//! | Negative exponential | n · (e^(−λ·lowerᵢ) − e^(−λ·upperᵢ)), λ = 1 / x̄ |
//! | Poisson | round(n · λ^v e^(−λ) / v!), λ = x̄ |
//!
//! # Examples
//!
//! ```
//! use u_simulation::binning::{bin_discrete, FrequencyTable};
//! use u_simulation::distribution::Parameters;
//! use u_simulation::expected::expected_frequencies_with;
//!
//! let table = FrequencyTable::Values(bin_discrete(&[0, 1, 1, 2, 3]).unwrap());
//! let e = expected_frequencies_with(&table, &Parameters::Poisson { lambda: 1.0 }).unwrap();
//! assert_eq!(e.expected.len(), 4);
//! assert_eq!(e.expected[0], 2.0); // round(5 · e^-1) = round(1.84)
//! ```

use std::f64::consts::PI;

use u_numflow::special;

use crate::binning::{FrequencyTable, IntervalTable, ValueTable};
use crate::distribution::{DistributionKind, Parameters};
use crate::error::{Result, SimulationError};
use crate::summary::SampleStatistics;

/// Expected frequencies aligned index-for-index with an observed table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedTable {
    /// Expected frequency of each row.
    pub expected: Vec<f64>,
}

impl ExpectedTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.expected.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Sum of expected frequencies. Close to, but not necessarily equal to, n.
    pub fn total(&self) -> f64 {
        self.expected.iter().sum()
    }
}

/// Normal probability density function.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

/// Poisson probability mass function, evaluated in log space.
pub fn poisson_pmf(v: u64, lambda: f64) -> f64 {
    if lambda == 0.0 {
        return if v == 0 { 1.0 } else { 0.0 };
    }
    let vf = v as f64;
    (vf * lambda.ln() - lambda - special::ln_gamma(vf + 1.0)).exp()
}

/// Sample-based parameter estimates for `kind`.
///
/// Uniform has no estimated parameters, so `None` is returned for it.
///
/// # Errors
///
/// [`SimulationError::InvalidParameter`] if the estimate violates the
/// distribution's invariants (e.g. zero standard deviation).
pub fn estimate_parameters(
    kind: DistributionKind,
    stats: &SampleStatistics,
) -> Result<Option<Parameters>> {
    let params = match kind {
        DistributionKind::Uniform => return Ok(None),
        DistributionKind::Normal => {
            let p = Parameters::Normal {
                mean: stats.mean,
                std_dev: stats.std_dev,
            };
            p.validate()?;
            p
        }
        DistributionKind::NegExponential => {
            if !(stats.mean.is_finite() && stats.mean > 0.0) {
                return Err(SimulationError::invalid_parameter(
                    "mean",
                    format!("sample mean must be positive to estimate λ, got {}", stats.mean),
                ));
            }
            let p = Parameters::NegExponential {
                lambda: 1.0 / stats.mean,
            };
            p.validate()?;
            p
        }
        // λ = 0 (all-zero sample) is a legal estimate here: all mass on 0.
        DistributionKind::Poisson => {
            if !(stats.mean.is_finite() && stats.mean >= 0.0) {
                return Err(SimulationError::invalid_parameter(
                    "mean",
                    format!("sample mean must be non-negative, got {}", stats.mean),
                ));
            }
            Parameters::Poisson { lambda: stats.mean }
        }
    };
    Ok(Some(params))
}

/// Expected frequencies using parameters estimated from `stats`.
///
/// # Errors
///
/// - [`SimulationError::InvalidDistribution`] if `kind` does not match the
///   table (Poisson needs a value table, the others an interval table)
/// - [`SimulationError::InvalidParameter`] if an estimate is unusable
pub fn expected_frequencies(
    table: &FrequencyTable,
    kind: DistributionKind,
    stats: &SampleStatistics,
) -> Result<ExpectedTable> {
    check_table(table, kind)?;
    match estimate_parameters(kind, stats)? {
        None => Ok(uniform_expected(table)),
        Some(params) => compute(table, &params),
    }
}

/// Expected frequencies using caller-supplied parameters.
///
/// Uniform bounds do not affect the result: every interval expects n / k.
///
/// # Errors
///
/// Same as [`expected_frequencies`], plus invalid supplied parameters.
pub fn expected_frequencies_with(
    table: &FrequencyTable,
    params: &Parameters,
) -> Result<ExpectedTable> {
    check_table(table, params.kind())?;
    params.validate()?;
    compute(table, params)
}

fn check_table(table: &FrequencyTable, kind: DistributionKind) -> Result<()> {
    let matches = match table {
        FrequencyTable::Intervals(_) => !kind.is_discrete(),
        FrequencyTable::Values(_) => kind.is_discrete(),
    };
    if matches {
        Ok(())
    } else {
        let shape = match table {
            FrequencyTable::Intervals(_) => "interval",
            FrequencyTable::Values(_) => "value",
        };
        Err(SimulationError::InvalidDistribution {
            tag: format!("{} on a {shape} table", kind.tag()),
        })
    }
}

fn compute(table: &FrequencyTable, params: &Parameters) -> Result<ExpectedTable> {
    let expected = match (table, *params) {
        (FrequencyTable::Intervals(_), Parameters::Uniform { .. }) => {
            return Ok(uniform_expected(table))
        }
        (FrequencyTable::Intervals(t), Parameters::Normal { mean, std_dev }) => {
            normal_expected(t, mean, std_dev)
        }
        (FrequencyTable::Intervals(t), Parameters::NegExponential { lambda }) => {
            neg_exponential_expected(t, lambda)
        }
        (FrequencyTable::Values(t), Parameters::Poisson { lambda }) => poisson_expected(t, lambda),
        _ => {
            return Err(SimulationError::InvalidDistribution {
                tag: params.kind().tag().to_string(),
            })
        }
    };
    Ok(ExpectedTable { expected })
}

fn uniform_expected(table: &FrequencyTable) -> ExpectedTable {
    let k = table.len();
    let n = table.total() as f64;
    ExpectedTable {
        expected: vec![n / k as f64; k],
    }
}

fn normal_expected(t: &IntervalTable, mean: f64, std_dev: f64) -> Vec<f64> {
    let n = t.total() as f64;
    t.mark
        .iter()
        .zip(t.lower.iter().zip(&t.upper))
        .map(|(&mark, (&lo, &hi))| n * normal_pdf(mark, mean, std_dev) * (hi - lo))
        .collect()
}

fn neg_exponential_expected(t: &IntervalTable, lambda: f64) -> Vec<f64> {
    let n = t.total() as f64;
    t.lower
        .iter()
        .zip(&t.upper)
        .map(|(&lo, &hi)| n * ((-lambda * lo).exp() - (-lambda * hi).exp()))
        .collect()
}

fn poisson_expected(t: &ValueTable, lambda: f64) -> Vec<f64> {
    let n = t.total() as f64;
    t.values
        .iter()
        .map(|&v| (n * poisson_pmf(v, lambda)).round())
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::binning::bin_continuous;
    use crate::summary::summarize_values;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn uniform_expected_sums_to_n(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=200),
            k in 1_usize..=25,
        ) {
            let table = FrequencyTable::Intervals(bin_continuous(&data, k).unwrap());
            let stats = summarize_values(&data).unwrap();
            let e = expected_frequencies(&table, DistributionKind::Uniform, &stats).unwrap();
            let n = data.len() as f64;
            for &v in &e.expected {
                prop_assert!((v - n / k as f64).abs() < 1e-9);
            }
            prop_assert!((e.total() - n).abs() < 1e-9 * n.max(1.0));
        }

        #[test]
        fn neg_exponential_expected_non_negative(
            data in proptest::collection::vec(0.001_f64..50.0, 2..=100),
            k in 1_usize..=20,
        ) {
            let table = FrequencyTable::Intervals(bin_continuous(&data, k).unwrap());
            let stats = summarize_values(&data).unwrap();
            let e = expected_frequencies(&table, DistributionKind::NegExponential, &stats).unwrap();
            for &v in &e.expected {
                prop_assert!(v >= 0.0 && v.is_finite(), "v = {v}");
            }
        }
    }
}
