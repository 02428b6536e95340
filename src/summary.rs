//! Descriptive statistics of a generated sample.
//!
//! # Examples
//!
//! ```
//! use u_simulation::generator::Sample;
//! use u_simulation::summary::summarize;
//!
//! let s = summarize(&Sample::Continuous(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])).unwrap();
//! assert_eq!(s.count, 8);
//! assert!((s.mean - 5.0).abs() < 1e-12);
//! assert!((s.variance - 32.0 / 7.0).abs() < 1e-12);
//! ```

use u_numflow::stats;

use crate::error::{Result, SimulationError};
use crate::generator::Sample;

/// Summary of a sample, computed once and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStatistics {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample variance (divisor n − 1). NaN when `count == 1`.
    pub variance: f64,
    /// Square root of `variance`.
    pub std_dev: f64,
}

/// Computes count, mean, sample variance and standard deviation.
///
/// # Errors
///
/// [`SimulationError::EmptySample`] for an empty sample,
/// [`SimulationError::NonFiniteValue`] if an observation is NaN or infinite.
pub fn summarize(sample: &Sample) -> Result<SampleStatistics> {
    let data = sample.to_f64();
    summarize_values(&data)
}

/// [`summarize`] over raw values.
pub fn summarize_values(data: &[f64]) -> Result<SampleStatistics> {
    if data.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(SimulationError::NonFiniteValue { index });
    }

    let mean = stats::mean(data).ok_or(SimulationError::EmptySample)?;
    // Undefined for a single observation.
    let variance = stats::variance(data).unwrap_or(f64::NAN);

    Ok(SampleStatistics {
        count: data.len(),
        mean,
        variance,
        std_dev: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_basic() {
        let s = summarize_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert!((s.variance - 2.5).abs() < 1e-12);
        assert!((s.std_dev - 2.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summary_discrete() {
        let s = summarize(&Sample::Discrete(vec![0, 2, 4])).unwrap();
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert!((s.variance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn summary_single_observation() {
        let s = summarize_values(&[3.5]).unwrap();
        assert_eq!(s.count, 1);
        assert!((s.mean - 3.5).abs() < 1e-12);
        assert!(s.variance.is_nan());
        assert!(s.std_dev.is_nan());
    }

    #[test]
    fn summary_edge_cases() {
        assert_eq!(
            summarize(&Sample::Continuous(vec![])),
            Err(SimulationError::EmptySample)
        );
        assert_eq!(
            summarize_values(&[1.0, f64::NAN]),
            Err(SimulationError::NonFiniteValue { index: 1 })
        );
    }
}
