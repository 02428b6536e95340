//! Error types for u-simulation.

use std::fmt;

/// All errors produced by u-simulation operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A distribution parameter or the sample size is out of range.
    InvalidParameter { name: &'static str, reason: String },
    /// The requested number of histogram intervals is zero.
    InvalidBinCount { bins: usize },
    /// The sample (or frequency vector) contains no observations.
    EmptySample,
    /// An observation is NaN or infinite.
    NonFiniteValue { index: usize },
    /// The distribution tag is unknown, or does not match the table it is applied to.
    InvalidDistribution { tag: String },
    /// Observed and expected frequency vectors differ in length.
    LengthMismatch { observed: usize, expected: usize },
    /// An expected frequency is negative or non-finite.
    InvalidFrequency { index: usize },
    /// A merged Chi-squared bin has zero expected frequency.
    ZeroExpected { bin: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::InvalidBinCount { bins } => {
                write!(f, "need at least 1 interval, got {bins}")
            }
            Self::EmptySample => write!(f, "sample is empty"),
            Self::NonFiniteValue { index } => {
                write!(f, "observation {index} is not finite")
            }
            Self::InvalidDistribution { tag } => {
                write!(f, "invalid distribution '{tag}'")
            }
            Self::LengthMismatch { observed, expected } => {
                write!(
                    f,
                    "observed has {observed} frequencies but expected has {expected}"
                )
            }
            Self::InvalidFrequency { index } => {
                write!(f, "expected frequency {index} is negative or not finite")
            }
            Self::ZeroExpected { bin } => {
                write!(f, "merged bin {bin} has zero expected frequency")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

impl SimulationError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
