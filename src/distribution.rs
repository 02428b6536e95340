//! Distribution kinds and their parameters.
//!
//! The simulator supports a closed set of four distributions. Each one is
//! identified by a [`DistributionKind`] and parameterized by a matching
//! [`Parameters`] variant.
//!
//! # Examples
//!
//! ```
//! use u_simulation::distribution::{DistributionKind, Parameters};
//!
//! let kind: DistributionKind = "EN".parse().unwrap();
//! assert_eq!(kind, DistributionKind::NegExponential);
//! assert_eq!(kind.estimated_parameters(), 1);
//!
//! let params = Parameters::default_for(DistributionKind::Normal);
//! assert_eq!(params, Parameters::Normal { mean: 0.0, std_dev: 1.0 });
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimulationError};

/// Closed set of distributions the simulator can sample and test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    /// Continuous uniform on [low, high].
    Uniform,
    /// Normal (Gaussian) with mean and standard deviation.
    Normal,
    /// Negative exponential with rate λ.
    NegExponential,
    /// Poisson with mean λ (discrete support).
    Poisson,
}

impl DistributionKind {
    /// All supported kinds, in front-end order.
    pub const ALL: [DistributionKind; 4] = [
        DistributionKind::Normal,
        DistributionKind::Uniform,
        DistributionKind::NegExponential,
        DistributionKind::Poisson,
    ];

    /// Number of parameters estimated from the sample when computing
    /// expected frequencies. Subtracted from the Chi-squared degrees of freedom.
    pub fn estimated_parameters(self) -> i64 {
        match self {
            Self::Uniform => 0,
            Self::NegExponential => 1,
            Self::Poisson => 1,
            Self::Normal => 2,
        }
    }

    /// Whether the distribution has integer support.
    pub fn is_discrete(self) -> bool {
        matches!(self, Self::Poisson)
    }

    /// Short tag: `U`, `N`, `EN` or `P`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Uniform => "U",
            Self::Normal => "N",
            Self::NegExponential => "EN",
            Self::Poisson => "P",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Normal => "Normal",
            Self::NegExponential => "Negative exponential",
            Self::Poisson => "Poisson",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = SimulationError;

    /// Accepts the short tags (`U`, `N`, `EN`, `P`) and English names,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "u" | "uniform" => Ok(Self::Uniform),
            "n" | "normal" | "gaussian" => Ok(Self::Normal),
            "en" | "exponential" | "negexponential" | "neg_exponential"
            | "negative exponential" => Ok(Self::NegExponential),
            "p" | "poisson" => Ok(Self::Poisson),
            _ => Err(SimulationError::InvalidDistribution { tag: s.to_string() }),
        }
    }
}

/// Distribution parameters, one variant per [`DistributionKind`].
///
/// # Invariants (checked by [`Parameters::validate`])
///
/// - All values are finite
/// - `std_dev > 0`, `lambda > 0`
/// - Poisson: `exp(-lambda) > 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameters {
    /// Uniform on [low, high]. Bounds given in reverse order are swapped.
    Uniform { low: f64, high: f64 },
    /// Normal with the given mean and standard deviation.
    Normal { mean: f64, std_dev: f64 },
    /// Negative exponential with rate `lambda`.
    NegExponential { lambda: f64 },
    /// Poisson with mean `lambda`.
    Poisson { lambda: f64 },
}

impl Parameters {
    /// Default parameters for each distribution: U(0, 1), N(0, 1), λ = 5.
    pub fn default_for(kind: DistributionKind) -> Self {
        match kind {
            DistributionKind::Uniform => Self::Uniform {
                low: 0.0,
                high: 1.0,
            },
            DistributionKind::Normal => Self::Normal {
                mean: 0.0,
                std_dev: 1.0,
            },
            DistributionKind::NegExponential => Self::NegExponential { lambda: 5.0 },
            DistributionKind::Poisson => Self::Poisson { lambda: 5.0 },
        }
    }

    /// The distribution these parameters belong to.
    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Uniform { .. } => DistributionKind::Uniform,
            Self::Normal { .. } => DistributionKind::Normal,
            Self::NegExponential { .. } => DistributionKind::NegExponential,
            Self::Poisson { .. } => DistributionKind::Poisson,
        }
    }

    /// Returns a copy with uniform bounds ordered so that `low <= high`.
    pub fn normalized(self) -> Self {
        match self {
            Self::Uniform { low, high } if low > high => Self::Uniform {
                low: high,
                high: low,
            },
            other => other,
        }
    }

    /// Checks the parameter invariants.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Uniform { low, high } => {
                finite("low", low)?;
                finite("high", high)?;
            }
            Self::Normal { mean, std_dev } => {
                finite("mean", mean)?;
                positive("std_dev", std_dev)?;
            }
            Self::NegExponential { lambda } => positive("lambda", lambda)?,
            Self::Poisson { lambda } => {
                positive("lambda", lambda)?;
                if (-lambda).exp() <= 0.0 {
                    return Err(SimulationError::invalid_parameter(
                        "lambda",
                        format!("exp(-{lambda}) underflows, the sampler cannot terminate"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid_parameter(
            name,
            format!("must be finite, got {value}"),
        ))
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid_parameter(
            name,
            format!("must be positive, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_and_names() {
        assert_eq!("U".parse::<DistributionKind>(), Ok(DistributionKind::Uniform));
        assert_eq!("n".parse::<DistributionKind>(), Ok(DistributionKind::Normal));
        assert_eq!(
            "EN".parse::<DistributionKind>(),
            Ok(DistributionKind::NegExponential)
        );
        assert_eq!(
            " Poisson ".parse::<DistributionKind>(),
            Ok(DistributionKind::Poisson)
        );
        assert_eq!(
            "Exponential".parse::<DistributionKind>(),
            Ok(DistributionKind::NegExponential)
        );
    }

    #[test]
    fn parse_unknown_tag() {
        let err = "X".parse::<DistributionKind>().unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidDistribution {
                tag: "X".to_string()
            }
        );
    }

    #[test]
    fn tag_round_trip() {
        for kind in DistributionKind::ALL {
            assert_eq!(kind.tag().parse::<DistributionKind>(), Ok(kind));
        }
    }

    #[test]
    fn estimated_parameter_counts() {
        assert_eq!(DistributionKind::Uniform.estimated_parameters(), 0);
        assert_eq!(DistributionKind::NegExponential.estimated_parameters(), 1);
        assert_eq!(DistributionKind::Poisson.estimated_parameters(), 1);
        assert_eq!(DistributionKind::Normal.estimated_parameters(), 2);
    }

    #[test]
    fn only_poisson_is_discrete() {
        for kind in DistributionKind::ALL {
            assert_eq!(kind.is_discrete(), kind == DistributionKind::Poisson);
        }
    }

    #[test]
    fn defaults_are_valid() {
        for kind in DistributionKind::ALL {
            let p = Parameters::default_for(kind);
            assert_eq!(p.kind(), kind);
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn normalized_swaps_uniform_bounds() {
        let p = Parameters::Uniform {
            low: 3.0,
            high: -1.0,
        }
        .normalized();
        assert_eq!(
            p,
            Parameters::Uniform {
                low: -1.0,
                high: 3.0
            }
        );

        let n = Parameters::Normal {
            mean: 1.0,
            std_dev: 2.0,
        };
        assert_eq!(n.normalized(), n);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(Parameters::Normal {
            mean: 0.0,
            std_dev: 0.0
        }
        .validate()
        .is_err());
        assert!(Parameters::Normal {
            mean: 0.0,
            std_dev: -1.0
        }
        .validate()
        .is_err());
        assert!(Parameters::NegExponential { lambda: 0.0 }.validate().is_err());
        assert!(Parameters::Poisson { lambda: -2.0 }.validate().is_err());
        assert!(Parameters::Poisson { lambda: 1e4 }.validate().is_err());
        assert!(Parameters::Uniform {
            low: f64::NAN,
            high: 1.0
        }
        .validate()
        .is_err());
        assert!(Parameters::NegExponential {
            lambda: f64::INFINITY
        }
        .validate()
        .is_err());
    }

    #[test]
    fn validate_error_names_parameter() {
        let params = Parameters::Normal {
            mean: 0.0,
            std_dev: -1.0,
        };
        match params.validate() {
            Err(SimulationError::InvalidParameter { name, .. }) => assert_eq!(name, "std_dev"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
