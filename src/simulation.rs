//! One-call simulation pipeline.
//!
//! Generates a sample, bins it, derives expected frequencies and runs both
//! goodness-of-fit tests:
//!
//! ```text
//! params ─► generate ─► summarize ─► bin_sample ─► expected_frequencies ─► chi_squared, ks
//! ```
//!
//! # Examples
//!
//! ```
//! use u_simulation::distribution::DistributionKind;
//! use u_simulation::simulation::{run, SimulationConfig};
//!
//! let config = SimulationConfig::for_kind(DistributionKind::Poisson)
//!     .sample_size(2000)
//!     .seed(Some(7));
//! let report = run(&config).unwrap();
//!
//! assert_eq!(report.sample.len(), 2000);
//! assert_eq!(report.table.total(), 2000);
//! assert_eq!(report.ks.sample_count, 2000);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::binning::{bin_sample, FrequencyTable};
use crate::distribution::{DistributionKind, Parameters};
use crate::error::{Result, SimulationError};
use crate::expected::{expected_frequencies, ExpectedTable};
use crate::generator::{generate, seeded_rng, Sample};
use crate::goodness::{chi_squared, ks, ChiSquaredResult, KsResult};
use crate::summary::{summarize, SampleStatistics};

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Distribution and its parameters.
    pub params: Parameters,
    /// Number of observations to draw. Default: 10000.
    pub sample_size: usize,
    /// Number of histogram intervals (continuous only). Default: 10.
    pub bins: usize,
    /// Random seed (None for an entropy-seeded run). Default: None.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a config for the given parameters with default settings.
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            sample_size: 10_000,
            bins: 10,
            seed: None,
        }
    }

    /// Creates a config using the default parameters of `kind`.
    pub fn for_kind(kind: DistributionKind) -> Self {
        Self::new(Parameters::default_for(kind))
    }

    /// Sets the sample size.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the number of histogram intervals.
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Checks sample size, interval count and parameters.
    ///
    /// The interval count is not checked for discrete distributions, which
    /// are tabulated by value.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size < 1 {
            return Err(SimulationError::invalid_parameter(
                "n",
                format!("sample size must be at least 1, got {}", self.sample_size),
            ));
        }
        if !self.params.kind().is_discrete() && self.bins < 1 {
            return Err(SimulationError::InvalidBinCount { bins: self.bins });
        }
        self.params.validate()
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Everything produced by one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Raw generated sample.
    pub sample: Sample,
    /// Count, mean, variance and standard deviation of `sample`.
    pub statistics: SampleStatistics,
    /// Observed frequency table.
    pub table: FrequencyTable,
    /// Expected frequencies, one per table row.
    pub expected: ExpectedTable,
    /// Chi-squared test on the merged bins.
    pub chi_squared: ChiSquaredResult,
    /// Kolmogorov–Smirnov test on the unmerged rows.
    pub ks: KsResult,
}

// ── Pipeline ──────────────────────────────────────────────────────────

/// Runs the pipeline, seeding ChaCha8 from `config.seed` or from the thread
/// RNG when no seed is set.
///
/// # Errors
///
/// Any error from [`SimulationConfig::validate`] or a pipeline stage.
pub fn run(config: &SimulationConfig) -> Result<SimulationReport> {
    let mut rng = match config.seed {
        Some(seed) => seeded_rng(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    run_with_rng(config, &mut rng)
}

/// Runs the pipeline drawing from a caller-supplied generator.
///
/// `config.seed` is ignored.
pub fn run_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationReport> {
    config.validate()?;
    let kind = config.params.kind();

    let sample = generate(rng, config.sample_size, config.params)?;
    let statistics = summarize(&sample)?;
    let table = bin_sample(&sample, config.bins)?;
    let expected = expected_frequencies(&table, kind, &statistics)?;
    let chi_squared = chi_squared(table.observed(), &expected.expected, kind)?;
    let ks = ks(table.observed(), &expected.expected)?;

    Ok(SimulationReport {
        sample,
        statistics,
        table,
        expected,
        chi_squared,
        ks,
    })
}
