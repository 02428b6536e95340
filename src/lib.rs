//! # u-simulation
//!
//! Pseudo-random sampling from Uniform, Normal, Negative-Exponential and
//! Poisson distributions, with frequency tables and goodness-of-fit testing.
//!
//! A sample is binned into a frequency table, expected frequencies are
//! derived from parameters estimated on the sample itself, and the fit is
//! judged with Chi-squared and Kolmogorov–Smirnov tests at the 95% level.
//!
//! ## Modules
//!
//! - [`distribution`] — Distribution kinds (`U`, `N`, `EN`, `P`) and their parameters
//! - [`generator`] — Seeded samplers (inversion, Box–Muller, Knuth's Poisson)
//! - [`summary`] — Sample count, mean, variance and standard deviation
//! - [`binning`] — Equal-width interval tables and per-value tables
//! - [`expected`] — Expected frequencies under the fitted distribution
//! - [`goodness`] — Chi-squared (with bin merging) and Kolmogorov–Smirnov tests
//! - [`simulation`] — Configuration and the one-call pipeline
//! - [`error`] — Error type shared by every module
//!
//! ## Design Philosophy
//!
//! - **Reproducible**: every sampler takes an explicit generator; seeded runs repeat exactly
//! - **Numerical stability**: Leverages `u-numflow` for statistics and special functions
//! - **Research-backed**: Critical values follow published algorithms

pub mod binning;
pub mod distribution;
pub mod error;
pub mod expected;
pub mod generator;
pub mod goodness;
pub mod simulation;
pub mod summary;

pub use error::{Result, SimulationError};
