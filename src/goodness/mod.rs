//! Goodness-of-fit tests on observed vs expected frequencies.
//!
//! # Tests
//!
//! - [`chi_squared`] — Pearson Chi-squared with adjacent-bin merging so every
//!   merged bin expects at least [`MIN_EXPECTED`] observations
//! - [`ks`] — Kolmogorov–Smirnov on cumulative proportions
//!
//! # Critical Values
//!
//! Both tests report a critical value at [`CONFIDENCE_LEVEL`]. The functions
//! computing them live in [`critical`].
//!
//! # References
//!
//! - Pearson, K. (1900). "On the criterion that a given system of deviations...",
//!   *Philosophical Magazine* 50(302), pp. 157-175.
//! - Marsaglia, G., Tsang, W.W. & Wang, J. (2003). "Evaluating Kolmogorov's
//!   Distribution", *Journal of Statistical Software* 8(18).
//! - Simard, R. & L'Ecuyer, P. (2011). "Computing the Two-Sided
//!   Kolmogorov-Smirnov Distribution", *Journal of Statistical Software* 39(11).

mod chi_squared;
pub mod critical;
mod kolmogorov_smirnov;

/// Confidence level used for every reported critical value.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

pub use chi_squared::{chi_squared, chi_squared_tagged, merge_bins, ChiSquaredResult, MIN_EXPECTED};
pub use kolmogorov_smirnov::{ks, KsResult};
