//! Random variate generation.
//!
//! Each generator consumes independent U(0, 1) draws from a caller-supplied
//! [`rand::Rng`] and maps them through a fixed per-distribution formula.
//! Passing the generator in (instead of using a process-wide source) keeps
//! runs reproducible under a fixed seed.
//!
//! # Algorithms
//!
//! - Uniform: `a + U·(b − a)`
//! - Normal: Box–Muller, `z = √(−2 ln U₁)·cos(2π U₂)`. One pair yields one
//!   observation; the sine variate is discarded.
//! - Negative exponential: inversion, `−ln(1 − U) / λ`
//! - Poisson: Knuth's multiplication method, O(λ) draws per observation
//!
//! # Examples
//!
//! ```
//! use u_simulation::distribution::Parameters;
//! use u_simulation::generator::{generate, seeded_rng};
//!
//! let mut rng = seeded_rng(7);
//! let sample = generate(&mut rng, 100, Parameters::Uniform { low: 2.0, high: 4.0 }).unwrap();
//! assert_eq!(sample.len(), 100);
//! assert!(sample.as_continuous().unwrap().iter().all(|&x| (2.0..=4.0).contains(&x)));
//! ```
//!
//! # Reference
//!
//! Knuth, D.E. (1997). *The Art of Computer Programming, Vol. 2*, 3rd ed., §3.4.1.

use std::f64::consts::PI;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::distribution::Parameters;
use crate::error::{Result, SimulationError};

/// An ordered sequence of observations.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Real-valued observations (uniform, normal, negative exponential).
    Continuous(Vec<f64>),
    /// Integer observations (Poisson).
    Discrete(Vec<u64>),
}

impl Sample {
    /// Number of observations.
    pub fn len(&self) -> usize {
        match self {
            Self::Continuous(v) => v.len(),
            Self::Discrete(v) => v.len(),
        }
    }

    /// Whether the sample has no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The observations of a continuous sample.
    pub fn as_continuous(&self) -> Option<&[f64]> {
        match self {
            Self::Continuous(v) => Some(v),
            Self::Discrete(_) => None,
        }
    }

    /// The observations of a discrete sample.
    pub fn as_discrete(&self) -> Option<&[u64]> {
        match self {
            Self::Discrete(v) => Some(v),
            Self::Continuous(_) => None,
        }
    }

    /// All observations as `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Self::Continuous(v) => v.clone(),
            Self::Discrete(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }
}

/// Creates a deterministic generator from a seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generates `n` observations from the distribution described by `params`.
///
/// # Errors
///
/// [`SimulationError::InvalidParameter`] if `n == 0` or the parameters
/// violate their invariants. No draws are made in that case.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, n: usize, params: Parameters) -> Result<Sample> {
    match params {
        Parameters::Uniform { low, high } => uniform(rng, n, low, high).map(Sample::Continuous),
        Parameters::Normal { mean, std_dev } => {
            normal(rng, n, mean, std_dev).map(Sample::Continuous)
        }
        Parameters::NegExponential { lambda } => {
            neg_exponential(rng, n, lambda).map(Sample::Continuous)
        }
        Parameters::Poisson { lambda } => poisson(rng, n, lambda).map(Sample::Discrete),
    }
}

/// `n` draws from U(a, b). Bounds in reverse order are swapped.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, n: usize, a: f64, b: f64) -> Result<Vec<f64>> {
    let (low, high) = if a > b { (b, a) } else { (a, b) };
    check(n, &Parameters::Uniform { low, high })?;

    let width = high - low;
    Ok((0..n)
        .map(|_| (low + rng.random::<f64>() * width).min(high))
        .collect())
}

/// `n` draws from N(mean, std_dev²) via the Box–Muller transform.
pub fn normal<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    mean: f64,
    std_dev: f64,
) -> Result<Vec<f64>> {
    check(n, &Parameters::Normal { mean, std_dev })?;

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let mut u1: f64 = rng.random();
        let u2: f64 = rng.random();
        while u1 == 0.0 {
            u1 = rng.random();
        }
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        out.push(mean + std_dev * z);
    }
    Ok(out)
}

/// `n` draws from the negative exponential with rate `lambda`.
pub fn neg_exponential<R: Rng + ?Sized>(rng: &mut R, n: usize, lambda: f64) -> Result<Vec<f64>> {
    check(n, &Parameters::NegExponential { lambda })?;

    Ok((0..n)
        .map(|_| -(1.0 / lambda) * (1.0 - rng.random::<f64>()).ln())
        .collect())
}

/// `n` draws from Poisson(`lambda`) using Knuth's multiplication method.
pub fn poisson<R: Rng + ?Sized>(rng: &mut R, n: usize, lambda: f64) -> Result<Vec<u64>> {
    check(n, &Parameters::Poisson { lambda })?;

    let threshold = (-lambda).exp();
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        // Same as starting from p = 1, x = -1: the first product is always taken.
        let mut p: f64 = rng.random();
        let mut x = 0_u64;
        while p >= threshold {
            p *= rng.random::<f64>();
            x += 1;
        }
        out.push(x);
    }
    Ok(out)
}

fn check(n: usize, params: &Parameters) -> Result<()> {
    if n < 1 {
        return Err(SimulationError::invalid_parameter(
            "n",
            "sample size must be at least 1",
        ));
    }
    params.validate()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn uniform_stays_in_range(
            a in -1e3_f64..1e3,
            b in -1e3_f64..1e3,
            n in 1_usize..200,
            seed in any::<u64>(),
        ) {
            let data = uniform(&mut seeded_rng(seed), n, a, b).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert_eq!(data.len(), n);
            for &x in &data {
                prop_assert!(x >= lo && x <= hi, "{x} outside [{lo}, {hi}]");
            }
        }

        #[test]
        fn poisson_count_matches(
            lambda in 0.01_f64..30.0,
            n in 1_usize..200,
            seed in any::<u64>(),
        ) {
            let data = poisson(&mut seeded_rng(seed), n, lambda).unwrap();
            prop_assert_eq!(data.len(), n);
        }

        #[test]
        fn neg_exponential_non_negative(
            lambda in 0.01_f64..100.0,
            n in 1_usize..200,
            seed in any::<u64>(),
        ) {
            let data = neg_exponential(&mut seeded_rng(seed), n, lambda).unwrap();
            for &x in &data {
                prop_assert!(x >= 0.0 && x.is_finite(), "x = {x}");
            }
        }

        #[test]
        fn normal_is_finite(
            mean in -1e3_f64..1e3,
            sd in 0.001_f64..100.0,
            n in 1_usize..200,
            seed in any::<u64>(),
        ) {
            let data = normal(&mut seeded_rng(seed), n, mean, sd).unwrap();
            for &x in &data {
                prop_assert!(x.is_finite(), "x = {x}");
            }
        }
    }
}
