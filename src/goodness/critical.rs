//! Critical values of the Chi-squared and Kolmogorov–Smirnov reference
//! distributions.
//!
//! # Kolmogorov–Smirnov distribution
//!
//! [`kolmogorov_cdf`] evaluates P(Dₙ ≤ d) for the two-sided one-sample
//! statistic, following the hybrid scheme of Simard & L'Ecuyer:
//!
//! - Ruben–Gambino closed forms for d ≤ 1/n and d ≥ 1 − 1/n
//! - Durbin matrix (Marsaglia, Tsang & Wang) for n ≤ 140, or small n²d³
//! - Pelz–Good asymptotic series otherwise
//!
//! # References
//!
//! - Marsaglia, G., Tsang, W.W. & Wang, J. (2003). "Evaluating Kolmogorov's
//!   distribution". *Journal of Statistical Software* 8(18).
//! - Simard, R. & L'Ecuyer, P. (2011). "Computing the two-sided
//!   Kolmogorov-Smirnov distribution". *Journal of Statistical Software* 39(11).
//! - Pelz, W. & Good, I.J. (1976). "Approximating the lower tail-areas of the
//!   Kolmogorov-Smirnov one-sample statistic". *JRSS B* 38(2), 152–156.

use u_numflow::special;

const MAX_BISECTIONS: usize = 200;

/// Quantile of the Chi-squared distribution: the x with P(χ²(df) ≤ x) = p.
///
/// Delegates to [`u_numflow::special::chi_squared_quantile`] and maps its
/// NaN sentinel to `None`.
///
/// # Returns
///
/// `None` if `p` is outside (0, 1) or `df` is not a positive finite number.
///
/// # Examples
///
/// ```
/// use u_simulation::goodness::critical::chi_squared_quantile;
///
/// let x = chi_squared_quantile(0.95, 1.0).unwrap();
/// assert!((x - 3.841).abs() < 1e-2);
/// assert!(chi_squared_quantile(0.95, 0.0).is_none());
/// ```
pub fn chi_squared_quantile(p: f64, df: f64) -> Option<f64> {
    if !df.is_finite() {
        return None;
    }
    let x = special::chi_squared_quantile(p, df);
    x.is_finite().then_some(x)
}

/// CDF of the two-sided one-sample Kolmogorov–Smirnov statistic Dₙ.
///
/// Returns NaN for `n == 0` or non-finite `d`.
pub fn kolmogorov_cdf(n: u64, d: f64) -> f64 {
    if n == 0 || !d.is_finite() {
        return f64::NAN;
    }
    let nf = n as f64;

    if d <= 0.5 / nf {
        return 0.0;
    }
    if d <= 1.0 / nf {
        // n! (2d − 1/n)ⁿ; every factor i·w ≤ 1
        let w = 2.0 * d - 1.0 / nf;
        return (1..=n).fold(1.0, |acc, i| acc * i as f64 * w);
    }
    if d >= 1.0 {
        return 1.0;
    }
    if d >= 1.0 - 1.0 / nf {
        return 1.0 - 2.0 * (1.0 - d).powf(nf);
    }
    if nf * d * d >= 18.0 {
        return 1.0;
    }

    if n <= 140 || (nf * nf * d * d * d <= 7.0 && n <= 100_000) {
        durbin_matrix(n, d)
    } else {
        pelz_good(n, d).clamp(0.0, 1.0)
    }
}

/// Quantile of the Kolmogorov–Smirnov distribution: the d with P(Dₙ ≤ d) = p.
///
/// # Returns
///
/// `None` if `n == 0` or `p` is outside (0, 1).
///
/// # Examples
///
/// ```
/// use u_simulation::goodness::critical::kolmogorov_quantile;
///
/// // Published table value for n = 10 at the 5% level: 0.409
/// let d = kolmogorov_quantile(0.95, 10).unwrap();
/// assert!((d - 0.409).abs() < 1e-3);
/// ```
pub fn kolmogorov_quantile(p: f64, n: u64) -> Option<f64> {
    if n == 0 || !(p > 0.0 && p < 1.0) {
        return None;
    }

    let mut lo = 0.5 / n as f64;
    let mut hi = 1.0;
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if kolmogorov_cdf(n, mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-13 {
            break;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Exact P(Dₙ < d) via the k-th diagonal entry of Hⁿ.
fn durbin_matrix(n: u64, d: f64) -> f64 {
    let nf = n as f64;

    // Upper-tail shortcut, accurate to ~7 digits in this region.
    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        return 1.0 - 2.0 * (-(2.000071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
    }

    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            if j <= i + 1 {
                hm[i * m + j] = 1.0;
            }
        }
    }
    for i in 0..m {
        hm[i * m] -= h.powi(i as i32 + 1);
        hm[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..=i {
            for g in 1..=(i - j + 1) {
                hm[i * m + j] /= g as f64;
            }
        }
    }

    let (q, mut exponent) = matrix_power(&hm, m, n);
    let mut s = q[(k - 1) * m + (k - 1)];
    for i in 1..=n {
        s = s * i as f64 / nf;
        if s < 1e-140 {
            s *= 1e140;
            exponent -= 140;
        }
    }
    s * 10_f64.powi(exponent)
}

fn matrix_multiply(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * m];
    for i in 0..m {
        for l in 0..m {
            let a_il = a[i * m + l];
            if a_il == 0.0 {
                continue;
            }
            for j in 0..m {
                c[i * m + j] += a_il * b[l * m + j];
            }
        }
    }
    c
}

/// Aⁿ as (mantissa matrix, decimal exponent), rescaled to avoid overflow.
fn matrix_power(a: &[f64], m: usize, n: u64) -> (Vec<f64>, i32) {
    if n == 1 {
        return (a.to_vec(), 0);
    }
    let (half, e_half) = matrix_power(a, m, n / 2);
    let squared = matrix_multiply(&half, &half, m);
    let (mut v, mut e) = if n % 2 == 0 {
        (squared, 2 * e_half)
    } else {
        (matrix_multiply(a, &squared, m), 2 * e_half)
    };
    if v[(m / 2) * m + m / 2] > 1e140 {
        for x in v.iter_mut() {
            *x *= 1e-140;
        }
        e += 140;
    }
    (v, e)
}

/// Pelz–Good asymptotic expansion of P(Dₙ ≤ x) to O(1/n^{3/2}).
fn pelz_good(n: u64, x: f64) -> f64 {
    const JMAX: u32 = 20;
    const EPS: f64 = 1.0e-10;
    const C: f64 = 2.506_628_274_631_001; // √(2π)
    const C2: f64 = 1.253_314_137_315_500_1; // √(π/2)
    let pi2 = std::f64::consts::PI * std::f64::consts::PI;
    let pi4 = pi2 * pi2;

    let nf = n as f64;
    let rn = nf.sqrt();
    let z = rn * x;
    let z2 = z * z;
    let z4 = z2 * z2;
    let z6 = z4 * z2;
    let w = pi2 / (2.0 * z2);

    let mut sum = 0.0;
    let mut term = 1.0;
    let mut j = 0;
    while j <= JMAX && term > EPS * sum {
        let ti = j as f64 + 0.5;
        term = (-ti * ti * w).exp();
        sum += term;
        j += 1;
    }
    sum *= C / z;

    let mut tom = 0.0_f64;
    term = 1.0;
    j = 0;
    while j <= JMAX && term.abs() > EPS * tom.abs() {
        let ti = j as f64 + 0.5;
        term = (pi2 * ti * ti - z2) * (-pi2 * ti * ti / (2.0 * z2)).exp();
        tom += term;
        j += 1;
    }
    sum += tom * C2 / (rn * 3.0 * z4);

    tom = 0.0;
    term = 1.0;
    j = 0;
    while j <= JMAX && term.abs() > EPS * tom.abs() {
        let ti = j as f64 + 0.5;
        let ti2 = ti * ti;
        term = 6.0 * z6
            + 2.0 * z4
            + pi2 * (2.0 * z4 - 5.0 * z2) * ti2
            + pi4 * (1.0 - 2.0 * z2) * ti2 * ti2;
        term *= (-pi2 * ti2 / (2.0 * z2)).exp();
        tom += term;
        j += 1;
    }
    sum += tom * C2 / (nf * 36.0 * z * z6);

    tom = 0.0;
    term = 1.0;
    j = 1;
    while j <= JMAX && term > EPS * tom {
        let ti = j as f64;
        term = pi2 * ti * ti * (-pi2 * ti * ti / (2.0 * z2)).exp();
        tom += term;
        j += 1;
    }
    sum -= tom * C2 / (nf * 18.0 * z * z2);

    tom = 0.0;
    term = 1.0;
    j = 0;
    while j <= JMAX && term.abs() > EPS * tom.abs() {
        let ti = j as f64 + 0.5;
        let ti2 = ti * ti;
        term = -30.0 * z6 - 90.0 * z6 * z2
            + pi2 * (135.0 * z4 - 96.0 * z6) * ti2
            + pi4 * (212.0 * z4 - 60.0 * z2) * ti2 * ti2
            + pi2 * pi4 * ti2 * ti2 * ti2 * (5.0 - 30.0 * z2);
        term *= (-pi2 * ti2 / (2.0 * z2)).exp();
        tom += term;
        j += 1;
    }
    sum += tom * C2 / (rn * nf * 3240.0 * z4 * z6);

    tom = 0.0;
    term = 1.0;
    j = 1;
    while j <= JMAX && term.abs() > EPS * tom.abs() {
        let ti2 = (j * j) as f64;
        term = (3.0 * pi2 * ti2 * z2 - pi4 * ti2 * ti2) * (-pi2 * ti2 / (2.0 * z2)).exp();
        tom += term;
        j += 1;
    }
    sum += tom * C2 / (rn * nf * 108.0 * z6);

    sum
}
