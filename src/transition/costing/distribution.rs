//! Probability density functions of the model, and their logarithms.
//!
//! The logarithmic forms are evaluated directly rather than through
//! `ln(pdf(x))`, so that far-away candidates do not underflow to `-inf`.

use std::f64::consts::PI;

/// Density of the zero-mean normal distribution at `x`.
///
/// ```math
/// f(x) = 1 / (√(2π)·σ) · e^(-0.5·(x/σ)²)
/// ```
#[inline]
pub fn normal_distribution(sigma: f64, x: f64) -> f64 {
    1.0 / ((2.0 * PI).sqrt() * sigma) * (-0.5 * (x / sigma).powi(2)).exp()
}

/// Logarithm of [`normal_distribution`].
#[inline]
pub fn log_normal_distribution(sigma: f64, x: f64) -> f64 {
    (1.0 / ((2.0 * PI).sqrt() * sigma)).ln() - 0.5 * (x / sigma).powi(2)
}

/// Density of the exponential distribution of scale `β` at `x`.
///
/// ```math
/// f(x) = 1/β · e^(-x/β)
/// ```
#[inline]
pub fn exponential_distribution(beta: f64, x: f64) -> f64 {
    (1.0 / beta) * (-x / beta).exp()
}

/// Logarithm of [`exponential_distribution`].
///
/// Positive at `x = 0` whenever `β < 1`, as the density exceeds one.
#[inline]
pub fn log_exponential_distribution(beta: f64, x: f64) -> f64 {
    (1.0 / beta).ln() - x / beta
}
