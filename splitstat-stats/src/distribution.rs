//! Reference Distributions
//!
//! Standard normal and chi-squared tail functions used by the tests. Tail
//! probabilities go through `erfc` / `sf` directly so that tiny p-values keep
//! their precision instead of collapsing to `1.0 - 1.0`.

use crate::error::StatsError;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::SQRT_2;

/// Standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Two-sided tail probability `P(|Z| >= |z|)`
pub fn normal_two_sided_p(z: f64) -> f64 {
    erfc(z.abs() / SQRT_2).clamp(0.0, 1.0)
}

/// Standard normal quantile (inverse CDF)
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Upper tail probability of a chi-squared distribution
pub fn chi_squared_sf(statistic: f64, dof: u32) -> Result<f64, StatsError> {
    let dist = ChiSquared::new(f64::from(dof)).map_err(|_| StatsError::InvalidParameter {
        name: "dof",
        value: f64::from(dof),
        reason: "must be positive",
    })?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}
