#![warn(missing_docs)]
//! Splitstat Statistical Engine
//!
//! Hypothesis tests and planning tools for A/B conversion experiments:
//! - Balanced, seeded sampling with a clamping sample-size policy
//! - Pooled two-proportion z-test with Wald confidence intervals
//! - Pearson chi-squared test of independence on the 2x2 table
//! - Power analysis for the per-group sample size (Cohen's h)

mod analyzer;
mod chisquare;
mod distribution;
mod error;
mod power;
mod proportion;
mod sampling;

pub use analyzer::{Analyzer, AnalyzerConfig, ChiSquareResult, ZTestResult};
pub use chisquare::{ChiSquareTest, TWO_BY_TWO_DOF, chi_square_independence};
pub use distribution::{chi_squared_sf, normal_cdf, normal_quantile, normal_two_sided_p};
pub use error::StatsError;
pub use power::{
    EffectInterpretation, PowerAnalysis, PowerConfig, achieved_power, proportion_effect_size,
    required_sample_size,
};
pub use proportion::{
    ConfidenceInterval, GroupOutcome, ZTest, difference_interval, two_proportion_ztest,
    wald_interval,
};
pub use sampling::{
    DEFAULT_SEED, SampleSize, resolve_sample_size, sample_indices, sample_without_replacement,
};

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default statistical power for sample-size planning
pub const DEFAULT_POWER: f64 = 0.8;
