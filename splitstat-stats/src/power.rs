//! Power Analysis
//!
//! Per-group sample size needed to detect a lift in conversion rate with a
//! two-sided test of two independent proportions. Effect sizes are Cohen's h
//! (arcsine-transformed difference), so the normal approximation applies on
//! a variance-stabilized scale.

use crate::{DEFAULT_ALPHA, DEFAULT_POWER};
use crate::distribution::{normal_cdf, normal_quantile};
use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bisection steps when solving for the sample size
const SOLVER_ITERATIONS: usize = 200;

/// Target power and significance of a planned experiment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Probability of detecting the effect when it exists
    pub power: f64,
    /// Two-sided significance level
    pub alpha: f64,
    /// Treatment size divided by control size
    pub ratio: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            alpha: DEFAULT_ALPHA,
            ratio: 1.0,
        }
    }
}

/// Interpretation of effect size magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectInterpretation {
    /// |h| < 0.2 - negligible difference
    Negligible,
    /// 0.2 <= |h| < 0.5 - small difference
    Small,
    /// 0.5 <= |h| < 0.8 - medium difference
    Medium,
    /// |h| >= 0.8 - large difference
    Large,
}

impl EffectInterpretation {
    /// Classify an effect size using Cohen's conventions
    pub fn from_effect_size(h: f64) -> Self {
        let abs_h = h.abs();
        if abs_h < 0.2 {
            EffectInterpretation::Negligible
        } else if abs_h < 0.5 {
            EffectInterpretation::Small
        } else if abs_h < 0.8 {
            EffectInterpretation::Medium
        } else {
            EffectInterpretation::Large
        }
    }
}

impl std::fmt::Display for EffectInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectInterpretation::Negligible => write!(f, "negligible"),
            EffectInterpretation::Small => write!(f, "small"),
            EffectInterpretation::Medium => write!(f, "medium"),
            EffectInterpretation::Large => write!(f, "large"),
        }
    }
}

/// Result of a sample-size calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerAnalysis {
    /// Conversion rate of the control experience
    pub base_rate: f64,
    /// Conversion rate the treatment should reach
    pub target_rate: f64,
    /// Cohen's h between the two rates
    pub effect_size: f64,
    /// Magnitude class of `effect_size`
    pub effect_interpretation: EffectInterpretation,
    /// Parameters the size was solved for
    pub config: PowerConfig,
    /// Records needed in the control group (rounded up)
    pub required_per_group: u64,
    /// Records needed across both groups
    pub required_total: u64,
}

/// Cohen's h: `2 asin(sqrt(p2)) - 2 asin(sqrt(p1))`
pub fn proportion_effect_size(p1: f64, p2: f64) -> f64 {
    2.0 * p2.sqrt().asin() - 2.0 * p1.sqrt().asin()
}

/// Power of the two-sided test with `nobs1` control records
///
/// Both rejection tails are counted. `ratio` scales the treatment group.
pub fn achieved_power(effect_size: f64, nobs1: f64, alpha: f64, ratio: f64) -> f64 {
    if nobs1 <= 0.0 {
        return alpha;
    }
    let nobs = nobs1 * ratio / (1.0 + ratio);
    let shift = effect_size.abs() * nobs.sqrt();
    let crit = normal_quantile(1.0 - alpha / 2.0);
    (normal_cdf(shift - crit) + normal_cdf(-crit - shift)).clamp(0.0, 1.0)
}

/// Minimum control-group size to detect `base_rate -> base_rate + minimal_effect`
///
/// Starts from the closed form
/// `n = ((z_{1-alpha/2} + z_power) / h)^2 * (1 + 1/ratio)`, which ignores the
/// far rejection tail, then bisects down to the exact root before rounding up.
pub fn required_sample_size(
    base_rate: f64,
    minimal_effect: f64,
    config: &PowerConfig,
) -> Result<PowerAnalysis, StatsError> {
    let target_rate = base_rate + minimal_effect;
    StatsError::check_probability("base_rate", base_rate)?;
    StatsError::check_probability("base_rate + minimal_effect", target_rate)?;
    StatsError::check_probability("power", config.power)?;
    StatsError::check_probability("alpha", config.alpha)?;
    if !(config.ratio > 0.0 && config.ratio.is_finite()) {
        return Err(StatsError::InvalidParameter {
            name: "ratio",
            value: config.ratio,
            reason: "must be positive",
        });
    }
    if config.power <= config.alpha {
        return Err(StatsError::InvalidParameter {
            name: "power",
            value: config.power,
            reason: "must exceed alpha",
        });
    }

    let effect_size = proportion_effect_size(base_rate, target_rate);
    if effect_size == 0.0 {
        return Err(StatsError::InvalidParameter {
            name: "minimal_effect",
            value: minimal_effect,
            reason: "must be non-zero",
        });
    }

    let z_alpha = normal_quantile(1.0 - config.alpha / 2.0);
    let z_power = normal_quantile(config.power);
    let closed_form = ((z_alpha + z_power) / effect_size).powi(2) * (1.0 + 1.0 / config.ratio);

    let mut lo = 0.0;
    let mut hi = closed_form;
    for _ in 0..SOLVER_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if achieved_power(effect_size, mid, config.alpha, config.ratio) < config.power {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-9 * hi {
            break;
        }
    }

    let required_per_group = hi.ceil() as u64;
    let required_total = required_per_group + (hi * config.ratio).ceil() as u64;
    debug!(
        effect_size,
        closed_form, solved = hi, required_per_group, "power analysis solved"
    );

    Ok(PowerAnalysis {
        base_rate,
        target_rate,
        effect_size,
        effect_interpretation: EffectInterpretation::from_effect_size(effect_size),
        config: *config,
        required_per_group,
        required_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sample_size() {
        // Reference calculators report 3835 per group for 10% -> 12%
        let analysis = required_sample_size(0.10, 0.02, &PowerConfig::default()).unwrap();
        assert!(
            (3833..=3837).contains(&analysis.required_per_group),
            "got {}",
            analysis.required_per_group
        );
        assert_eq!(analysis.required_total, 2 * analysis.required_per_group);
        assert!((analysis.effect_size - 0.063_982).abs() < 1e-5);
        assert_eq!(
            analysis.effect_interpretation,
            EffectInterpretation::Negligible
        );
    }

    #[test]
    fn test_solution_reaches_target_power() {
        let config = PowerConfig::default();
        let analysis = required_sample_size(0.13, 0.02, &config).unwrap();
        let n = analysis.required_per_group as f64;
        let h = analysis.effect_size;

        assert!(achieved_power(h, n, config.alpha, config.ratio) >= config.power);
        assert!(achieved_power(h, n - 1.0, config.alpha, config.ratio) < config.power);
    }

    #[test]
    fn test_negative_effect() {
        let up = required_sample_size(0.20, 0.05, &PowerConfig::default()).unwrap();
        let down = required_sample_size(0.25, -0.05, &PowerConfig::default()).unwrap();
        assert!(down.effect_size < 0.0);
        assert_eq!(up.required_per_group, down.required_per_group);
    }

    #[test]
    fn test_more_power_needs_more_data() {
        let low = required_sample_size(0.1, 0.02, &PowerConfig::default()).unwrap();
        let high = required_sample_size(
            0.1,
            0.02,
            &PowerConfig {
                power: 0.9,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(high.required_per_group > low.required_per_group);
    }

    #[test]
    fn test_unbalanced_ratio() {
        let config = PowerConfig {
            ratio: 2.0,
            ..Default::default()
        };
        let analysis = required_sample_size(0.1, 0.02, &config).unwrap();
        let balanced = required_sample_size(0.1, 0.02, &PowerConfig::default()).unwrap();
        assert!(analysis.required_per_group < balanced.required_per_group);
        assert!(analysis.required_total > analysis.required_per_group * 2);
    }

    #[test]
    fn test_invalid_parameters() {
        let config = PowerConfig::default();
        for (base, effect) in [(0.0, 0.02), (1.0, -0.1), (0.95, 0.1), (0.1, -0.2)] {
            assert!(matches!(
                required_sample_size(base, effect, &config),
                Err(StatsError::InvalidParameter { .. })
            ));
        }
        assert!(required_sample_size(0.1, 0.0, &config).is_err());

        for (power, alpha) in [(0.0, 0.05), (1.0, 0.05), (0.8, 0.0), (0.8, 1.0), (0.04, 0.05)] {
            let config = PowerConfig {
                power,
                alpha,
                ratio: 1.0,
            };
            assert!(required_sample_size(0.1, 0.02, &config).is_err());
        }

        let bad_ratio = PowerConfig {
            ratio: 0.0,
            ..Default::default()
        };
        assert!(required_sample_size(0.1, 0.02, &bad_ratio).is_err());
    }

    #[test]
    fn test_effect_size_interpretation() {
        use EffectInterpretation::*;
        assert_eq!(EffectInterpretation::from_effect_size(0.1), Negligible);
        assert_eq!(EffectInterpretation::from_effect_size(0.3), Small);
        assert_eq!(EffectInterpretation::from_effect_size(0.6), Medium);
        assert_eq!(EffectInterpretation::from_effect_size(1.0), Large);
        assert_eq!(EffectInterpretation::from_effect_size(-0.5), Medium);
    }

    #[test]
    fn test_power_at_zero_is_alpha() {
        assert!((achieved_power(0.5, 0.0, 0.05, 1.0) - 0.05).abs() < 1e-12);
        assert!((achieved_power(0.0, 100.0, 0.05, 1.0) - 0.05).abs() < 1e-9);
    }
}
