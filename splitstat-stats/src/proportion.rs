//! Two-Proportion Z-Test
//!
//! Pooled normal-approximation test for the difference between two
//! conversion rates, plus Wald confidence intervals for reporting.

use crate::distribution::{normal_quantile, normal_two_sided_p};
use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// Confidence interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Coverage (e.g., 0.95)
    pub level: f64,
}

impl ConfidenceInterval {
    /// Whether the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Statistic and p-value of a z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTest {
    /// `(rate_2 - rate_1) / SE`
    pub z_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Conversions observed in one sampled group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    /// Sampled records
    pub size: u64,
    /// Records with outcome 1
    pub conversions: u64,
    /// `conversions / size`
    pub rate: f64,
    /// Wald interval for the rate
    pub interval: ConfidenceInterval,
}

impl GroupOutcome {
    /// Summarize a group from its counts
    pub fn new(conversions: u64, size: u64, level: f64) -> Self {
        let rate = if size == 0 {
            0.0
        } else {
            conversions as f64 / size as f64
        };
        Self {
            size,
            conversions,
            rate,
            interval: wald_interval(conversions, size, level),
        }
    }

    /// Summarize a group from raw 0/1 outcomes
    pub fn from_outcomes(outcomes: &[bool], level: f64) -> Self {
        let conversions = outcomes.iter().filter(|&&c| c).count() as u64;
        Self::new(conversions, outcomes.len() as u64, level)
    }

    fn variance(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.rate * (1.0 - self.rate) / self.size as f64
        }
    }
}

/// Pooled two-proportion z-test
///
/// `successes` and `trials` are ordered `[first, second]`; the statistic is
/// positive when the second group converts more. When the pooled proportion
/// is 0 or 1 both groups are identical and the result is `z = 0, p = 1`.
pub fn two_proportion_ztest(successes: [u64; 2], trials: [u64; 2]) -> Result<ZTest, StatsError> {
    let [s1, s2] = successes;
    let [n1, n2] = trials;
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::insufficient(
            "z-test needs at least one trial per group",
        ));
    }
    if s1 > n1 || s2 > n2 {
        return Err(StatsError::InvalidParameter {
            name: "successes",
            value: s1.max(s2) as f64,
            reason: "cannot exceed the number of trials",
        });
    }

    let (n1, n2) = (n1 as f64, n2 as f64);
    let rate1 = s1 as f64 / n1;
    let rate2 = s2 as f64 / n2;
    let pooled = (s1 + s2) as f64 / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();

    if se == 0.0 {
        return Ok(ZTest {
            z_statistic: 0.0,
            p_value: 1.0,
        });
    }

    let z_statistic = (rate2 - rate1) / se;
    Ok(ZTest {
        z_statistic,
        p_value: normal_two_sided_p(z_statistic),
    })
}

/// Normal-approximation interval for a single proportion, clipped to [0, 1]
pub fn wald_interval(successes: u64, trials: u64, level: f64) -> ConfidenceInterval {
    if trials == 0 {
        return ConfidenceInterval {
            lower: 0.0,
            upper: 1.0,
            level,
        };
    }
    let rate = successes as f64 / trials as f64;
    let half = critical_value(level) * (rate * (1.0 - rate) / trials as f64).sqrt();
    ConfidenceInterval {
        lower: (rate - half).max(0.0),
        upper: (rate + half).min(1.0),
        level,
    }
}

/// Unpooled interval for `second.rate - first.rate`
pub fn difference_interval(
    first: &GroupOutcome,
    second: &GroupOutcome,
    level: f64,
) -> ConfidenceInterval {
    let diff = second.rate - first.rate;
    let half = critical_value(level) * (first.variance() + second.variance()).sqrt();
    ConfidenceInterval {
        lower: diff - half,
        upper: diff + half,
        level,
    }
}

fn critical_value(level: f64) -> f64 {
    normal_quantile(1.0 - (1.0 - level) / 2.0)
}
