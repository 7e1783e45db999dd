//! Experiment Analyzer
//!
//! Runs the hypothesis tests against a loaded dataset.
//!
//! The z-test compares equal-sized random samples drawn from each group; the
//! chi-squared test uses every row. The two tests therefore answer slightly
//! different questions whenever the groups are unbalanced or a sample size is
//! requested, and reports label each result with the data it was computed on.

use crate::DEFAULT_ALPHA;
use crate::chisquare::{ChiSquareTest, chi_square_independence};
use crate::error::StatsError;
use crate::proportion::{
    ConfidenceInterval, GroupOutcome, difference_interval, two_proportion_ztest,
};
use crate::sampling::{DEFAULT_SEED, SampleSize, resolve_sample_size, sample_without_replacement};
use serde::{Deserialize, Serialize};
use splitstat_data::{ContingencyTable, Dataset, Group};
use tracing::debug;

/// Configuration for an analyzer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Seed for the group samplers
    pub seed: u64,
    /// Significance level
    pub alpha: f64,
    /// Apply Yates' continuity correction to the chi-squared test
    pub yates_correction: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            alpha: DEFAULT_ALPHA,
            yates_correction: false,
        }
    }
}

/// Result of the sampled two-proportion z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestResult {
    /// How the per-group sample size was chosen
    pub sample: SampleSize,
    /// Seed the samples were drawn with
    pub seed: u64,
    /// Sampled control group
    pub control: GroupOutcome,
    /// Sampled treatment group
    pub treatment: GroupOutcome,
    /// Positive when treatment converts more
    pub z_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Significance level used for `significant`
    pub alpha: f64,
    /// Whether `p_value < alpha`
    pub significant: bool,
    /// `treatment.rate - control.rate`
    pub difference: f64,
    /// Interval for `difference` at level `1 - alpha`
    pub difference_interval: ConfidenceInterval,
}

/// Result of the full-data chi-squared test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    /// Observed counts
    pub table: ContingencyTable,
    /// Statistic, p-value and expected counts
    pub test: ChiSquareTest,
    /// Significance level used for `significant`
    pub alpha: f64,
    /// Whether `p_value < alpha`
    pub significant: bool,
}

impl ChiSquareResult {
    /// Pearson statistic
    pub fn statistic(&self) -> f64 {
        self.test.statistic
    }

    /// Upper-tail p-value
    pub fn p_value(&self) -> f64 {
        self.test.p_value
    }
}

/// Hypothesis tests over a borrowed dataset
///
/// Group counts are read from the dataset on every call, so an analyzer
/// created after deduplication always sees the deduplicated sizes.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    dataset: &'a Dataset,
    config: AnalyzerConfig,
}

impl<'a> Analyzer<'a> {
    /// Create an analyzer after validating the configuration
    pub fn new(dataset: &'a Dataset, config: AnalyzerConfig) -> Result<Self, StatsError> {
        StatsError::check_probability("alpha", config.alpha)?;
        Ok(Self { dataset, config })
    }

    /// Analyzer with the default seed, alpha = 0.05 and no continuity correction
    pub fn with_defaults(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            config: AnalyzerConfig::default(),
        }
    }

    /// Apply the sample-size policy to the current group counts
    pub fn sample_size(&self, requested: Option<usize>) -> SampleSize {
        resolve_sample_size(requested, &self.dataset.group_summary())
    }

    /// Two-proportion z-test on balanced samples using the configured seed
    pub fn run_ztest(&self, requested: Option<usize>) -> Result<ZTestResult, StatsError> {
        self.run_ztest_with_seed(requested, self.config.seed)
    }

    /// Two-proportion z-test on balanced samples drawn with `seed`
    ///
    /// Each group is sampled by its own generator seeded with `seed` on a
    /// per-group stream, so the control sample does not depend on the
    /// treatment group's size and groups with the same row layout still get
    /// independent draws.
    pub fn run_ztest_with_seed(
        &self,
        requested: Option<usize>,
        seed: u64,
    ) -> Result<ZTestResult, StatsError> {
        let sample = self.sample_size(requested);
        if sample.used == 0 {
            let groups = self.dataset.group_summary();
            let empty = if groups.control == 0 {
                "control group is empty"
            } else if groups.treatment == 0 {
                "treatment group is empty"
            } else {
                "sample size is zero"
            };
            return Err(StatsError::insufficient(empty));
        }

        let level = 1.0 - self.config.alpha;
        let draw = |group: Group| {
            let outcomes = self.dataset.group_outcomes(group);
            let stream = group.index() as u64;
            let sampled = sample_without_replacement(&outcomes, sample.used, seed, stream);
            GroupOutcome::from_outcomes(&sampled, level)
        };
        let control = draw(Group::Control);
        let treatment = draw(Group::Treatment);

        let test = two_proportion_ztest(
            [control.conversions, treatment.conversions],
            [control.size, treatment.size],
        )?;
        debug!(
            n = sample.used,
            seed,
            control_rate = control.rate,
            treatment_rate = treatment.rate,
            z = test.z_statistic,
            p = test.p_value,
            "z-test complete"
        );

        Ok(ZTestResult {
            sample,
            seed,
            control,
            treatment,
            z_statistic: test.z_statistic,
            p_value: test.p_value,
            alpha: self.config.alpha,
            significant: test.p_value < self.config.alpha,
            difference: treatment.rate - control.rate,
            difference_interval: difference_interval(&control, &treatment, level),
        })
    }

    /// Chi-squared test of independence over every row
    pub fn run_chi_square(&self) -> Result<ChiSquareResult, StatsError> {
        let table = self.dataset.contingency_table();
        let test = chi_square_independence(&table, self.config.yates_correction)?;
        debug!(
            statistic = test.statistic,
            p = test.p_value,
            "chi-squared test complete"
        );

        Ok(ChiSquareResult {
            table,
            test,
            alpha: self.config.alpha,
            significant: test.p_value < self.config.alpha,
        })
    }
}
