#![warn(missing_docs)]
//! # Splitstat
//!
//! Statistical analysis of A/B conversion experiments.
//!
//! Splitstat takes a table of experiment records (a group label and a binary
//! outcome per row) and answers the usual questions about it:
//! - **Diagnostics**: shape, per-column cardinality and missingness, records per group
//! - **Deduplication**: drop repeated identities, keeping the first occurrence
//! - **Z-test**: pooled two-proportion test on balanced, seeded samples from each group
//! - **Chi-squared**: Pearson test of independence on the full 2x2 table
//! - **Power Analysis**: per-group sample size needed to detect a given lift
//! - **Reports**: human-readable, JSON and CSV output
//!
//! ## Quick Start
//!
//! ```ignore
//! use splitstat::prelude::*;
//!
//! let mut dataset = Dataset::from_path("ab_data.csv", DatasetSchema::default())?;
//! dataset.drop_duplicates("user_id")?;
//!
//! let analyzer = Analyzer::with_defaults(&dataset);
//! let ztest = analyzer.run_ztest(Some(4000))?;
//! let chi = analyzer.run_chi_square()?;
//! println!("z-test p = {:.4}, chi-squared p = {:.4}", ztest.p_value, chi.p_value());
//! ```
//!
//! ## Sample Size Planning
//!
//! ```ignore
//! let plan = splitstat::required_sample_size(0.10, 0.02, &PowerConfig::default())?;
//! assert_eq!(plan.required_per_group, 3835);
//! ```

// Re-export dataset handling
pub use splitstat_data::{
    ColumnSummary, ContingencyTable, DEFAULT_GROUP_COLUMN, DEFAULT_IDENTITY_COLUMN,
    DEFAULT_OUTCOME_COLUMN, Dataset, DatasetError, DatasetSchema, DatasetSummary,
    ExperimentRecord, Group, GroupSummary, is_missing,
};

// Re-export stats
pub use splitstat_stats::{
    Analyzer, AnalyzerConfig, ChiSquareResult, ChiSquareTest, ConfidenceInterval, DEFAULT_ALPHA,
    DEFAULT_POWER, DEFAULT_SEED, EffectInterpretation, GroupOutcome, PowerAnalysis, PowerConfig,
    SampleSize, StatsError, ZTest, ZTestResult, achieved_power, chi_square_independence,
    proportion_effect_size, required_sample_size, resolve_sample_size, two_proportion_ztest,
};

// Re-export reporting
pub use splitstat_report::{
    OutputFormat, Report, ReportConfig, generate_csv_report, generate_json_report,
};

// Re-export the analysis pipeline
pub use splitstat_cli::{SplitstatConfig, analyze, format_human_output, run_all, summarize};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Analyzer, AnalyzerConfig, Dataset, DatasetSchema, Group, PowerConfig, Report,
        ReportConfig,
    };
}

/// Run the splitstat CLI.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     splitstat::run().unwrap();
/// }
/// ```
pub use splitstat_cli::run;
