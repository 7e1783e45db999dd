//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitstat_data::DatasetSummary;
use splitstat_stats::{AnalyzerConfig, ChiSquareResult, PowerAnalysis, ZTestResult};

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// Dataset diagnostics, if a dataset was analyzed
    pub dataset: Option<DatasetSummary>,
    /// Sampled two-proportion z-test
    pub ztest: Option<ZTestResult>,
    /// Full-data chi-squared test
    pub chi_square: Option<ChiSquareResult>,
    /// Sample-size recommendation
    pub power: Option<PowerAnalysis>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// Splitstat version
    pub version: String,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Input file, if the data came from one
    pub source: Option<String>,
    /// Analysis settings
    pub config: ReportConfig,
}

/// Analysis settings captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Sampling seed
    pub seed: u64,
    /// Significance level
    pub alpha: f64,
    /// Whether Yates' correction was applied
    pub yates_correction: bool,
    /// Per-group sample size asked for on the command line or in config
    pub requested_sample_size: Option<usize>,
    /// Identity column used for deduplication, if any
    pub dedup_column: Option<String>,
    /// Rows removed by deduplication
    pub duplicates_removed: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::from_analyzer(&AnalyzerConfig::default(), None)
    }
}

impl ReportConfig {
    /// Capture analyzer settings and the requested sample size
    pub fn from_analyzer(config: &AnalyzerConfig, requested_sample_size: Option<usize>) -> Self {
        Self {
            seed: config.seed,
            alpha: config.alpha,
            yates_correction: config.yates_correction,
            requested_sample_size,
            dedup_column: None,
            duplicates_removed: 0,
        }
    }

    /// Analyzer settings recorded in this config
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            seed: self.seed,
            alpha: self.alpha,
            yates_correction: self.yates_correction,
        }
    }
}

impl Report {
    /// Empty report stamped with the current time
    pub fn new(source: Option<String>, config: ReportConfig) -> Self {
        Self {
            meta: ReportMeta {
                schema_version: REPORT_SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                source,
                config,
            },
            dataset: None,
            ztest: None,
            chi_square: None,
            power: None,
        }
    }
}
