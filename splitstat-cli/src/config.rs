//! Configuration loading from splitstat.toml
//!
//! Analysis defaults can be specified in a `splitstat.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use splitstat_data::{DEFAULT_IDENTITY_COLUMN, DatasetSchema};
use splitstat_stats::{AnalyzerConfig, DEFAULT_ALPHA, DEFAULT_POWER, DEFAULT_SEED, PowerConfig};
use std::path::Path;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "splitstat.toml";

/// Splitstat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SplitstatConfig {
    /// Input layout
    #[serde(default)]
    pub data: DataConfig,
    /// Hypothesis test settings
    #[serde(default)]
    pub test: TestConfig,
    /// Power analysis defaults
    #[serde(default)]
    pub power: PowerDefaults,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Field delimiter (a single character, e.g. "," or "\t")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Column holding the group label
    #[serde(default = "default_group_column")]
    pub group_column: String,
    /// Column holding the 0/1 outcome
    #[serde(default = "default_outcome_column")]
    pub outcome_column: String,
    /// Label of control rows
    #[serde(default = "default_control_label")]
    pub control_label: String,
    /// Label of treatment rows
    #[serde(default = "default_treatment_label")]
    pub treatment_label: String,
    /// Identity column for deduplication
    #[serde(default = "default_identity_column")]
    pub identity_column: String,
    /// Drop duplicate identities before testing
    #[serde(default)]
    pub dedup: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            group_column: default_group_column(),
            outcome_column: default_outcome_column(),
            control_label: default_control_label(),
            treatment_label: default_treatment_label(),
            identity_column: default_identity_column(),
            dedup: false,
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}
fn default_group_column() -> String {
    splitstat_data::DEFAULT_GROUP_COLUMN.to_string()
}
fn default_outcome_column() -> String {
    splitstat_data::DEFAULT_OUTCOME_COLUMN.to_string()
}
fn default_control_label() -> String {
    "control".to_string()
}
fn default_treatment_label() -> String {
    "treatment".to_string()
}
fn default_identity_column() -> String {
    DEFAULT_IDENTITY_COLUMN.to_string()
}

impl DataConfig {
    /// Build the dataset schema described by this section
    pub fn schema(&self) -> anyhow::Result<DatasetSchema> {
        Ok(DatasetSchema {
            group_column: self.group_column.clone(),
            outcome_column: self.outcome_column.clone(),
            control_label: self.control_label.clone(),
            treatment_label: self.treatment_label.clone(),
            delimiter: parse_delimiter(&self.delimiter)?,
        })
    }
}

/// Hypothesis test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    /// Seed for balanced sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Per-group sample size for the z-test (all balanced data if unset)
    #[serde(default)]
    pub sample_size: Option<usize>,
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Apply Yates' continuity correction to the chi-squared test
    #[serde(default)]
    pub yates_correction: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            sample_size: None,
            alpha: default_alpha(),
            yates_correction: false,
        }
    }
}

impl TestConfig {
    /// Analyzer settings described by this section
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            seed: self.seed,
            alpha: self.alpha,
            yates_correction: self.yates_correction,
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// Power analysis defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerDefaults {
    /// Target power
    #[serde(default = "default_power")]
    pub power: f64,
    /// Significance level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Treatment-to-control size ratio
    #[serde(default = "default_ratio")]
    pub ratio: f64,
}

impl Default for PowerDefaults {
    fn default() -> Self {
        Self {
            power: default_power(),
            alpha: default_alpha(),
            ratio: default_ratio(),
        }
    }
}

impl PowerDefaults {
    /// Power settings described by this section
    pub fn power_config(&self) -> PowerConfig {
        PowerConfig {
            power: self.power,
            alpha: self.alpha,
            ratio: self.ratio,
        }
    }
}

fn default_power() -> f64 {
    DEFAULT_POWER
}
fn default_ratio() -> f64 {
    1.0
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl SplitstatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            "ignoring invalid config: {e}"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Splitstat Configuration

[data]
# Field delimiter
delimiter = ","
# Column names
group_column = "group"
outcome_column = "converted"
# Group labels
control_label = "control"
treatment_label = "treatment"
# Identity column used for deduplication
identity_column = "user_id"
# Drop duplicate identities before testing
dedup = false

[test]
# Seed for balanced sampling
seed = 42
# Per-group sample size for the z-test (uncomment to enable; default is all balanced data)
# sample_size = 4000
# Significance level
alpha = 0.05
# Yates' continuity correction for the chi-squared test
yates_correction = false

[power]
# Target statistical power
power = 0.8
# Significance level
alpha = 0.05
# Treatment-to-control size ratio
ratio = 1.0

[output]
# Default output format: human, json, csv
format = "human"
"#
        .to_string()
    }
}

/// Parse a delimiter given as a single character or an escape like `\t`
pub fn parse_delimiter(s: &str) -> anyhow::Result<u8> {
    match s {
        "\\t" | "tab" => return Ok(b'\t'),
        "\\s" | "space" => return Ok(b' '),
        _ => {}
    }
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(anyhow::anyhow!(
            "Invalid delimiter {:?}: expected a single ASCII character",
            s
        )),
    }
}
