#![warn(missing_docs)]
//! Splitstat Report - Analysis Output
//!
//! Collects dataset diagnostics and test results into one serializable
//! report and renders it as:
//! - JSON (machine-readable)
//! - CSV (one row per test)
//!
//! Human-readable terminal output lives in the CLI.

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use report::{REPORT_SCHEMA_VERSION, Report, ReportConfig, ReportMeta};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
