//! Analysis Execution
//!
//! Runs both hypothesis tests against a loaded dataset and collects the
//! results, together with the dataset diagnostics, into a [`Report`].

use super::formatting::{format_chi_square_block, format_preamble, format_ztest_block};
use splitstat_data::Dataset;
use splitstat_report::{Report, ReportConfig};
use splitstat_stats::{Analyzer, PowerConfig, StatsError, required_sample_size};
use std::io::Write;
use tracing::info;

/// Summarize a dataset without running any test
pub fn summarize(dataset: &Dataset, source: Option<String>, config: ReportConfig) -> Report {
    let mut report = Report::new(source, config);
    report.dataset = Some(dataset.summary());
    report
}

/// Run the z-test on a balanced sample and the chi-squared test on all rows
///
/// The sample size in `config.requested_sample_size` goes through the usual
/// clamping policy; the outcome is recorded in the z-test result.
pub fn analyze(
    dataset: &Dataset,
    source: Option<String>,
    config: ReportConfig,
) -> Result<Report, StatsError> {
    let analyzer = Analyzer::new(dataset, config.analyzer_config())?;
    let requested = config.requested_sample_size;
    let mut report = summarize(dataset, source, config);

    let ztest = analyzer.run_ztest(requested)?;
    info!(
        n = ztest.sample.used,
        p_value = ztest.p_value,
        "two-proportion z-test complete"
    );
    report.ztest = Some(ztest);

    let chi_square = analyzer.run_chi_square()?;
    info!(
        statistic = chi_square.statistic(),
        p_value = chi_square.p_value(),
        "chi-squared test complete"
    );
    report.chi_square = Some(chi_square);

    Ok(report)
}

/// Print dataset diagnostics and both test blocks, returning the report
///
/// Each block is written as soon as it is available, so the diagnostics
/// and any completed test stay on screen when a later test fails.
pub fn run_all<W: Write>(
    dataset: &Dataset,
    source: Option<String>,
    config: ReportConfig,
    out: &mut W,
) -> anyhow::Result<Report> {
    let analyzer = Analyzer::new(dataset, config.analyzer_config())?;
    let requested = config.requested_sample_size;
    let mut report = summarize(dataset, source, config);
    out.write_all(format_preamble(&report).as_bytes())?;

    let ztest = analyzer.run_ztest(requested)?;
    info!(
        n = ztest.sample.used,
        p_value = ztest.p_value,
        "two-proportion z-test complete"
    );
    out.write_all(format_ztest_block(&ztest).as_bytes())?;
    report.ztest = Some(ztest);

    let chi_square = analyzer.run_chi_square()?;
    info!(
        statistic = chi_square.statistic(),
        p_value = chi_square.p_value(),
        "chi-squared test complete"
    );
    out.write_all(format_chi_square_block(&chi_square).as_bytes())?;
    report.chi_square = Some(chi_square);

    Ok(report)
}

/// Report holding only a sample-size recommendation
pub fn plan_sample_size(
    base_rate: f64,
    minimal_effect: f64,
    config: &PowerConfig,
) -> Result<Report, StatsError> {
    let power = required_sample_size(base_rate, minimal_effect, config)?;
    let report_config = ReportConfig {
        alpha: config.alpha,
        ..ReportConfig::default()
    };
    let mut report = Report::new(None, report_config);
    report.power = Some(power);
    Ok(report)
}
