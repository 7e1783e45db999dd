//! Output Formatting
//!
//! Human-readable output formatting for analysis reports.
//!
//! Generates terminal-friendly blocks separated by dashed rules:
//! - Dataset shape, column names, unique and missing counts per column
//! - Records per group
//! - Sampled z-test rates, intervals and p-value
//! - Full-data chi-squared statistic and p-value
//! - Required sample size from the power analysis

use splitstat_data::DatasetSummary;
use splitstat_report::Report;
use splitstat_stats::{ChiSquareResult, PowerAnalysis, SampleSize, ZTestResult};

/// Width of the dashed rule between blocks
pub const SEPARATOR_WIDTH: usize = 40;

fn rule(output: &mut String) {
    output.push_str(&"-".repeat(SEPARATOR_WIDTH));
    output.push('\n');
}

/// Format a report for human-readable terminal display
///
/// Sections missing from the report are skipped.
pub fn format_human_output(report: &Report) -> String {
    let mut output = format_preamble(report);
    if let Some(ztest) = &report.ztest {
        format_ztest(&mut output, ztest);
    }
    if let Some(chi) = &report.chi_square {
        format_chi_square(&mut output, chi);
    }
    if let Some(power) = &report.power {
        format_power(&mut output, power);
    }
    output
}

/// Leading rule, input header and dataset diagnostics
pub(crate) fn format_preamble(report: &Report) -> String {
    let mut output = String::new();
    rule(&mut output);

    let mut header = String::new();
    if let Some(source) = &report.meta.source {
        header.push_str(&format!("Input: {}\n", source));
    }
    if let Some(column) = &report.meta.config.dedup_column {
        header.push_str(&format!(
            "Removed {} duplicate record(s) by '{}'\n",
            report.meta.config.duplicates_removed, column
        ));
    }
    if !header.is_empty() {
        output.push_str(&header);
        rule(&mut output);
    }

    if let Some(summary) = &report.dataset {
        format_dataset(&mut output, summary);
    }
    output
}

/// Z-test block on its own
pub(crate) fn format_ztest_block(z: &ZTestResult) -> String {
    let mut output = String::new();
    format_ztest(&mut output, z);
    output
}

/// Chi-squared block on its own
pub(crate) fn format_chi_square_block(chi: &ChiSquareResult) -> String {
    let mut output = String::new();
    format_chi_square(&mut output, chi);
    output
}

/// Six decimals, or scientific notation below 1e-4
fn format_p_value(p: f64) -> String {
    if p > 0.0 && p < 1e-4 {
        format!("{:.4e}", p)
    } else {
        format!("{:.6}", p)
    }
}

fn format_dataset(output: &mut String, summary: &DatasetSummary) {
    let width = summary
        .column_names()
        .map(str::len)
        .max()
        .unwrap_or(0);

    output.push_str("Shape of Dataset:\n");
    output.push_str(&format!("({}, {})\n", summary.rows, summary.columns));
    rule(output);

    output.push_str("Column Names:\n");
    output.push_str(&summary.column_names().collect::<Vec<_>>().join(", "));
    output.push('\n');
    rule(output);

    output.push_str("Unique Entries:\n");
    for column in &summary.column_summaries {
        output.push_str(&format!("{:<width$}  {}\n", column.name, column.unique));
    }
    rule(output);

    output.push_str("Check for NA values:\n");
    for column in &summary.column_summaries {
        output.push_str(&format!("{:<width$}  {}\n", column.name, column.missing));
    }
    rule(output);

    output.push_str("Number of Records in Control and Treatment Group:\n");
    output.push_str(&format!("Control Group: {}\n", summary.groups.control));
    output.push_str(&format!("Treatment Group: {}\n", summary.groups.treatment));
    rule(output);
}

fn sample_notice(sample: &SampleSize) -> Option<String> {
    match sample.requested {
        None => Some(format!(
            "No sample size provided, using maximum available ({}).",
            sample.used
        )),
        Some(_) if sample.clamped => Some(format!(
            "Sample size provided is too high. Using maximum available ({}).",
            sample.used
        )),
        Some(_) => None,
    }
}

fn verdict(significant: bool, alpha: f64) -> String {
    if significant {
        format!("significant at alpha = {}", alpha)
    } else {
        format!("not significant at alpha = {}", alpha)
    }
}

fn format_ztest(output: &mut String, z: &ZTestResult) {
    output.push_str(&format!(
        "Two-proportion z-test ({} sampled records per group, seed {}):\n",
        z.sample.used, z.seed
    ));
    if let Some(notice) = sample_notice(&z.sample) {
        output.push_str(&notice);
        output.push('\n');
    }

    let level = z.difference_interval.level * 100.0;
    output.push_str(&format!(
        "Control Conversion Rate: {:.4}  ({:.0}% CI [{:.4}, {:.4}])\n",
        z.control.rate, level, z.control.interval.lower, z.control.interval.upper
    ));
    output.push_str(&format!(
        "Treatment Conversion Rate: {:.4}  ({:.0}% CI [{:.4}, {:.4}])\n",
        z.treatment.rate, level, z.treatment.interval.lower, z.treatment.interval.upper
    ));
    output.push_str(&format!(
        "Difference: {:+.4}  ({:.0}% CI [{:+.4}, {:+.4}])\n",
        z.difference, level, z.difference_interval.lower, z.difference_interval.upper
    ));
    output.push_str(&format!("z-statistic: {:.4}\n", z.z_statistic));
    output.push_str(&format!(
        "P-value for A/B test: {}\n",
        format_p_value(z.p_value)
    ));
    output.push_str(&format!("Result: {}\n", verdict(z.significant, z.alpha)));
    rule(output);
}

fn format_chi_square(output: &mut String, chi: &ChiSquareResult) {
    let correction = if chi.test.yates_correction {
        ", Yates-corrected"
    } else {
        ""
    };
    output.push_str(&format!(
        "Chi-squared test ({} records, all data{}):\n",
        chi.table.total(),
        correction
    ));
    output.push_str(&format!(
        "P-value for A/B test (Chi-squared test): {}\n",
        format_p_value(chi.p_value())
    ));
    output.push_str(&format!("Chi2_stat: {:.4}\n", chi.statistic()));
    output.push_str(&format!("Result: {}\n", verdict(chi.significant, chi.alpha)));
    rule(output);
}

fn format_power(output: &mut String, power: &PowerAnalysis) {
    output.push_str(&format!(
        "Power analysis (power = {}, alpha = {}):\n",
        power.config.power, power.config.alpha
    ));
    output.push_str(&format!(
        "Base rate: {}  Target rate: {}\n",
        power.base_rate, power.target_rate
    ));
    output.push_str(&format!(
        "Effect size (Cohen's h): {:.4} ({})\n",
        power.effect_size, power.effect_interpretation
    ));
    output.push_str(&format!(
        "Required Sample Size: {}.\n",
        power.required_per_group
    ));
    output.push_str(&format!(
        "Total across both groups: {}\n",
        power.required_total
    ));
    rule(output);
}
