//! CSV Output
//!
//! One row per test, for pasting into spreadsheets.

use crate::report::Report;
use splitstat_data::Group;

const HEADER: &str = "test,basis,control_n,treatment_n,control_rate,treatment_rate,statistic,p_value,significant";

/// Generate a CSV summary of the tests in a report
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::new();
    output.push_str(HEADER);
    output.push('\n');

    if let Some(z) = &report.ztest {
        output.push_str(&format!(
            "z-test,sample,{},{},{},{},{},{},{}\n",
            z.control.size,
            z.treatment.size,
            z.control.rate,
            z.treatment.rate,
            z.z_statistic,
            z.p_value,
            z.significant
        ));
    }

    if let Some(chi) = &report.chi_square {
        let table = &chi.table;
        let rate = |group: Group| {
            let total = table.row_total(group);
            if total == 0 {
                0.0
            } else {
                table.conversions(group) as f64 / total as f64
            }
        };
        output.push_str(&format!(
            "chi-square,full,{},{},{},{},{},{},{}\n",
            table.row_total(Group::Control),
            table.row_total(Group::Treatment),
            rate(Group::Control),
            rate(Group::Treatment),
            chi.statistic(),
            chi.p_value(),
            chi.significant
        ));
    }

    output
}
