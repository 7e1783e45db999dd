//! Integration tests for Splitstat
//!
//! These tests verify the end-to-end behavior of loading, deduplicating and
//! testing experiment data.

use splitstat::prelude::*;
use splitstat::{
    ExperimentRecord, OutputFormat, StatsError, chi_square_independence, format_human_output,
    generate_csv_report, generate_json_report, required_sample_size, run_all,
};
use std::io::Write;

/// Synthetic dataset with the given per-group sizes and conversion periods
/// (every `period`-th record converts)
fn synthetic(
    control: usize,
    control_period: usize,
    treatment: usize,
    treatment_period: usize,
) -> Dataset {
    let records = (0..control)
        .map(|i| ExperimentRecord::new(Group::Control, i % control_period == 0))
        .chain(
            (0..treatment)
                .map(|i| ExperimentRecord::new(Group::Treatment, i % treatment_period == 0)),
        );
    Dataset::from_records(records, DatasetSchema::default())
}

/// Write a CSV with duplicated user ids and an unbalanced split
fn write_experiment_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("ab_data.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "user_id,timestamp,group,landing_page,converted").unwrap();
    for i in 0..300u32 {
        let group = if i % 3 == 0 { "treatment" } else { "control" };
        let page = if group == "treatment" { "new_page" } else { "old_page" };
        let converted = u8::from(i % 7 == 0);
        writeln!(file, "{},2017-01-{:02},{},{},{}", i, i % 28 + 1, group, page, converted).unwrap();
        // every tenth user shows up twice
        if i % 10 == 0 {
            writeln!(file, "{},,{},{},{}", i, group, page, 1 - converted).unwrap();
        }
    }
    path
}

/// Group counts always add up to the row count, before and after dedup
#[test]
fn test_group_counts_track_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_experiment_csv(&dir);

    let mut dataset = Dataset::from_path(&path, DatasetSchema::default()).unwrap();
    assert_eq!(dataset.len(), 330);
    let groups = dataset.group_summary();
    assert_eq!(groups.total(), dataset.len());

    dataset.drop_duplicates("user_id").unwrap();
    assert_eq!(dataset.len(), 300);
    let groups = dataset.group_summary();
    assert_eq!(groups.control + groups.treatment, 300);
    assert_eq!(groups.treatment, 100);
    assert_eq!(dataset.summary().groups, groups);
}

/// Deduplicating twice removes nothing the second time
#[test]
fn test_dedup_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_experiment_csv(&dir);

    let mut dataset = Dataset::from_path(&path, DatasetSchema::default()).unwrap();
    let once = dataset.drop_duplicates("user_id").unwrap().len();
    let twice = dataset.drop_duplicates("user_id").unwrap().len();
    assert_eq!(once, twice);
}

/// Missing timestamps on duplicate rows are counted before dedup, gone after
#[test]
fn test_summary_reports_missing_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_experiment_csv(&dir);

    let mut dataset = Dataset::from_path(&path, DatasetSchema::default()).unwrap();
    let before = dataset.summary();
    assert_eq!(before.columns, 5);
    assert_eq!(before.column("timestamp").unwrap().missing, 30);
    assert_eq!(before.column("group").unwrap().unique, 2);

    dataset.drop_duplicates("user_id").unwrap();
    let after = dataset.summary();
    assert_eq!(after.total_missing(), 0);
    assert_eq!(after.column("user_id").unwrap().unique, 300);
}

/// Same seed, same data, same p-value
#[test]
fn test_ztest_is_deterministic() {
    let dataset = synthetic(4000, 8, 4000, 7);
    let analyzer = Analyzer::with_defaults(&dataset);

    let first = analyzer.run_ztest_with_seed(Some(500), 42).unwrap();
    let second = analyzer.run_ztest_with_seed(Some(500), 42).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.p_value.to_bits(), second.p_value.to_bits());
}

/// Under the null, sampled p-values spread over [0, 1] with mean near 0.5
#[test]
fn test_ztest_pvalues_under_null() {
    let dataset = synthetic(4000, 8, 4000, 8);
    let analyzer = Analyzer::with_defaults(&dataset);

    let p_values: Vec<f64> = (0..200u64)
        .map(|seed| analyzer.run_ztest_with_seed(Some(200), seed).unwrap().p_value)
        .collect();

    let mean = p_values.iter().sum::<f64>() / p_values.len() as f64;
    assert!(mean > 0.35 && mean < 0.70, "mean p-value {mean}");
    assert!(p_values.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(p_values.iter().any(|&p| p < 0.3));
    assert!(p_values.iter().any(|&p| p > 0.7));
}

/// A perfect association gives a large statistic and a tiny p-value
#[test]
fn test_chi_square_strong_association() {
    let records = (0..10)
        .map(|_| ExperimentRecord::new(Group::Control, false))
        .chain((0..10).map(|_| ExperimentRecord::new(Group::Treatment, true)));
    let dataset = Dataset::from_records(records, DatasetSchema::default());
    let table = dataset.contingency_table();
    assert_eq!(table.counts, [[10, 0], [0, 10]]);

    let result = Analyzer::with_defaults(&dataset).run_chi_square().unwrap();
    assert!(result.statistic() > 15.0);
    assert!(result.p_value() < 1e-4);
    assert!(result.significant);

    let direct = chi_square_independence(&table, false).unwrap();
    assert!((direct.statistic - result.statistic()).abs() < 1e-12);
}

/// Reference calculators give 3835 per group for 10% -> 12%
#[test]
fn test_required_sample_size_matches_reference() {
    let plan = required_sample_size(0.10, 0.02, &PowerConfig::default()).unwrap();
    assert!(
        (3833..=3837).contains(&plan.required_per_group),
        "got {}",
        plan.required_per_group
    );
    assert_eq!(plan.required_total, 2 * plan.required_per_group);
}

/// An oversized request is clamped and the test still completes
#[test]
fn test_oversized_sample_is_clamped() {
    let dataset = synthetic(120, 6, 90, 4);
    let analyzer = Analyzer::with_defaults(&dataset);

    let result = analyzer.run_ztest(Some(1_000_000)).unwrap();
    assert!(result.sample.clamped);
    assert_eq!(result.sample.used, 90);
    assert_eq!(result.control.size, 90);
    assert_eq!(result.treatment.size, 90);
}

/// With one group absent both tests fail cleanly
#[test]
fn test_missing_group_is_insufficient_data() {
    let dataset = synthetic(50, 5, 0, 1);
    let analyzer = Analyzer::with_defaults(&dataset);

    assert!(matches!(
        analyzer.run_ztest(None),
        Err(StatsError::InsufficientData { .. })
    ));
    assert!(matches!(
        analyzer.run_chi_square(),
        Err(StatsError::InsufficientData { .. })
    ));
}

/// Full pipeline: load, dedup, run everything, render every format
#[test]
fn test_run_all_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_experiment_csv(&dir);

    let mut dataset = Dataset::from_path(&path, DatasetSchema::default()).unwrap();
    dataset.drop_duplicates("user_id").unwrap();

    let config = ReportConfig {
        dedup_column: Some("user_id".into()),
        duplicates_removed: 30,
        ..ReportConfig::from_analyzer(&AnalyzerConfig::default(), Some(4000))
    };

    let mut out = Vec::new();
    let report = run_all(&dataset, Some("ab_data.csv".into()), config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Sample size provided is too high. Using maximum available (100)."));
    assert!(text.contains("Control Group: 200\nTreatment Group: 100\n"));
    assert_eq!(text, format_human_output(&report));

    let chi = report.chi_square.unwrap();
    assert_eq!(chi.table.total(), 300);

    let json = generate_json_report(&report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.ztest.unwrap().sample.used, 100);

    let csv = generate_csv_report(&report);
    assert_eq!(csv.lines().count(), 3);
    assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
}

/// Custom labels and a tab delimiter flow through loading
#[test]
fn test_custom_schema() {
    let data = "id\tvariant\tpurchased\n1\tA\t0\n2\tB\t1\n3\tA\t1\n4\tB\t0\n";
    let schema = DatasetSchema {
        group_column: "variant".into(),
        outcome_column: "purchased".into(),
        control_label: "A".into(),
        treatment_label: "B".into(),
        ..DatasetSchema::tsv()
    };

    let dataset = Dataset::from_reader(data.as_bytes(), schema).unwrap();
    assert_eq!(dataset.group_summary().control, 2);
    assert_eq!(dataset.contingency_table().counts, [[1, 1], [1, 1]]);
}
