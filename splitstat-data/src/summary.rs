//! Dataset Summaries
//!
//! Derived views over a dataset. None of these hold references back into the
//! dataset, so a summary taken before a mutation keeps describing the old
//! state while the dataset itself always reports fresh counts.

use crate::schema::Group;
use serde::{Deserialize, Serialize};

/// Record counts per experiment group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Records in the control group
    pub control: usize,
    /// Records in the treatment group
    pub treatment: usize,
    /// Size of the smaller group (largest balanced sample)
    pub min: usize,
}

impl GroupSummary {
    /// Build a summary from both counts
    pub fn new(control: usize, treatment: usize) -> Self {
        Self {
            control,
            treatment,
            min: control.min(treatment),
        }
    }

    /// Records across both groups
    pub fn total(&self) -> usize {
        self.control + self.treatment
    }
}

/// Cardinality and missingness of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name from the header
    pub name: String,
    /// Distinct non-missing values
    pub unique: usize,
    /// Missing cells
    pub missing: usize,
}

/// Diagnostic overview of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
    /// Per-column statistics in header order
    pub column_summaries: Vec<ColumnSummary>,
    /// Records per group
    pub groups: GroupSummary,
}

impl DatasetSummary {
    /// Column names in header order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.column_summaries.iter().map(|c| c.name.as_str())
    }

    /// Summary for a named column
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.column_summaries.iter().find(|c| c.name == name)
    }

    /// Total missing cells across all columns
    pub fn total_missing(&self) -> usize {
        self.column_summaries.iter().map(|c| c.missing).sum()
    }
}

/// 2x2 table of counts: rows are groups, columns are outcomes (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContingencyTable {
    /// `counts[group.index()][converted as usize]`
    pub counts: [[u64; 2]; 2],
}

impl ContingencyTable {
    /// Build from raw counts `[[control_0, control_1], [treatment_0, treatment_1]]`
    pub fn new(counts: [[u64; 2]; 2]) -> Self {
        Self { counts }
    }

    /// Tally one observation
    pub fn record(&mut self, group: Group, converted: bool) {
        self.counts[group.index()][usize::from(converted)] += 1;
    }

    /// Observations in one group
    pub fn row_total(&self, group: Group) -> u64 {
        self.counts[group.index()].iter().sum()
    }

    /// Observations with one outcome
    pub fn column_total(&self, converted: bool) -> u64 {
        let col = usize::from(converted);
        self.counts[0][col] + self.counts[1][col]
    }

    /// All observations
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Conversions in one group
    pub fn conversions(&self, group: Group) -> u64 {
        self.counts[group.index()][1]
    }

    /// Whether any row or column is empty
    pub fn is_degenerate(&self) -> bool {
        Group::ALL.iter().any(|&g| self.row_total(g) == 0)
            || [false, true].iter().any(|&c| self.column_total(c) == 0)
    }
}
