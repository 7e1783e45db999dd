//! Experiment Dataset
//!
//! In-memory table of experiment rows. Each row keeps its raw cells (for
//! cardinality and missingness reporting) next to the typed record the tests
//! operate on.
//!
//! The group summary is cached, but every method that changes the row set
//! refreshes it before returning, so queries never observe stale counts.
//! A `Dataset` is not internally synchronized: sharing one between threads
//! for mutation requires an external lock.

use crate::error::DatasetError;
use crate::schema::{DatasetSchema, Group, is_missing, parse_outcome};
use crate::summary::{ColumnSummary, ContingencyTable, DatasetSummary, GroupSummary};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Typed view of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentRecord {
    /// Experiment arm
    pub group: Group,
    /// Whether the user converted
    pub converted: bool,
}

impl ExperimentRecord {
    /// Create a record
    pub fn new(group: Group, converted: bool) -> Self {
        Self { group, converted }
    }
}

#[derive(Debug, Clone)]
struct Row {
    record: ExperimentRecord,
    cells: Vec<Option<String>>,
}

/// Loaded experiment data
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: DatasetSchema,
    columns: Vec<String>,
    rows: Vec<Row>,
    groups: GroupSummary,
}

impl Dataset {
    /// Load delimited text from a file
    pub fn from_path(path: impl AsRef<Path>, schema: DatasetSchema) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading dataset");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, schema)
    }

    /// Load delimited text from any reader
    ///
    /// The first line is the header. The group and outcome columns named by
    /// `schema` must be present and hold a valid value on every row.
    pub fn from_reader<R: Read>(reader: R, schema: DatasetSchema) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(schema.delimiter)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(DatasetError::Empty);
        }

        let group_idx = column_index(&columns, &schema.group_column)?;
        let outcome_idx = column_index(&columns, &schema.outcome_column)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let raw = result?;
            // Header is line 1
            let line = raw.position().map_or(i as u64 + 2, |p| p.line());

            let group_cell = raw.get(group_idx).unwrap_or_default();
            let group =
                schema
                    .parse_group(group_cell)
                    .ok_or_else(|| DatasetError::InvalidValue {
                        line,
                        column: schema.group_column.clone(),
                        value: group_cell.to_string(),
                        reason: format!(
                            "expected '{}' or '{}'",
                            schema.control_label, schema.treatment_label
                        ),
                    })?;

            let outcome_cell = raw.get(outcome_idx).unwrap_or_default();
            let converted =
                parse_outcome(outcome_cell).ok_or_else(|| DatasetError::InvalidValue {
                    line,
                    column: schema.outcome_column.clone(),
                    value: outcome_cell.to_string(),
                    reason: "expected 0 or 1".to_string(),
                })?;

            let cells = raw
                .iter()
                .map(|cell| (!is_missing(cell)).then(|| cell.to_string()))
                .collect();

            rows.push(Row {
                record: ExperimentRecord { group, converted },
                cells,
            });
        }

        let mut dataset = Self {
            schema,
            columns,
            rows,
            groups: GroupSummary::default(),
        };
        dataset.refresh_groups();

        info!(
            rows = dataset.len(),
            columns = dataset.columns.len(),
            control = dataset.groups.control,
            treatment = dataset.groups.treatment,
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Build a dataset from typed records
    ///
    /// The resulting table has exactly two columns: the schema's group and
    /// outcome columns.
    pub fn from_records(
        records: impl IntoIterator<Item = ExperimentRecord>,
        schema: DatasetSchema,
    ) -> Self {
        let columns = vec![schema.group_column.clone(), schema.outcome_column.clone()];
        let rows = records
            .into_iter()
            .map(|record| Row {
                cells: vec![
                    Some(schema.label(record.group).to_string()),
                    Some(u8::from(record.converted).to_string()),
                ],
                record,
            })
            .collect();

        let mut dataset = Self {
            schema,
            columns,
            rows,
            groups: GroupSummary::default(),
        };
        dataset.refresh_groups();
        dataset
    }

    /// Remove every row whose identity value was already seen
    ///
    /// The first occurrence in original order is kept. Missing identity
    /// values compare equal to each other. Returns the deduplicated dataset.
    pub fn drop_duplicates(&mut self, identity_column: &str) -> Result<&Self, DatasetError> {
        let idx = column_index(&self.columns, identity_column)?;
        let before = self.rows.len();

        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.cells[idx].clone()));
        self.refresh_groups();

        info!(
            column = identity_column,
            removed = before - self.rows.len(),
            remaining = self.rows.len(),
            "dropped duplicate records"
        );
        Ok(self)
    }

    fn refresh_groups(&mut self) {
        let control = self
            .rows
            .iter()
            .filter(|row| row.record.group == Group::Control)
            .count();
        self.groups = GroupSummary::new(control, self.rows.len() - control);
    }

    /// Shape, per-column cardinality and missingness, and group counts
    pub fn summary(&self) -> DatasetSummary {
        let column_summaries = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let mut distinct = HashSet::new();
                let mut missing = 0;
                for row in &self.rows {
                    match row.cells.get(idx).and_then(Option::as_deref) {
                        Some(value) => {
                            distinct.insert(value);
                        }
                        None => missing += 1,
                    }
                }
                ColumnSummary {
                    name: name.clone(),
                    unique: distinct.len(),
                    missing,
                }
            })
            .collect();

        DatasetSummary {
            rows: self.rows.len(),
            columns: self.columns.len(),
            column_summaries,
            groups: self.groups,
        }
    }

    /// Records per group, always consistent with the current rows
    pub fn group_summary(&self) -> GroupSummary {
        self.groups
    }

    /// Outcomes of one group in original row order
    pub fn group_outcomes(&self, group: Group) -> Vec<bool> {
        self.rows
            .iter()
            .filter(|row| row.record.group == group)
            .map(|row| row.record.converted)
            .collect()
    }

    /// Group x outcome counts over every row
    pub fn contingency_table(&self) -> ContingencyTable {
        let mut table = ContingencyTable::default();
        for row in &self.rows {
            table.record(row.record.group, row.record.converted);
        }
        table
    }

    /// Typed records in row order
    pub fn records(&self) -> impl ExactSizeIterator<Item = ExperimentRecord> + '_ {
        self.rows.iter().map(|row| row.record)
    }

    /// Header of the table
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Schema the dataset was validated against
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(columns: &[String], name: &str) -> Result<usize, DatasetError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| DatasetError::missing_column(name, columns))
}
