//! Dataset Errors

use thiserror::Error;

/// Errors raised while loading or querying a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source could not be opened or read
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The source is not well-formed delimited text
    #[error("Failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header row
    #[error("Dataset is empty: no header row found")]
    Empty,

    /// A required cell holds a value outside its domain
    #[error("Invalid value {value:?} in column '{column}' at line {line}: {reason}")]
    InvalidValue {
        /// 1-based line in the source (the header is line 1)
        line: u64,
        /// Column holding the value
        column: String,
        /// Raw cell content
        value: String,
        /// What was expected instead
        reason: String,
    },

    /// A required column is absent from the header
    #[error("Required column '{column}' not found (available: {available})")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Comma-separated header of the dataset
        available: String,
    },
}

impl DatasetError {
    /// Whether the input could not be turned into a table
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DatasetError::Io(_)
                | DatasetError::Csv(_)
                | DatasetError::Empty
                | DatasetError::InvalidValue { .. }
        )
    }

    /// Whether a required column is missing
    pub fn is_schema_error(&self) -> bool {
        matches!(self, DatasetError::MissingColumn { .. })
    }

    pub(crate) fn missing_column(column: &str, columns: &[String]) -> Self {
        DatasetError::MissingColumn {
            column: column.to_string(),
            available: columns.join(", "),
        }
    }
}
