//! Dataset Schema
//!
//! Names the columns and labels a dataset must carry. Validation happens once
//! at load time so that every row in memory maps to exactly one group and a
//! definite 0/1 outcome.

use crate::{DEFAULT_GROUP_COLUMN, DEFAULT_OUTCOME_COLUMN};
use serde::{Deserialize, Serialize};

/// Cell contents treated as missing values
const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Experiment arm a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Users who saw the existing experience
    Control,
    /// Users who saw the variant
    Treatment,
}

impl Group {
    /// Both groups in table order (control first)
    pub const ALL: [Group; 2] = [Group::Control, Group::Treatment];

    /// Row index of this group in a contingency table
    pub fn index(self) -> usize {
        match self {
            Group::Control => 0,
            Group::Treatment => 1,
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Control => write!(f, "control"),
            Group::Treatment => write!(f, "treatment"),
        }
    }
}

/// Column names and labels expected in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    /// Column holding the group label
    pub group_column: String,
    /// Column holding the 0/1 outcome
    pub outcome_column: String,
    /// Label identifying control rows
    pub control_label: String,
    /// Label identifying treatment rows
    pub treatment_label: String,
    /// Field delimiter of the source
    pub delimiter: u8,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            outcome_column: DEFAULT_OUTCOME_COLUMN.to_string(),
            control_label: "control".to_string(),
            treatment_label: "treatment".to_string(),
            delimiter: b',',
        }
    }
}

impl DatasetSchema {
    /// Schema for tab-separated input with default column names
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    /// Map a raw label to a group
    pub fn parse_group(&self, raw: &str) -> Option<Group> {
        let raw = raw.trim();
        if raw == self.control_label {
            Some(Group::Control)
        } else if raw == self.treatment_label {
            Some(Group::Treatment)
        } else {
            None
        }
    }

    /// Label written for a group
    pub fn label(&self, group: Group) -> &str {
        match group {
            Group::Control => &self.control_label,
            Group::Treatment => &self.treatment_label,
        }
    }
}

/// Parse a binary outcome cell
pub(crate) fn parse_outcome(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "True" | "TRUE" => Some(true),
        "0" | "false" | "False" | "FALSE" => Some(false),
        other => match other.parse::<f64>() {
            Ok(v) if v == 1.0 => Some(true),
            Ok(v) if v == 0.0 => Some(false),
            _ => None,
        },
    }
}

/// Whether a raw cell counts as a missing value
pub fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || MISSING_TOKENS.contains(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        let schema = DatasetSchema::default();
        assert_eq!(schema.parse_group("control"), Some(Group::Control));
        assert_eq!(schema.parse_group(" treatment "), Some(Group::Treatment));
        assert_eq!(schema.parse_group("Control"), None);
        assert_eq!(schema.parse_group(""), None);
    }

    #[test]
    fn test_custom_labels() {
        let schema = DatasetSchema {
            control_label: "A".to_string(),
            treatment_label: "B".to_string(),
            ..Default::default()
        };
        assert_eq!(schema.parse_group("B"), Some(Group::Treatment));
        assert_eq!(schema.label(Group::Control), "A");
        assert_eq!(schema.parse_group("control"), None);
    }

    #[test]
    fn test_parse_outcome() {
        assert_eq!(parse_outcome("1"), Some(true));
        assert_eq!(parse_outcome("0"), Some(false));
        assert_eq!(parse_outcome("1.0"), Some(true));
        assert_eq!(parse_outcome("false"), Some(false));
        assert_eq!(parse_outcome("2"), None);
        assert_eq!(parse_outcome("yes"), None);
        assert_eq!(parse_outcome(""), None);
    }

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing(""));
        assert!(is_missing("  "));
        assert!(is_missing("NA"));
        assert!(is_missing("NaN"));
        assert!(!is_missing("0"));
        assert!(!is_missing("none"));
    }

    #[test]
    fn test_group_order() {
        assert_eq!(Group::ALL[Group::Control.index()], Group::Control);
        assert_eq!(Group::ALL[Group::Treatment.index()], Group::Treatment);
        assert_eq!(Group::Treatment.to_string(), "treatment");
    }
}
