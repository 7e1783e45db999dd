#![warn(missing_docs)]
//! Splitstat Dataset Handling
//!
//! Loads A/B experiment records into memory and answers the questions the
//! hypothesis tests need:
//! - Delimited-text ingestion with load-time schema validation
//! - Deduplication by an identity column (first occurrence wins)
//! - Shape, cardinality and missingness summaries
//! - Per-group record counts and the group x outcome contingency table

mod dataset;
mod error;
mod schema;
mod summary;

pub use dataset::{Dataset, ExperimentRecord};
pub use error::DatasetError;
pub use schema::{DatasetSchema, Group, is_missing};
pub use summary::{ColumnSummary, ContingencyTable, DatasetSummary, GroupSummary};

/// Identity column used by deduplication when none is configured
pub const DEFAULT_IDENTITY_COLUMN: &str = "user_id";

/// Default name of the group label column
pub const DEFAULT_GROUP_COLUMN: &str = "group";

/// Default name of the binary outcome column
pub const DEFAULT_OUTCOME_COLUMN: &str = "converted";
