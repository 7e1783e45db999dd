//! Analysis Executor
//!
//! Turns a loaded dataset into a report and renders it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Dataset (loaded, optionally deduplicated)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  analysis   │  Summary, sampled z-test, full-data chi-squared
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! JSON and CSV rendering live in `splitstat-report`.

mod analysis;
mod formatting;

pub use analysis::{analyze, plan_sample_size, run_all, summarize};
pub use formatting::{SEPARATOR_WIDTH, format_human_output};
