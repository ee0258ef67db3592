//! FILENAME: core/pivot-engine/src/lib.rs
//! Word-group table subsystem.
//!
//! This crate turns per-document word-group counts into the tables and
//! chart series the front end renders. It depends on `corpus` only for
//! shared types (EvaluationResult, MetadataIndex, YearBin, collation).
//!
//! Layers:
//! - `definition`: Serializable view options (what the user asked for)
//! - `view`: Renderable output for the front end (WHAT we display)
//! - `engine`: Row/column builders and the full derivation (HOW we calculate)
//! - `sort`, `page`: Ordering, threshold filtering and paging
//! - `chart`: Line chart series for pivoted tables
//!
//! Every entry point is a pure function of its inputs.

pub mod definition;
pub mod view;
pub mod engine;
pub mod sort;
pub mod page;
pub mod chart;

pub use definition::*;
pub use view::*;
pub use engine::{build_document_table, build_table, build_year_pivot, derive_view};
pub use sort::{resolve_sort_target, sort_rows, SortTarget};
pub use page::{apply_threshold, clamp_page_index, page_count, paginate};
pub use chart::extract_chart;
