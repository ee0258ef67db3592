//! FILENAME: core/persistence/src/lib.rs
//! Wordbags Persistence Module
//!
//! Reads the loosely-shaped JSON that corpus builds and evaluation responses
//! arrive in, saves and loads sessions, and exports derived tables to XLSX.

mod corpus_import;
mod error;
mod evaluation;
mod ids;
mod session;
mod wordbags;
mod xlsx_writer;

pub use corpus_import::import_corpus;
pub use error::{PersistenceError, Result};
pub use evaluation::{detect_shape, normalize_evaluation, EvaluationShape, ShapeHint};
pub use ids::{classify_id, common_namespace, looks_like_document_id, value_to_id};
pub use session::{SessionFile, SESSION_VERSION};
pub use wordbags::{export_wordbags, import_wordbags, load_wordbags, save_wordbags};
pub use xlsx_writer::save_table_xlsx;

use corpus::Corpus;
use serde_json::Value;
use std::path::Path;

// ============================================================================
// FILE HELPERS
// ============================================================================

/// Reads and parses a JSON file.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Reads a corpus table from a JSON file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    import_corpus(&load_json(path)?)
}

/// Reads an evaluation response from a JSON file.
pub fn load_evaluation(path: &Path, hint: &ShapeHint) -> Result<corpus::EvaluationResult> {
    normalize_evaluation(&load_json(path)?, hint)
}
