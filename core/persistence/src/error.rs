//! FILENAME: core/persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported data shape: {0}")]
    UnsupportedShape(String),

    #[error("Invalid count for document '{document}', word-group '{topic}': {value}")]
    InvalidCount {
        document: String,
        topic: String,
        value: String,
    },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unsupported session version: {0}")]
    SessionVersion(u32),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
