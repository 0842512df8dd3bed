use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::GeometryError;

#[derive(Error, Debug)]
pub enum RasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Unexpected result from {query}: {detail}")]
    UnexpectedResult { query: String, detail: String },

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Geometry parse error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),

    #[error("Output file already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A required export field is missing or cannot be rendered into the
/// fixed grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("field {field} contains a line break: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("count for {layer} is not a non-negative integer: {value}")]
    NonNumericCount { layer: String, value: String },

    #[error("{layer} count is {expected} but {actual} rows were supplied")]
    CountMismatch {
        layer: &'static str,
        expected: u64,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RasError>;
