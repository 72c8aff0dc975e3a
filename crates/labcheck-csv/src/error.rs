//! Loader error types

use thiserror::Error;

/// Result type for document loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Structural errors that abort a document load
///
/// Row-level anomalies (unparseable literals, unknown entry types, spacer
/// lines) are absorbed during the load and never appear here.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Document has no metadata or header line
    #[error("Document is empty or truncated before the header line")]
    EmptyDocument,

    /// Header line lacks mandatory columns
    #[error("Missing required columns: {0}")]
    MissingColumns(String),

    /// Two trial cells claim the same data tag
    #[error("Duplicate data tag '{tag}' (rows {first} and {second})")]
    DuplicateDataTag {
        tag: String,
        first: u32,
        second: u32,
    },
}
