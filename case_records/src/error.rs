//! Error types for record-set handling.

use thiserror::Error;

/// Result type alias for record-set operations.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Failures that make a record-set unusable as a whole.
///
/// Field-level problems are never reported here; they surface as
/// validation messages or empty normalized values instead.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Person section is missing from the record-set")]
    MissingPerson,

    #[error("Record-set JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
