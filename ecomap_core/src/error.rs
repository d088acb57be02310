//! Error types for ecomap construction

use thiserror::Error;

use case_records::RecordError;

/// Result type alias using the ecomap error
pub type Result<T> = std::result::Result<T, EcomapError>;

#[derive(Error, Debug)]
pub enum EcomapError {
    #[error(transparent)]
    Records(#[from] RecordError),

    /// Strict validation rejected the record-set. Holds every message.
    #[error("Record-set failed validation with {} error(s):\n{}", .0.len(), .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EcomapError {
    /// True when the input had no person section.
    pub fn is_missing_person(&self) -> bool {
        matches!(self, EcomapError::Records(RecordError::MissingPerson))
    }
}
