use aq_utils::dates::DateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AqError {
    /// A row at the ingestion boundary failed validation.
    #[error("invalid input at line {line}: {reason}")]
    InvalidInput { line: u64, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Date(#[from] DateError),
}

impl AqError {
    pub fn invalid_input(line: u64, reason: impl Into<String>) -> Self {
        AqError::InvalidInput {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AqError>;
