//! Error types for PayTrackr

use thiserror::Error;

/// Field of a transaction record that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationField {
    Date,
    Amount,
}

impl ValidationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

impl std::fmt::Display for ValidationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// A specific record carried a malformed value. Carries the transaction
    /// id and field so the caller can log or drop the record.
    #[error("Invalid {field} in transaction {id}: {reason}")]
    Validation {
        id: String,
        field: ValidationField,
        reason: String,
    },

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
