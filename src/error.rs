//! Error types
//!
//! The projection engine is total and has no error type. Failures only come
//! from reading external state: encoded query strings, year-month text and the
//! saved scenario library.

use thiserror::Error;

/// Encoded state could not be read; the whole decode is discarded
#[derive(Debug, Error, Clone, PartialEq)]
#[error("unparseable state at `{key}`: {reason}")]
pub struct DecodeError {
    pub key: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(key: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

/// Year-month text that is not `YYYY-MM`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid year-month `{0}`, expected YYYY-MM")]
pub struct YearMonthError(pub String);

/// Scenario library failures
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("scenario not found: {0}")]
    NotFound(String),

    #[error("scenario library is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario library I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
