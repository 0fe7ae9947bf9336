//! Error types for txkeeper-core
//!
//! Only I/O and (de)serialization problems are errors here. A record that
//! does not exist is reported as `None`/`false` by the store, never as an
//! error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Data file could not be read or written
    IoError,
    /// Data file content is not a valid record list
    ParseError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: impl ToString, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
            suggestions: vec![],
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for txkeeper-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl CoreError {
    pub(crate) fn io(path: &std::path::Path, error: std::io::Error) -> Self {
        CoreError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Io { .. } => ErrorCode::IoError,
            CoreError::Parse { .. } => ErrorCode::ParseError,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Io { .. } => details
                .with_suggestion("Ensure the data file directory exists and is writable.".to_string()),
            CoreError::Parse { .. } => details.with_suggestion(
                "The data file must contain a JSON array of transactions.".to_string(),
            ),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Parse {
            message: error.to_string(),
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
