//! Error types for txkeeper-auth
//!
//! Rejected credentials are not an error; `authenticate` returns `false`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// A signing setting is unusable, so no token can be issued
    #[error("Configuration value out of range: {field} - {reason}")]
    ConfigurationOutOfRange { field: String, reason: String },

    #[error("Failed to sign token: {message}")]
    Signing { message: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },
}

impl AuthError {
    pub(crate) fn out_of_range(field: &str, reason: impl Into<String>) -> Self {
        AuthError::ConfigurationOutOfRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::ConfigurationOutOfRange { .. } => "CONFIGURATION_OUT_OF_RANGE",
            AuthError::Signing { .. } => "SIGNING_ERROR",
            AuthError::InvalidToken { .. } => "INVALID_TOKEN",
        }
    }
}

/// Result type with AuthError
pub type AuthResult<T> = Result<T, AuthError>;
