//! Error types for txkeeper-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use txkeeper_core::{CoreError, ErrorDetails};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error(transparent)]
    Store(#[from] CoreError),

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> ErrorDetails {
        match self {
            ApiError::Store(e) => e.to_details(),
            ApiError::NotFound { .. } => ErrorDetails::new("NOT_FOUND", self.to_string()),
            ApiError::BadRequest { .. } => ErrorDetails::new("BAD_REQUEST", self.to_string()),
            ApiError::Unauthorized { .. } => ErrorDetails::new("UNAUTHORIZED", self.to_string()),
            ApiError::InternalError { .. } => ErrorDetails::new("INTERNAL_ERROR", self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        (status, Json(self.details())).into_response()
    }
}
