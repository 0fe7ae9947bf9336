//! Login endpoint and bearer token extraction

use crate::{ApiError, AppState};
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use txkeeper_auth::Claims;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, alias = "UserName")]
    pub user_name: String,
    #[serde(default, alias = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl LoginResponse {
    fn failure(message: &str) -> Self {
        Self {
            token: String::new(),
            message: message.to_string(),
            is_success: false,
            expiration_date: None,
        }
    }
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> (StatusCode, Json<LoginResponse>) {
    let request = match body {
        Ok(Json(request))
            if !request.user_name.trim().is_empty() && !request.password.trim().is_empty() =>
        {
            request
        }
        _ => {
            log::error!("Invalid login request or missing user name / password");
            return (
                StatusCode::BAD_REQUEST,
                Json(LoginResponse::failure(
                    "Invalid Login Request or Invalid Username or Password.",
                )),
            );
        }
    };

    if !state.issuer.authenticate(&request.user_name, &request.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse::failure("Invalid Username or Password.")),
        );
    }

    match state.issuer.issue_token(&request.user_name) {
        Ok(issued) => (
            StatusCode::OK,
            Json(LoginResponse {
                token: issued.token,
                message: "Login successful.".to_string(),
                is_success: true,
                expiration_date: Some(issued.expires_at),
            }),
        ),
        Err(e) => {
            log::error!("Token issuance failed for user {}: {}", request.user_name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::failure("Token could not be issued.")),
            )
        }
    }
}

/// Caller identity taken from a valid `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiError::Unauthorized {
                message: "missing bearer token".to_string(),
            })?;

        state
            .issuer
            .validate_token(token)
            .map(AuthenticatedUser)
            .map_err(|e| {
                log::warn!("Rejected bearer token: {}", e);
                ApiError::Unauthorized {
                    message: e.to_string(),
                }
            })
    }
}

/// Token part of an `Authorization` value; the scheme name is case-insensitive
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
