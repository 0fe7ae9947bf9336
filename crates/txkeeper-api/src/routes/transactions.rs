//! Transaction endpoints
//!
//! Every handler requires an [`AuthenticatedUser`]. Store calls do blocking
//! file I/O and run on the blocking thread pool.

use super::login::AuthenticatedUser;
use crate::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use txkeeper_core::{parse_timestamp, CoreResult, Transaction, TransactionStore};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&TransactionStore) -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| ApiError::InternalError {
            message: e.to_string(),
        })?
        .map_err(ApiError::from)
}

fn not_found(id: impl std::fmt::Display) -> ApiError {
    ApiError::NotFound {
        resource: format!("transaction {}", id),
    }
}

/// GET /api/transactions
pub async fn list_transactions(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    with_store(&state, |store| store.get_all()).await.map(Json)
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let lookup = id.clone();
    with_store(&state, move |store| store.get_by_id(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// GET /api/transactions/GetByApplicationId/:application_id
pub async fn transactions_by_application_id(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(application_id): Path<i32>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    with_store(&state, move |store| store.get_by_application_id(application_id))
        .await
        .map(Json)
}

/// GET /api/transactions/GetByType/:type
pub async fn transactions_by_type(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    with_store(&state, move |store| store.get_by_type(&kind))
        .await
        .map(Json)
}

/// GET /api/transactions/GetByPostingDate/:posting_date
pub async fn transactions_by_posting_date(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(posting_date): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let posting_date = parse_timestamp(&posting_date).map_err(|e| ApiError::BadRequest {
        message: format!("invalid posting date '{}': {}", posting_date, e),
    })?;
    with_store(&state, move |store| store.get_by_posting_date(posting_date))
        .await
        .map(Json)
}

/// POST /api/transactions
pub async fn create_transaction(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(transaction): Json<Transaction>,
) -> Result<impl IntoResponse, ApiError> {
    let id = with_store(&state, move |store| store.create(transaction)).await?;
    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/transactions/{}", id))],
        Json(CreatedResponse { id }),
    ))
}

/// PUT /api/transactions
pub async fn update_transaction(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(transaction): Json<Transaction>,
) -> Result<Json<Transaction>, ApiError> {
    let id = transaction.id;
    with_store(&state, move |store| store.update(&transaction))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/transactions/UpdateClearedStatusForTransaction
pub async fn update_cleared_status(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(transaction): Json<Transaction>,
) -> Result<Json<Transaction>, ApiError> {
    let id = transaction.id;
    with_store(&state, move |store| store.update_cleared_status(&transaction))
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let target = id.clone();
    if with_store(&state, move |store| store.delete(&target)).await? {
        Ok(Json(true))
    } else {
        Err(not_found(id))
    }
}
