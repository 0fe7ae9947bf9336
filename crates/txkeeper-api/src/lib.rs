//! HTTP API server
//!
//! Routes are organized into modules:
//! - routes::login: POST /login and the bearer token extractor
//! - routes::transactions: /api/transactions CRUD

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use txkeeper_auth::TokenIssuer;
use txkeeper_config::Config;
use txkeeper_core::TransactionStore;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TransactionStore>,
    pub issuer: Arc<TokenIssuer>,
    pub config: Config,
}

impl AppState {
    /// Build the store and issuer described by `config`
    pub fn from_config(config: Config) -> Self {
        Self {
            store: Arc::new(TransactionStore::from_config(&config.data)),
            issuer: Arc::new(TokenIssuer::from_config(&config)),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::login::login;
    use routes::transactions::{
        create_transaction, delete_transaction, get_transaction, list_transactions,
        transactions_by_application_id, transactions_by_posting_date, transactions_by_type,
        update_cleared_status, update_transaction,
    };

    Router::new()
        .route("/api/health", get(health_check))
        .route("/login", post(login))
        .route(
            "/api/transactions",
            get(list_transactions)
                .post(create_transaction)
                .put(update_transaction),
        )
        .route(
            "/api/transactions/UpdateClearedStatusForTransaction",
            put(update_cleared_status),
        )
        .route(
            "/api/transactions/GetByApplicationId/:application_id",
            get(transactions_by_application_id),
        )
        .route("/api/transactions/GetByType/:type", get(transactions_by_type))
        .route(
            "/api/transactions/GetByPostingDate/:posting_date",
            get(transactions_by_posting_date),
        )
        .route(
            "/api/transactions/:id",
            get(get_transaction).delete(delete_transaction),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Bind the configured address and serve until the process stops
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_addr();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txkeeper server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - POST /login (Access token)");
    log::info!("  - /api/transactions (Transaction records, bearer token required)");

    axum::serve(listener, router).await
}
