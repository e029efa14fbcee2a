//! HTTP API for content analysis and splitting.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub use handlers::{ApiError, AppState};

/// Build the service routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Settings
        .route(
            "/config",
            get(handlers::get_config).put(handlers::update_config),
        )
        // Analysis
        .route("/analyze", post(handlers::analyze))
        .route("/split", post(handlers::split))
        .with_state(state)
}
