//! API route configuration.

use crate::api::handlers::{
    cleanup_handler, health_handler, info_handler, redirect_handler, shorten_handler,
    stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes. There is no authentication.
///
/// # Endpoints
///
/// - `GET  /`              - Service information
/// - `POST /shorten`       - Create a short link
/// - `GET  /stats/{code}`  - Statistics for a link
/// - `GET  /cleanup`       - Delete expired links
/// - `GET  /api/health`    - Health check (also `/health`)
/// - `GET  /{code}`        - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(info_handler))
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/cleanup", get(cleanup_handler))
        .route("/api/health", get(health_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
