use axum::{Json, extract::State};
use std::collections::BTreeMap;

use crate::api::dto::info::ServiceInfo;
use crate::state::AppState;

/// `GET /` - service name, version, storage backend and endpoint listing.
pub async fn info_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("GET /", "Service information"),
        ("POST /shorten", "Create a shortened URL"),
        ("GET /{short_code}", "Redirect to the original URL"),
        ("GET /stats/{short_code}", "Get statistics for a shortened URL"),
        ("GET /cleanup", "Remove expired URLs"),
        ("GET /api/health", "Health check"),
    ]);

    Json(ServiceInfo {
        service: "TTL URL Shortener",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.link_service.store().backend(),
        endpoints,
    })
}
