use axum::{Json, extract::State};

use crate::api::dto::cleanup::CleanupResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Deletes all expired links.
///
/// `GET /cleanup` responds with `{"removed": n}`. Running it again right
/// away returns `0`.
pub async fn cleanup_handler(
    State(state): State<AppState>,
) -> Result<Json<CleanupResponse>, AppError> {
    let removed = state.link_service.cleanup().await?;

    Ok(Json(CleanupResponse { removed }))
}
