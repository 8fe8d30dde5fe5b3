//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::{base_url_from_headers, short_url};

/// Creates a short link, or returns the live one for the same URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/a",
///   "expiration_days": 5
/// }
/// ```
///
/// `expiration_days` is optional (1-365). When the URL already has a live
/// short link, that code is returned and a given `expiration_days` resets
/// its expiry to now plus that many days.
///
/// # Response
///
/// **201 Created** for a new code, **200 OK** for an existing one:
///
/// ```json
/// {
///   "original_url": "https://example.com/a",
///   "short_code": "aB3dE9",
///   "short_url": "https://sho.rt/aB3dE9",
///   "expiration_date": "2026-01-06T00:00:00Z",
///   "access_count": 0
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed, the URL is invalid or
/// `expiration_days` is out of range. Returns 503 if no free code was found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let base_url = match &state.base_url {
        Some(base_url) => base_url.clone(),
        None => base_url_from_headers(&headers)?,
    };

    let link = state
        .link_service
        .create_short_link(&payload.url, payload.expiration_days)
        .await?;

    let status = if link.reused {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let short_url = short_url(&base_url, &link.code);

    Ok((status, Json(ShortenResponse::new(link, short_url))))
}
