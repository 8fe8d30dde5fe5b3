//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::CreatedLink;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Lifetime in days. Defaults to the configured TTL when omitted.
    #[validate(range(min = 1, max = 365, message = "Expiration must be between 1 and 365 days"))]
    pub expiration_days: Option<i64>,
}

/// A short link as returned by `POST /shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub expiration_date: DateTime<Utc>,
    pub access_count: u64,
}

impl ShortenResponse {
    pub fn new(link: CreatedLink, short_url: String) -> Self {
        Self {
            original_url: link.record.original_url,
            short_code: link.code,
            short_url,
            expiration_date: link.record.expiration_at,
            access_count: link.record.access_count,
        }
    }
}
