//! DTOs for link statistics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::LinkStats;

/// Statistics of a single short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub original_url: String,
    pub short_code: String,
    pub expiration_date: DateTime<Utc>,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            original_url: stats.original_url,
            short_code: stats.short_code,
            expiration_date: stats.expiration_at,
            access_count: stats.access_count,
            created_at: stats.created_at,
        }
    }
}
