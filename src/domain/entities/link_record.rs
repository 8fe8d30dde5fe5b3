//! Link record entity: the value stored under each short code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL mapping with its lifetime and access counter.
///
/// This is also the persisted layout: remote stores keep it as a flat JSON
/// object with RFC 3339 timestamps. Records written by older deployments
/// under `expiration_date`, with naive ISO-8601 timestamps or without an
/// `access_count` are still readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub original_url: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp", alias = "expiration_date")]
    pub expiration_at: DateTime<Utc>,
    #[serde(default)]
    pub access_count: u64,
}

impl LinkRecord {
    /// Creates a fresh record expiring `ttl` after `created_at`.
    pub fn new(original_url: String, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            original_url,
            created_at,
            expiration_at: created_at + ttl,
            access_count: 0,
        }
    }

    /// Returns true once `now` is strictly past `expiration_at`.
    ///
    /// A record expiring exactly at `now` is still live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_at < now
    }

    /// Counts one successful resolve.
    pub fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }

    /// Moves the expiry to `now + ttl`.
    pub fn renew(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.expiration_at = now + ttl;
    }
}

/// Outcome of a create request.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub code: String,
    pub record: LinkRecord,
    /// True when an existing live record for the same URL was returned.
    pub reused: bool,
}

/// Read-only statistics for a single short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiration_at: DateTime<Utc>,
    pub access_count: u64,
}

impl LinkStats {
    pub fn new(short_code: String, record: LinkRecord) -> Self {
        Self {
            short_code,
            original_url: record.original_url,
            created_at: record.created_at,
            expiration_at: record.expiration_at,
            access_count: record.access_count,
        }
    }
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Accepts RFC 3339 and offset-less ISO-8601 (read as UTC).
    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
    }
}
