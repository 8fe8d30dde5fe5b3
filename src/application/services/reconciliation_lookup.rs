//! Lookup of an existing live record for a URL.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkStore, StoreError, StoreResult};

/// Finds the short code already assigned to a normalized URL.
///
/// There is no URL index: every lookup lists the keyspace and loads records
/// one by one until it finds a match.
pub struct ReconciliationLookup<S: LinkStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LinkStore + ?Sized> ReconciliationLookup<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the first live record whose `original_url` equals
    /// `normalized_url` byte for byte, in store iteration order.
    ///
    /// Expired matches are skipped but not deleted. Keys that disappear
    /// between listing and loading, and values that fail to deserialize,
    /// are skipped as well.
    pub async fn find_existing(
        &self,
        normalized_url: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<(String, LinkRecord)>> {
        for code in self.store.list_keys().await? {
            let record = match self.store.get(&code).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(StoreError::Serialization(e)) => {
                    warn!(code = %code, error = %e, "Skipping unreadable link record");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if record.original_url == normalized_url && !record.is_expired(now) {
                return Ok(Some((code, record)));
            }
        }

        Ok(None)
    }
}
