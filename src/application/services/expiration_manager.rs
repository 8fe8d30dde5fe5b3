//! Eager removal of expired link records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::repositories::{LinkStore, StoreError, StoreResult};
use crate::error::AppError;
use crate::utils::key_locks::KeyLocks;

/// Deletes expired records, one key at a time.
///
/// Every deletion happens under the code's lock after re-reading the record,
/// so a record renewed by a concurrent create is never removed.
pub struct ExpirationManager<S: LinkStore + ?Sized> {
    store: Arc<S>,
    locks: Arc<KeyLocks>,
}

impl<S: LinkStore + ?Sized> ExpirationManager<S> {
    pub fn new(store: Arc<S>, locks: Arc<KeyLocks>) -> Self {
        Self { store, locks }
    }

    /// Walks the whole keyspace and deletes every record expired at `now`.
    ///
    /// Returns the number of records removed by this call. The walk is not
    /// atomic: keys written after the listing are not visited, and keys
    /// deleted meanwhile by someone else are not counted.
    ///
    /// Records that fail to deserialize are logged and left in place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be listed or a
    /// get/delete fails for a reason other than a corrupt value.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let codes = self.store.list_keys().await?;
        let mut removed = 0;

        for code in &codes {
            match self.evict_if_expired(code, now).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(StoreError::Serialization(e)) => {
                    warn!(code = %code, error = %e, "Skipping unreadable link record during sweep");
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(scanned = codes.len(), removed, "Expiration sweep finished");
        Ok(removed)
    }

    /// Deletes `code` if it is still present and expired at `now`.
    ///
    /// Returns `true` when this call removed the record.
    ///
    /// Takes the code's lock, so it must not be called while the caller
    /// already holds it.
    pub async fn evict_if_expired(&self, code: &str, now: DateTime<Utc>) -> StoreResult<bool> {
        let _guard = self.locks.lock(code).await;

        let expired = match self.store.get(code).await? {
            Some(record) => record.is_expired(now),
            None => false,
        };

        if expired {
            self.store.delete(code).await?;
            debug!(code = %code, "Evicted expired link");
        }

        Ok(expired)
    }
}
