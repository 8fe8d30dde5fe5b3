//! Key-value store trait mapping short codes to link records.

use crate::domain::entities::LinkRecord;
use async_trait::async_trait;

/// Errors raised by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Code → record mapping.
///
/// Each operation is atomic on its own key. There are no multi-key
/// transactions: a get-then-set sequence can interleave with other writers
/// unless the caller serializes access to the key (see
/// [`crate::utils::key_locks::KeyLocks`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process table
/// - [`crate::infrastructure::persistence::RedisLinkStore`] - Redis, one JSON value per code
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Loads the record stored under `code`, expired or not.
    async fn get(&self, code: &str) -> StoreResult<Option<LinkRecord>>;

    /// Stores `record` under `code`, replacing any previous value.
    async fn set(&self, code: &str, record: LinkRecord) -> StoreResult<()>;

    /// Removes `code`. Deleting a missing key is not an error.
    async fn delete(&self, code: &str) -> StoreResult<()>;

    /// Lists every stored code at the time of the call, in no particular order.
    ///
    /// Cost is linear in the number of stored keys.
    async fn list_keys(&self) -> StoreResult<Vec<String>>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
