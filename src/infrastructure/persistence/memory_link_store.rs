//! In-process link store.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkStore, StoreResult};

/// Concurrent in-memory table of link records.
///
/// Uses sharded locks, so operations on different codes rarely contend.
/// Contents live as long as the process; there is no persistence.
#[derive(Debug, Default)]
pub struct MemoryLinkStore {
    records: DashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn get(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        Ok(self.records.get(code).map(|entry| entry.value().clone()))
    }

    async fn set(&self, code: &str, record: LinkRecord) -> StoreResult<()> {
        self.records.insert(code.to_owned(), record);
        Ok(())
    }

    async fn delete(&self, code: &str) -> StoreResult<()> {
        self.records.remove(code);
        Ok(())
    }

    async fn list_keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.records.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
