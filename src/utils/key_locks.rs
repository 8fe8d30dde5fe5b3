//! Per-key async mutual exclusion.
//!
//! The store only guarantees atomicity of single get/set/delete calls. The
//! service wraps each read-modify-write sequence on a key in a [`KeyGuard`]
//! so two tasks in this process never interleave on the same key.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A table of lazily created mutexes, one per key.
///
/// Entries are removed when the last guard for a key is dropped and nobody
/// is waiting, so the table only holds keys that are currently in use. This
/// includes waits that are cancelled before the lock is acquired.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Exclusive access to one key until dropped.
#[derive(Debug)]
pub struct KeyGuard<'a> {
    owner: &'a KeyLocks,
    key: String,
    mutex: Option<Arc<Mutex<()>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free, then holds it.
    ///
    /// Not reentrant: locking a key already held by the same task deadlocks.
    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        // The shard lock taken by `entry` must be released before awaiting.
        let mutex = self.locks.entry(key.to_owned()).or_default().clone();

        // Built before the wait so dropping this future still prunes the entry.
        let mut held = KeyGuard {
            owner: self,
            key: key.to_owned(),
            mutex: Some(mutex.clone()),
            guard: None,
        };
        held.guard = Some(mutex.lock_owned().await);

        held
    }

    /// Number of keys currently locked or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        drop(self.mutex.take());
        // Only the table's own reference left means no holder and no waiter.
        self.owner
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
