//! Redis-backed link store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::{LinkStore, StoreError, StoreResult};

/// Keys fetched per SCAN round trip.
const SCAN_BATCH: usize = 500;

/// Redis link store.
///
/// Each record is a JSON string under `"{key_prefix}{code}"`. Connection
/// reuse and reconnects are handled by `ConnectionManager`. Errors are
/// returned to the caller; retries are the client's business.
pub struct RedisLinkStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisLinkStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> StoreResult<Self> {
        info!("Connecting to Redis link store");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn build_key(&self, code: &str) -> String {
        build_key(&self.key_prefix, code)
    }
}

fn build_key(prefix: &str, code: &str) -> String {
    format!("{}{}", prefix, code)
}

/// SCAN pattern matching every key under `prefix`, with glob metacharacters escaped.
fn scan_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

fn command_error(op: &str, code: &str, e: redis::RedisError) -> StoreError {
    StoreError::Command(format!("{} {}: {}", op, code, e))
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn get(&self, code: &str) -> StoreResult<Option<LinkRecord>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| command_error("GET", code, e))?;

        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, code: &str, record: LinkRecord) -> StoreResult<()> {
        let key = self.build_key(code);
        let payload = serde_json::to_string(&record)?;
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&key, payload)
            .await
            .map_err(|e| command_error("SET", code, e))?;

        debug!(code = %code, "Stored link record");
        Ok(())
    }

    async fn delete(&self, code: &str) -> StoreResult<()> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        conn.del::<_, i64>(&key)
            .await
            .map_err(|e| command_error("DEL", code, e))?;

        Ok(())
    }

    async fn list_keys(&self) -> StoreResult<Vec<String>> {
        let pattern = scan_pattern(&self.key_prefix);
        let mut conn = self.client.clone();
        let mut cursor: u64 = 0;
        let mut codes = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| command_error("SCAN", &pattern, e))?;

            codes.extend(
                batch
                    .into_iter()
                    .filter_map(|key| key.strip_prefix(&self.key_prefix).map(str::to_owned)),
            );

            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once while the keyspace is rehashing.
        codes.sort_unstable();
        codes.dedup();

        Ok(codes)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
