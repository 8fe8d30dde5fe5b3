//! Short link creation, resolution, statistics and cleanup.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{debug, info};

use super::expiration_manager::ExpirationManager;
use super::reconciliation_lookup::ReconciliationLookup;
use crate::domain::clock::Clock;
use crate::domain::entities::{CreatedLink, LinkRecord, LinkStats};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::key_locks::{KeyGuard, KeyLocks};
use crate::utils::url_normalizer::normalize_url;

pub const MIN_TTL_DAYS: i64 = 1;
pub const MAX_TTL_DAYS: i64 = 365;
pub const DEFAULT_TTL_DAYS: i64 = 7;
pub const DEFAULT_MAX_CODE_ATTEMPTS: usize = 10;

/// Immutable service configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    pub generator: CodeGenerator,
    /// Lifetime applied when a create request carries no TTL.
    pub default_ttl_days: i64,
    /// Candidate codes tried before giving up with `CapacityExhausted`.
    pub max_code_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            generator: CodeGenerator::default(),
            default_ttl_days: DEFAULT_TTL_DAYS,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }
}

/// Service behind every public operation on short links.
///
/// The store only makes single get/set/delete calls atomic. Every
/// read-modify-write sequence here runs under a [`KeyLocks`] guard:
///
/// - resolve and stats lock the code
/// - create locks `url:{normalized}` for the whole call, then the code it
///   extends or writes
/// - eviction locks the code and re-reads before deleting
///
/// Locks are always taken URL first, code second. They are process-local;
/// several processes sharing one Redis keyspace can still interleave.
pub struct LinkService<S: LinkStore + ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    settings: ShortenerSettings,
    locks: Arc<KeyLocks>,
    expiration: ExpirationManager<S>,
    reconciliation: ReconciliationLookup<S>,
}

impl<S: LinkStore + ?Sized> LinkService<S> {
    /// Creates a new link service.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, settings: ShortenerSettings) -> Self {
        let locks = Arc::new(KeyLocks::new());

        Self {
            expiration: ExpirationManager::new(store.clone(), locks.clone()),
            reconciliation: ReconciliationLookup::new(store.clone()),
            store,
            clock,
            settings,
            locks,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Creates a short link, or returns the live one already assigned to the URL.
    ///
    /// # Deduplication
    ///
    /// Before creating, expired records are swept and the store is scanned
    /// for a live record with the same normalized URL. When one is found its
    /// code is returned with [`CreatedLink::reused`] set. A requested TTL
    /// then moves its expiry to `now + ttl_days`, which may shorten it; with
    /// no TTL the expiry is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `ttl_days` is outside `1..=365`
    /// - `url` is not an absolute http(s) URL
    ///
    /// Returns [`AppError::CapacityExhausted`] if no free code was found in
    /// `max_code_attempts` tries.
    pub async fn create_short_link(
        &self,
        url: &str,
        ttl_days: Option<i64>,
    ) -> Result<CreatedLink, AppError> {
        if let Some(days) = ttl_days {
            validate_ttl_days(days)?;
        }

        let normalized_url = normalize_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let now = self.clock.now();

        let removed = self.expiration.sweep(now).await?;
        if removed > 0 {
            debug!(removed, "Swept expired links before create");
        }

        let _url_guard = self.locks.lock(&url_lock_key(&normalized_url)).await;

        if let Some((code, _)) = self
            .reconciliation
            .find_existing(&normalized_url, now)
            .await?
            && let Some(existing) = self
                .extend_existing(code, &normalized_url, ttl_days, now)
                .await?
        {
            return Ok(existing);
        }

        let ttl = Duration::days(ttl_days.unwrap_or(self.settings.default_ttl_days));
        let (code, _code_guard) = self.reserve_unique_code().await?;
        let record = LinkRecord::new(normalized_url, now, ttl);

        self.store.set(&code, record.clone()).await?;

        info!(code = %code, url = %record.original_url, "Created short link");

        Ok(CreatedLink {
            code,
            record,
            reused: false,
        })
    }

    /// Resolves a code to its URL and counts the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired. An
    /// expired record is deleted on the way.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let _guard = self.locks.lock(code).await;
        let now = self.clock.now();

        let mut record = self.load_live(code, now).await?;
        record.record_access();
        self.store.set(code, record.clone()).await?;

        debug!(code = %code, access_count = record.access_count, "Resolved short link");

        Ok(record.original_url)
    }

    /// Returns the statistics of a live code without counting an access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired. An
    /// expired record is deleted on the way.
    pub async fn stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let _guard = self.locks.lock(code).await;
        let now = self.clock.now();

        let record = self.load_live(code, now).await?;

        Ok(LinkStats::new(code.to_string(), record))
    }

    /// Deletes every expired record and returns how many were removed.
    pub async fn cleanup(&self) -> Result<usize, AppError> {
        let removed = self.expiration.sweep(self.clock.now()).await?;

        info!(removed, "Cleanup finished");

        Ok(removed)
    }

    /// Loads a record that is live at `now`, deleting it if it has expired.
    ///
    /// The caller must hold the code's lock.
    async fn load_live(&self, code: &str, now: DateTime<Utc>) -> Result<LinkRecord, AppError> {
        let record = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        if record.is_expired(now) {
            self.store.delete(code).await?;
            debug!(code = %code, "Evicted expired link on access");
            return Err(not_found(code));
        }

        Ok(record)
    }

    /// Re-reads a reconciliation match under its lock and renews it.
    ///
    /// Returns `None` if the record vanished, changed URL or expired since
    /// the scan, in which case the caller creates a fresh code.
    async fn extend_existing(
        &self,
        code: String,
        normalized_url: &str,
        ttl_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Option<CreatedLink>, AppError> {
        let _guard = self.locks.lock(&code).await;

        let Some(mut record) = self.store.get(&code).await? else {
            return Ok(None);
        };
        if record.original_url != normalized_url || record.is_expired(now) {
            return Ok(None);
        }

        if let Some(days) = ttl_days {
            record.renew(now, Duration::days(days));
            self.store.set(&code, record.clone()).await?;
            info!(code = %code, expiration_at = %record.expiration_at, "Renewed existing short link");
        } else {
            debug!(code = %code, "Reusing existing short link");
        }

        Ok(Some(CreatedLink {
            code,
            record,
            reused: true,
        }))
    }

    /// Draws codes until one is free and returns it still locked.
    ///
    /// Holding the lock until the record is written keeps two creates for
    /// different URLs from claiming the same code.
    async fn reserve_unique_code(&self) -> Result<(String, KeyGuard<'_>), AppError> {
        let attempts = self.settings.max_code_attempts;

        for attempt in 1..=attempts {
            let code = self.settings.generator.generate();
            let guard = self.locks.lock(&code).await;

            if self.store.get(&code).await?.is_none() {
                return Ok((code, guard));
            }

            debug!(code = %code, attempt, "Short code collision");
        }

        Err(AppError::capacity_exhausted(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": attempts }),
        ))
    }
}

fn validate_ttl_days(days: i64) -> Result<(), AppError> {
    if (MIN_TTL_DAYS..=MAX_TTL_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Expiration must be between 1 and 365 days",
            json!({ "expiration_days": days }),
        ))
    }
}

fn url_lock_key(normalized_url: &str) -> String {
    format!("url:{}", normalized_url)
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::{MockLinkStore, StoreError};
    use crate::infrastructure::persistence::MemoryLinkStore;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn memory_service() -> (LinkService<MemoryLinkStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(t0()));
        let service = LinkService::new(
            Arc::new(MemoryLinkStore::new()),
            clock.clone(),
            ShortenerSettings::default(),
        );
        (service, clock)
    }

    fn mock_service(store: MockLinkStore, settings: ShortenerSettings) -> LinkService<MockLinkStore> {
        LinkService::new(Arc::new(store), Arc::new(ManualClock::new(t0())), settings)
    }

    #[tokio::test]
    async fn test_create_rejects_ttl_out_of_range() {
        let service = mock_service(MockLinkStore::new(), ShortenerSettings::default());

        for days in [0, -1, 366] {
            let result = service
                .create_short_link("https://example.com", Some(days))
                .await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let service = mock_service(MockLinkStore::new(), ShortenerSettings::default());

        for url in ["not-a-url", "ftp://example.com/file", "/relative/path", ""] {
            let result = service.create_short_link(url, None).await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "{url}");
        }
    }

    #[tokio::test]
    async fn test_create_new_link() {
        let (service, _) = memory_service();

        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        assert!(!created.reused);
        assert_eq!(created.code.len(), 6);
        assert_eq!(created.record.original_url, "https://example.com/a");
        assert_eq!(created.record.created_at, t0());
        assert_eq!(created.record.expiration_at, t0() + Duration::days(7));
        assert_eq!(created.record.access_count, 0);
    }

    #[tokio::test]
    async fn test_create_normalizes_url() {
        let (service, _) = memory_service();

        let created = service
            .create_short_link("  HTTPS://Example.COM:443  ", None)
            .await
            .unwrap();

        assert_eq!(created.record.original_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_create_deduplicates_within_ttl() {
        let (service, clock) = memory_service();

        let first = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();
        clock.advance(Duration::days(2));
        let second = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        assert!(second.reused);
        assert_eq!(first.code, second.code);
        assert_eq!(second.record.expiration_at, first.record.expiration_at);
    }

    #[tokio::test]
    async fn test_create_after_expiry_gets_new_code() {
        let (service, clock) = memory_service();

        let first = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();
        clock.advance(Duration::days(1) + Duration::seconds(1));
        let second = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();

        assert!(!second.reused);
        assert_ne!(first.code, second.code);
        assert!(service.store().get(&first.code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reconciliation_ttl_replaces_expiry() {
        let (service, clock) = memory_service();

        let first = service
            .create_short_link("https://example.com/a", Some(30))
            .await
            .unwrap();
        clock.advance(Duration::hours(1));
        let second = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();

        assert_eq!(first.code, second.code);
        assert_eq!(
            second.record.expiration_at,
            t0() + Duration::hours(1) + Duration::days(1)
        );
        assert_eq!(second.record.created_at, t0());
    }

    #[tokio::test]
    async fn test_reconciliation_keeps_access_count() {
        let (service, _) = memory_service();

        let first = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();
        service.resolve(&first.code).await.unwrap();
        service.resolve(&first.code).await.unwrap();

        let second = service
            .create_short_link("https://example.com/a", Some(3))
            .await
            .unwrap();

        assert_eq!(second.record.access_count, 2);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (service, _) = memory_service();

        let created = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();
        assert_eq!(created.record.expiration_at, t0() + Duration::days(1));

        assert_eq!(
            service.resolve(&created.code).await.unwrap(),
            "https://example.com/a"
        );

        let stats = service.stats(&created.code).await.unwrap();
        assert_eq!(stats.access_count, 1);
        assert_eq!(stats.short_code, created.code);

        let again = service
            .create_short_link("https://example.com/a", Some(5))
            .await
            .unwrap();
        assert_eq!(again.code, created.code);
        assert_eq!(again.record.expiration_at, t0() + Duration::days(5));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let (service, _) = memory_service();

        assert!(matches!(
            service.resolve("nope00").await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            service.stats("nope00").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_counts_each_access() {
        let (service, _) = memory_service();
        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        for _ in 0..5 {
            service.resolve(&created.code).await.unwrap();
        }

        assert_eq!(service.stats(&created.code).await.unwrap().access_count, 5);
    }

    #[tokio::test]
    async fn test_stats_does_not_count() {
        let (service, _) = memory_service();
        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        service.stats(&created.code).await.unwrap();
        let stats = service.stats(&created.code).await.unwrap();

        assert_eq!(stats.access_count, 0);
        assert_eq!(stats.created_at, t0());
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let (service, clock) = memory_service();
        let created = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();

        clock.set(created.record.expiration_at);
        assert!(service.resolve(&created.code).await.is_ok());

        clock.advance(Duration::microseconds(1));
        assert!(matches!(
            service.resolve(&created.code).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(service.store().get(&created.code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_evicts_expired() {
        let (service, clock) = memory_service();
        let created = service
            .create_short_link("https://example.com/a", Some(1))
            .await
            .unwrap();

        clock.advance(Duration::days(2));

        assert!(matches!(
            service.stats(&created.code).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_counts_removed() {
        let (service, clock) = memory_service();
        service
            .create_short_link("https://a.example/", Some(1))
            .await
            .unwrap();
        service
            .create_short_link("https://b.example/", Some(1))
            .await
            .unwrap();
        let kept = service
            .create_short_link("https://c.example/", Some(10))
            .await
            .unwrap();

        clock.advance(Duration::days(2));

        assert_eq!(service.cleanup().await.unwrap(), 2);
        assert_eq!(service.cleanup().await.unwrap(), 0);
        assert!(service.resolve(&kept.code).await.is_ok());
    }

    #[tokio::test]
    async fn test_generated_codes_are_distinct() {
        let (service, _) = memory_service();
        let mut codes = HashSet::new();

        for i in 0..200 {
            let created = service
                .create_short_link(&format!("https://example.com/{i}"), None)
                .await
                .unwrap();
            assert!(service.settings().generator.matches(&created.code));
            codes.insert(created.code);
        }

        assert_eq!(codes.len(), 200);
    }

    #[tokio::test]
    async fn test_custom_generator_settings() {
        let clock = Arc::new(ManualClock::new(t0()));
        let settings = ShortenerSettings {
            generator: CodeGenerator::new("abcdef", 10).unwrap(),
            default_ttl_days: 30,
            max_code_attempts: 5,
        };
        let service = LinkService::new(Arc::new(MemoryLinkStore::new()), clock, settings);

        let created = service
            .create_short_link("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(created.code.len(), 10);
        assert!(created.code.chars().all(|c| "abcdef".contains(c)));
        assert_eq!(created.record.expiration_at, t0() + Duration::days(30));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolves_lose_no_increment() {
        let (service, _) = memory_service();
        let service = Arc::new(service);
        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let service = service.clone();
            let code = created.code.clone();
            handles.push(tokio::spawn(async move { service.resolve(&code).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.stats(&created.code).await.unwrap().access_count, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_share_code() {
        let (service, _) = memory_service();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create_short_link("https://example.com/same", None)
                    .await
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap().unwrap().code);
        }

        assert_eq!(codes.len(), 1);
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_exhausted_after_max_attempts() {
        let mut store = MockLinkStore::new();
        store.expect_list_keys().returning(|| Ok(vec![]));
        store.expect_get().times(3).returning(|_| {
            Ok(Some(LinkRecord::new(
                "https://taken.example/".to_string(),
                t0(),
                Duration::days(1),
            )))
        });
        store.expect_set().times(0);

        let settings = ShortenerSettings {
            max_code_attempts: 3,
            ..ShortenerSettings::default()
        };
        let service = mock_service(store, settings);

        let result = service.create_short_link("https://example.com", None).await;

        assert!(matches!(result, Err(AppError::CapacityExhausted { .. })));
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut store = MockLinkStore::new();
        let mut calls = 0;
        store.expect_list_keys().returning(|| Ok(vec![]));
        store.expect_get().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(Some(LinkRecord::new(
                    "https://taken.example/".to_string(),
                    t0(),
                    Duration::days(1),
                )))
            } else {
                Ok(None)
            }
        });
        store.expect_set().times(1).returning(|_, _| Ok(()));

        let service = mock_service(store, ShortenerSettings::default());

        let created = service
            .create_short_link("https://example.com", None)
            .await
            .unwrap();
        assert!(!created.reused);
    }

    fn mock_with_vanishing_match(third_read: Option<LinkRecord>) -> MockLinkStore {
        let mut store = MockLinkStore::new();
        let mut reads = 0;
        store
            .expect_list_keys()
            .returning(|| Ok(vec!["match1".to_string()]));
        store
            .expect_get()
            .withf(|code| code == "match1")
            .times(3)
            .returning(move |_| {
                reads += 1;
                if reads < 3 {
                    Ok(Some(LinkRecord::new(
                        "https://example.com/a".to_string(),
                        t0(),
                        Duration::days(1),
                    )))
                } else {
                    Ok(third_read.clone())
                }
            });
        store
            .expect_get()
            .withf(|code| code != "match1")
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_set()
            .withf(|code, record| code != "match1" && record.created_at == t0())
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_delete().times(0);
        store
    }

    #[tokio::test]
    async fn test_create_falls_through_when_match_vanishes() {
        let service = mock_service(mock_with_vanishing_match(None), ShortenerSettings::default());

        let created = service
            .create_short_link("https://example.com/a", Some(3))
            .await
            .unwrap();

        assert!(!created.reused);
        assert_ne!(created.code, "match1");
        assert_eq!(created.record.expiration_at, t0() + Duration::days(3));
    }

    #[tokio::test]
    async fn test_create_falls_through_when_match_expires() {
        let expired = LinkRecord::new(
            "https://example.com/a".to_string(),
            t0() - Duration::days(2),
            Duration::days(1),
        );
        let service = mock_service(
            mock_with_vanishing_match(Some(expired)),
            ShortenerSettings::default(),
        );

        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        assert!(!created.reused);
        assert_ne!(created.code, "match1");
    }

    #[tokio::test]
    async fn test_create_falls_through_when_match_changes_url() {
        let replaced = LinkRecord::new(
            "https://other.example/".to_string(),
            t0(),
            Duration::days(1),
        );
        let service = mock_service(
            mock_with_vanishing_match(Some(replaced)),
            ShortenerSettings::default(),
        );

        let created = service
            .create_short_link("https://example.com/a", None)
            .await
            .unwrap();

        assert!(!created.reused);
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_internal() {
        let mut store = MockLinkStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::Connection("connection refused".to_string())));

        let service = mock_service(store, ShortenerSettings::default());

        assert!(matches!(
            service.resolve("abc123").await,
            Err(AppError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_expired_deletes_without_write() {
        let mut store = MockLinkStore::new();
        store.expect_get().times(1).returning(|_| {
            Ok(Some(LinkRecord::new(
                "https://example.com/".to_string(),
                t0() - Duration::days(3),
                Duration::days(1),
            )))
        });
        store
            .expect_delete()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(()));
        store.expect_set().times(0);

        let service = mock_service(store, ShortenerSettings::default());

        assert!(matches!(
            service.resolve("abc123").await,
            Err(AppError::NotFound { .. })
        ));
    }
}
