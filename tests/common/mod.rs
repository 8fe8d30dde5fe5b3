#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use ttl_shortener::application::services::{LinkService, ShortenerSettings};
use ttl_shortener::domain::clock::ManualClock;
use ttl_shortener::domain::entities::LinkRecord;
use ttl_shortener::domain::repositories::LinkStore;
use ttl_shortener::infrastructure::persistence::MemoryLinkStore;
use ttl_shortener::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

/// Handles to everything behind a test [`AppState`].
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryLinkStore>,
    pub clock: Arc<ManualClock>,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn create_test_state() -> TestContext {
    create_test_state_with_base_url(Some(BASE_URL.to_string()))
}

pub fn create_test_state_with_base_url(base_url: Option<String>) -> TestContext {
    let store = Arc::new(MemoryLinkStore::new());
    let clock = Arc::new(ManualClock::new(t0()));

    let dyn_store: Arc<dyn LinkStore> = store.clone();
    let link_service = Arc::new(LinkService::new(
        dyn_store,
        clock.clone(),
        ShortenerSettings::default(),
    ));

    TestContext {
        state: AppState::new(link_service, base_url),
        store,
        clock,
    }
}

pub async fn create_test_link(store: &MemoryLinkStore, code: &str, url: &str, ttl_days: i64) {
    store
        .set(
            code,
            LinkRecord::new(url.to_string(), t0(), Duration::days(ttl_days)),
        )
        .await
        .unwrap();
}

pub async fn create_expired_link(store: &MemoryLinkStore, code: &str, url: &str) {
    store
        .set(
            code,
            LinkRecord::new(
                url.to_string(),
                t0() - Duration::days(2),
                Duration::days(1),
            ),
        )
        .await
        .unwrap();
}
