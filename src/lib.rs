//! # TTL URL Shortener
//!
//! A URL shortening service with expiring links, built with Axum and an
//! in-memory or Redis store.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link record, clock and the store trait
//! - **Application Layer** ([`application`]) - Create/resolve/stats/cleanup logic
//! - **Infrastructure Layer** ([`infrastructure`]) - Memory and Redis stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random fixed-length codes with collision retry
//! - One live code per URL; resubmitting renews it
//! - Lazy expiry on access plus sweeps on create, on demand and on a timer
//! - Per-link access counter
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional, memory otherwise
//! cargo run
//!
//! curl -X POST localhost:3000/shorten \
//!   -H 'content-type: application/json' \
//!   -d '{"url": "https://example.com", "expiration_days": 3}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, ShortenerSettings};
    pub use crate::domain::clock::{Clock, ManualClock, SystemClock};
    pub use crate::domain::entities::{CreatedLink, LinkRecord, LinkStats};
    pub use crate::domain::repositories::LinkStore;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{MemoryLinkStore, RedisLinkStore};
    pub use crate::state::AppState;
}
