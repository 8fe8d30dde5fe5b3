//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating store calls,
//! validation and expiration rules. Services consume the [`LinkStore`]
//! trait and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Create, resolve, stats and cleanup
//! - [`services::ExpirationManager`] - Sweeping and evicting expired records
//! - [`services::ReconciliationLookup`] - Finding the live code for a URL
//! - [`cleanup_worker`] - Periodic background sweep
//!
//! [`LinkStore`]: crate::domain::repositories::LinkStore

pub mod cleanup_worker;
pub mod services;
