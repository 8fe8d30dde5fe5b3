//! Business logic services for the application layer.

pub mod expiration_manager;
pub mod link_service;
pub mod reconciliation_lookup;

pub use expiration_manager::ExpirationManager;
pub use link_service::{LinkService, ShortenerSettings};
pub use reconciliation_lookup::ReconciliationLookup;
