//! Domain layer containing the link record model and storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - The persisted [`entities::LinkRecord`] and read views over it
//! - [`repositories`] - The [`repositories::LinkStore`] key-value contract
//! - [`clock`] - Time source injected into services
//!
//! The domain layer has no dependency on HTTP or on a concrete backend;
//! store implementations live in [`crate::infrastructure::persistence`].

pub mod clock;
pub mod entities;
pub mod repositories;
