//! Infrastructure layer for external integrations.
//!
//! This layer implements the [`LinkStore`] interface defined by the domain
//! layer, providing concrete backends for record storage.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory and Redis store implementations
//!
//! [`LinkStore`]: crate::domain::repositories::LinkStore

pub mod persistence;
