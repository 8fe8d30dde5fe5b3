//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Timestamps are RFC 3339 UTC strings.

pub mod cleanup;
pub mod health;
pub mod info;
pub mod shorten;
pub mod stats;
