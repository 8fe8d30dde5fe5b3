//! Core domain entities.
//!
//! - [`LinkRecord`] - The value stored under a short code
//! - [`CreatedLink`] - Outcome of a create request (new or reconciled)
//! - [`LinkStats`] - Read-only statistics view of one code

pub mod link_record;

pub use link_record::{CreatedLink, LinkRecord, LinkStats};
