//! Utility functions for code generation, URL processing and key locking.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_normalizer`] - URL normalization
//! - [`base_url`] - Public base URL derivation from request headers
//! - [`key_locks`] - Per-key async mutual exclusion

pub mod base_url;
pub mod code_generator;
pub mod key_locks;
pub mod url_normalizer;
