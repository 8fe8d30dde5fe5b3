//! Link store implementations.
//!
//! # Stores
//!
//! - [`MemoryLinkStore`] - Sharded in-process table, used when no Redis is configured
//! - [`RedisLinkStore`] - Redis keyspace with one JSON value per code

pub mod memory_link_store;
pub mod redis_link_store;

pub use memory_link_store::MemoryLinkStore;
pub use redis_link_store::RedisLinkStore;
