//! Key-addressed byte storage for the artifact cache.
//!
//! This crate maps a [`CacheKey`](artcache_types::CacheKey) to an opaque
//! blob. It knows nothing about artifacts; key derivation lives in
//! `artcache-crypto` and the artifact-facing API in `artcache`.
//!
//! # Storage Backends
//!
//! All backends implement the [`ByteStore`] trait:
//!
//! - [`DiskByteStore`] -- flat directory, one file per key named by its hex
//! - [`InMemoryByteStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. At most one entry per key; a later store replaces the earlier one.
//! 2. Write-then-rename: readers never observe a partially written entry.
//! 3. The storage root is created lazily on first write.
//! 4. The store never interprets entry contents.
//! 5. Every I/O error carries the path it happened on.

pub mod config;
pub mod disk;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::CacheConfig;
pub use disk::DiskByteStore;
pub use error::{CacheError, CacheResult};
pub use memory::InMemoryByteStore;
pub use traits::ByteStore;
