//! Cache key derivation for the artifact cache.
//!
//! Turns an [`ArtifactIdentity`](artcache_types::ArtifactIdentity) into a
//! fingerprint string and hashes it with SHA-512 into a
//! [`CacheKey`](artcache_types::CacheKey).
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod deriver;

pub use deriver::KeyDeriver;
