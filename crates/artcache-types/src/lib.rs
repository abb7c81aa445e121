//! Foundation types for the artifact cache.
//!
//! Every other artcache crate depends on `artcache-types`. It defines the
//! fixed-size key that addresses a cache entry and the read-only view of a
//! build artifact that the key is derived from.
//!
//! # Key Types
//!
//! - [`CacheKey`] — 512-bit identifier of a cache entry, rendered as hex on disk
//! - [`ArtifactIdentity`] — what the cache needs to know about an artifact
//! - [`PackageArtifact`] — concrete artifact model implementing [`ArtifactIdentity`]
//! - [`Checksums`] — algorithm → digest pairs recorded for an artifact

pub mod artifact;
pub mod error;
pub mod key;

pub use artifact::{ArtifactIdentity, Checksums, CompileSpec, Package, PackageArtifact};
pub use error::TypeError;
pub use key::{CacheKey, KEY_LEN};
