//! Content-addressed build artifact cache.
//!
//! [`ArtifactCache`] derives a deterministic key from an artifact's identity
//! (package fingerprint or file name, plus its checksums) and stores or looks
//! up the artifact's bytes under that key. Because the key depends only on
//! identity, a build can ask the cache before producing the artifact at all.
//!
//! ```no_run
//! use artcache::{ArtifactCache, PackageArtifact};
//!
//! let cache = ArtifactCache::new("/var/cache/artifacts");
//! let artifact = PackageArtifact::new("/tmp/build/foo-1.0.pkg")
//!     .with_checksum("sha256", "abc123");
//!
//! let (key, size) = cache.put(&artifact)?;
//! let path = cache.get(&artifact)?;
//! # Ok::<(), artcache::CacheError>(())
//! ```

pub mod cache;

pub use cache::ArtifactCache;

pub use artcache_crypto::KeyDeriver;
pub use artcache_store::{
    ByteStore, CacheConfig, CacheError, CacheResult, DiskByteStore, InMemoryByteStore,
};
pub use artcache_types::{
    ArtifactIdentity, CacheKey, Checksums, CompileSpec, Package, PackageArtifact,
};
