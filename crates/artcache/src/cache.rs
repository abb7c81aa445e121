use std::fs::File;
use std::path::{Path, PathBuf};

use artcache_crypto::KeyDeriver;
use artcache_store::{ByteStore, CacheConfig, CacheError, CacheResult, DiskByteStore};
use artcache_types::{ArtifactIdentity, CacheKey};
use tracing::debug;

/// Artifact-level cache over a [`ByteStore`].
///
/// Owns its store and only exposes artifact-keyed operations.
#[derive(Debug)]
pub struct ArtifactCache<S = DiskByteStore> {
    store: S,
    deriver: KeyDeriver,
}

impl ArtifactCache<DiskByteStore> {
    /// Cache rooted at `dir` with default settings.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_store(DiskByteStore::new(dir))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_store(DiskByteStore::from_config(config))
    }

    /// The storage root directory.
    pub fn dir(&self) -> &Path {
        self.store.root()
    }

    /// Path of the cached copy of `artifact`, or
    /// [`CacheError::NotFound`] if it was never stored.
    pub fn get<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheResult<PathBuf> {
        self.store.resolve(&self.key(artifact))
    }
}

impl<S: ByteStore> ArtifactCache<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            deriver: KeyDeriver::new(),
        }
    }

    /// Fingerprint string the key for `artifact` is hashed from.
    pub fn fingerprint<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> String {
        self.deriver.fingerprint(artifact)
    }

    /// Cache key for `artifact`. Recomputed on every call.
    pub fn key<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheKey {
        self.deriver.derive(artifact)
    }

    /// Whether a cached copy of `artifact` exists.
    pub fn contains<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheResult<bool> {
        self.store.contains(&self.key(artifact))
    }

    /// Bytes of the cached copy of `artifact`.
    pub fn read<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheResult<Vec<u8>> {
        self.store.read(&self.key(artifact))
    }

    /// Copy the artifact's file at `artifact.path()` into the cache.
    ///
    /// Returns the key it was stored under and the number of bytes copied.
    pub fn put<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheResult<(CacheKey, u64)> {
        let path = artifact.path();
        let mut source = File::open(path).map_err(|source| CacheError::SourceOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let key = self.key(artifact);
        debug!(key = %key.short_hex(), source = %path.display(), "caching artifact");
        self.store.store(key, &mut source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcache_store::InMemoryByteStore;
    use artcache_types::{CompileSpec, Package, PackageArtifact};
    use std::fs;

    fn write_artifact(dir: &Path, name: &str, content: &[u8]) -> PackageArtifact {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        PackageArtifact::new(path)
    }

    #[test]
    fn put_then_get_round_trips() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(work.path().join("cache"));
        let artifact = write_artifact(work.path(), "foo-1.0.pkg", b"package payload")
            .with_checksum("sha256", "abc123");

        let (key, size) = cache.put(&artifact).unwrap();
        assert_eq!(size, 15);
        assert_eq!(key, cache.key(&artifact));

        let path = cache.get(&artifact).unwrap();
        assert_eq!(fs::read(path).unwrap(), b"package payload");
    }

    #[test]
    fn get_of_unstored_artifact_is_not_found() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(work.path().join("cache"));
        let artifact = PackageArtifact::new(work.path().join("missing.pkg"));
        let err = cache.get(&artifact).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn put_of_missing_source_is_source_open_error() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(work.path().join("cache"));
        let missing = work.path().join("nowhere.pkg");

        match cache.put(&PackageArtifact::new(&missing)).unwrap_err() {
            CacheError::SourceOpen { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!cache.dir().exists());
    }

    #[test]
    fn concrete_scenario_file_name() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(work.path().join("cache"));
        let artifact = write_artifact(work.path(), "foo-1.0.pkg", b"x")
            .with_checksum("sha256", "abc123");

        assert_eq!(cache.fingerprint(&artifact), "foo-1.0.pkg+sha256:abc123");
        let expected = KeyDeriver::hash_fingerprint("foo-1.0.pkg+sha256:abc123");
        cache.put(&artifact).unwrap();
        assert_eq!(
            cache.get(&artifact).unwrap(),
            work.path().join("cache").join(expected.to_hex())
        );
    }

    #[test]
    fn package_fingerprint_shares_entry_across_paths() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::new(work.path().join("cache"));
        let spec = CompileSpec::for_package(Package::new("foo-utils-1.0"));
        let built = write_artifact(work.path(), "build-output.pkg", b"built")
            .with_compile_spec(spec.clone());
        cache.put(&built).unwrap();

        let elsewhere = PackageArtifact::new("/some/other/place.pkg").with_compile_spec(spec);
        assert_eq!(fs::read(cache.get(&elsewhere).unwrap()).unwrap(), b"built");
    }

    #[test]
    fn works_over_memory_store() {
        let work = tempfile::tempdir().unwrap();
        let cache = ArtifactCache::with_store(InMemoryByteStore::new());
        let artifact = write_artifact(work.path(), "mem.pkg", b"in memory");

        assert!(!cache.contains(&artifact).unwrap());
        cache.put(&artifact).unwrap();
        assert!(cache.contains(&artifact).unwrap());
        assert_eq!(cache.read(&artifact).unwrap(), b"in memory");
        assert_eq!(cache.store.len(), 1);
    }
}
