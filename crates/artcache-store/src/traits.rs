use std::io::Read;

use artcache_types::CacheKey;

use crate::error::CacheResult;

/// Key-addressed byte store.
///
/// All implementations must satisfy these invariants:
/// - At most one entry exists per key. Storing under an existing key
///   replaces the previous bytes.
/// - A reader never observes a partially written entry.
/// - The store never interprets entry contents.
/// - All I/O errors are propagated, except failures while cleaning up a
///   write that already failed.
pub trait ByteStore: Send + Sync {
    /// Check whether an entry exists for `key`.
    fn contains(&self, key: &CacheKey) -> CacheResult<bool>;

    /// Read the full contents of the entry for `key`.
    ///
    /// Returns [`CacheError::NotFound`](crate::CacheError::NotFound) on a miss.
    fn read(&self, key: &CacheKey) -> CacheResult<Vec<u8>>;

    /// Copy `content` to the end into the entry for `key`.
    ///
    /// Returns the key unchanged along with the number of bytes written.
    fn store(&self, key: CacheKey, content: &mut dyn Read) -> CacheResult<(CacheKey, u64)>;
}
