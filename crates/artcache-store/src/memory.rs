use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::RwLock;

use artcache_types::CacheKey;

use crate::error::{CacheError, CacheResult};
use crate::traits::ByteStore;

/// In-memory, HashMap-based byte store.
///
/// Intended for tests and embedding. Content is buffered fully before it is
/// inserted, so a failed copy never leaves a partial entry behind.
pub struct InMemoryByteStore {
    entries: RwLock<HashMap<CacheKey, Vec<u8>>>,
}

impl InMemoryByteStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all entries.
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Sorted list of all stored keys.
    pub fn keys(&self) -> Vec<CacheKey> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<CacheKey> = map.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryByteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for InMemoryByteStore {
    fn contains(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self.entries.read().expect("lock poisoned").contains_key(key))
    }

    fn read(&self, key: &CacheKey) -> CacheResult<Vec<u8>> {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or(CacheError::NotFound { key: *key })
    }

    fn store(&self, key: CacheKey, content: &mut dyn Read) -> CacheResult<(CacheKey, u64)> {
        let mut data = Vec::new();
        content
            .read_to_end(&mut data)
            .map_err(|source| CacheError::Copy {
                path: PathBuf::from(key.to_hex()),
                source,
            })?;
        let written = data.len() as u64;
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key, data);
        Ok((key, written))
    }
}

impl std::fmt::Debug for InMemoryByteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryByteStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
