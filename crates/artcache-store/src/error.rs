use std::path::PathBuf;

use artcache_types::CacheKey;

/// Errors from cache operations.
///
/// Every filesystem failure carries the path it happened on.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// No entry is stored under the key.
    #[error("entry not found in cache: {key}")]
    NotFound { key: CacheKey },

    /// The storage root could not be created.
    #[error("failed to create cache directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file receiving an entry's bytes could not be created.
    #[error("failed to create cache file in {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying the content stream aborted. The partial file has been removed.
    #[error("failed to copy content to cache file {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The copied file could not be finished (permissions, fsync) or moved
    /// into place. The temporary file has been removed.
    #[error("failed to finish cache file {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact's own source file could not be opened.
    #[error("failed opening {}: {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure against a stored entry (stat, read).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache configuration could not be loaded.
    #[error("invalid cache configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Returns `true` for a cache miss, as opposed to a storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
