use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Configuration for an on-disk cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Storage root. Created on first write.
    pub dir: PathBuf,
    /// Whether to `fsync` each entry before moving it into place.
    pub sync_on_write: bool,
    /// Unix permission bits for the storage root.
    pub dir_mode: u32,
    /// Unix permission bits for stored entries.
    pub file_mode: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".artcache"),
            sync_on_write: true,
            dir_mode: 0o755,
            file_mode: 0o644,
        }
    }
}

impl CacheConfig {
    /// Default configuration rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> CacheResult<Self> {
        toml::from_str(s).map_err(|e| CacheError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> CacheResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CacheConfig::default();
        assert_eq!(c.dir, PathBuf::from(".artcache"));
        assert!(c.sync_on_write);
        assert_eq!(c.dir_mode, 0o755);
        assert_eq!(c.file_mode, 0o644);
    }

    #[test]
    fn with_dir_keeps_other_defaults() {
        let c = CacheConfig::with_dir("/var/cache/artifacts");
        assert_eq!(c.dir, PathBuf::from("/var/cache/artifacts"));
        assert_eq!(c.dir_mode, 0o755);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = CacheConfig::from_toml_str("dir = \"/srv/cache\"\nsync_on_write = false\n").unwrap();
        assert_eq!(c.dir, PathBuf::from("/srv/cache"));
        assert!(!c.sync_on_write);
        assert_eq!(c.file_mode, 0o644);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = CacheConfig::from_toml_str("dir = [").unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        match CacheConfig::load(&path).unwrap_err() {
            CacheError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artcache.toml");
        std::fs::write(&path, "dir_mode = 448\n").unwrap();
        let c = CacheConfig::load(&path).unwrap();
        assert_eq!(c.dir_mode, 0o700);
        assert_eq!(c.dir, PathBuf::from(".artcache"));
    }
}
