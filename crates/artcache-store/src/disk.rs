use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use artcache_types::CacheKey;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::traits::ByteStore;

/// Prefix of in-flight files. Never a valid key rendering.
const TEMP_PREFIX: &str = ".tmp-";

/// Flat directory of entries, one regular file per key.
///
/// On-disk layout:
/// ```text
/// <root>/<128 lowercase hex chars of the key>   raw entry bytes, no header
/// <root>/.tmp-XXXXXX                            write in progress
/// ```
///
/// Writes land in a uniquely named temporary file inside the root and are
/// renamed over the final name once complete, so readers see either the
/// previous entry or the new one, never a torn write. Racing writers for the
/// same key are not coordinated: the last rename wins.
#[derive(Clone, Debug)]
pub struct DiskByteStore {
    root: PathBuf,
    sync_on_write: bool,
    dir_mode: u32,
    file_mode: u32,
}

impl DiskByteStore {
    /// Store rooted at `root` with default settings. Nothing is created yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&CacheConfig::with_dir(root))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            root: config.dir.clone(),
            sync_on_write: config.sync_on_write,
            dir_mode: config.dir_mode,
            file_mode: config.file_mode,
        }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the entry for `key` lives, whether or not it exists.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.to_hex())
    }

    /// Path of the stored entry for `key`.
    ///
    /// Only checks that the file exists; the content is not opened.
    pub fn resolve(&self, key: &CacheKey) -> CacheResult<PathBuf> {
        let path = self.path_for(key);
        match path.try_exists() {
            Ok(true) => Ok(path),
            Ok(false) => {
                debug!(key = %key.short_hex(), "cache miss");
                Err(CacheError::NotFound { key: *key })
            }
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    /// Keys of all complete entries under the root, sorted.
    ///
    /// In-flight temporary files and anything not named like a key are
    /// skipped. A root that does not exist yet holds no keys.
    pub fn keys(&self) -> CacheResult<Vec<CacheKey>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CacheError::Io {
                path: self.root.clone(),
                source,
            })?;
            let name = entry.file_name();
            match name.to_str().map(CacheKey::from_hex) {
                Some(Ok(key)) => keys.push(key),
                _ => debug!(name = ?name, "skipping non-entry in cache root"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn ensure_root(&self) -> CacheResult<()> {
        create_dir_all(&self.root, self.dir_mode).map_err(|source| CacheError::CreateDir {
            path: self.root.clone(),
            source,
        })
    }
}

impl ByteStore for DiskByteStore {
    fn contains(&self, key: &CacheKey) -> CacheResult<bool> {
        let path = self.path_for(key);
        path.try_exists()
            .map_err(|source| CacheError::Io { path, source })
    }

    fn read(&self, key: &CacheKey) -> CacheResult<Vec<u8>> {
        let path = self.resolve(key)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CacheError::NotFound { key: *key },
            _ => CacheError::Io { path, source },
        })
    }

    fn store(&self, key: CacheKey, content: &mut dyn Read) -> CacheResult<(CacheKey, u64)> {
        self.ensure_root()?;

        let dest = self.path_for(&key);
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|source| CacheError::CreateFile {
                path: self.root.clone(),
                source,
            })?;

        let copied = io::copy(content, temp.as_file_mut());
        let written = match copied {
            Ok(n) => n,
            Err(source) => {
                let temp_path = temp.path().to_path_buf();
                if let Err(e) = temp.close() {
                    warn!(path = %temp_path.display(), error = %e, "failed to remove partial cache file");
                }
                return Err(CacheError::Copy { path: dest, source });
            }
        };

        finish_file(temp.as_file(), self.file_mode, self.sync_on_write)
            .and_then(|()| temp.persist(&dest).map(drop).map_err(|e| e.error))
            .map_err(|source| CacheError::Persist {
                path: dest.clone(),
                source,
            })?;

        debug!(key = %key.short_hex(), bytes = written, "stored cache entry");
        Ok((key, written))
    }
}

#[cfg(unix)]
fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Apply the entry mode and optionally flush to disk before the rename.
fn finish_file(file: &File, mode: u32, sync: bool) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    if sync {
        file.sync_all()?;
    }
    Ok(())
}
