use std::borrow::Cow;
use std::path::Path;

use artcache_types::{ArtifactIdentity, CacheKey, KEY_LEN};
use sha2::{Digest, Sha512};

/// Derives cache keys from artifact identities.
///
/// The fingerprint starts as the base name of the artifact's path, taken as
/// raw bytes on Unix so that distinct non-UTF-8 names stay distinct. A
/// package fingerprint, when present, replaces it outright. Every checksum
/// pair is then appended as `+{algorithm}:{digest}`, sorted by algorithm and
/// then digest so that the caller's iteration order never leaks into the key.
/// The key is the SHA-512 of the resulting bytes.
///
/// Keys are derived from what the artifact *is*, not from its bytes, so the
/// cache can be consulted before the artifact has been produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyDeriver;

impl KeyDeriver {
    pub const fn new() -> Self {
        Self
    }

    /// The exact bytes [`derive`](Self::derive) hashes.
    pub fn fingerprint_bytes<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> Vec<u8> {
        let mut fingerprint = match artifact.package_fingerprint() {
            Some(package) => package.as_bytes().to_vec(),
            None => base_name(&path_bytes(artifact.path())).to_vec(),
        };

        let mut checksums = artifact.checksums();
        checksums.sort_unstable();
        for (algorithm, digest) in checksums {
            fingerprint.push(b'+');
            fingerprint.extend_from_slice(algorithm.as_bytes());
            fingerprint.push(b':');
            fingerprint.extend_from_slice(digest.as_bytes());
        }
        fingerprint
    }

    /// Printable fingerprint. Identical to the hashed bytes whenever the
    /// base name is valid UTF-8.
    pub fn fingerprint<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> String {
        String::from_utf8_lossy(&self.fingerprint_bytes(artifact)).into_owned()
    }

    /// Derive the cache key for an artifact.
    pub fn derive<A: ArtifactIdentity + ?Sized>(&self, artifact: &A) -> CacheKey {
        Self::hash_bytes(&self.fingerprint_bytes(artifact))
    }

    /// SHA-512 of a fingerprint string, without any domain prefix.
    pub fn hash_fingerprint(fingerprint: &str) -> CacheKey {
        Self::hash_bytes(fingerprint.as_bytes())
    }

    fn hash_bytes(data: &[u8]) -> CacheKey {
        let mut digest = [0u8; KEY_LEN];
        digest.copy_from_slice(&Sha512::digest(data));
        CacheKey::from_digest(digest)
    }

    /// Verify that a fingerprint string hashes to the expected key.
    pub fn verify(fingerprint: &str, expected: &CacheKey) -> bool {
        Self::hash_fingerprint(fingerprint) == *expected
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

fn is_separator(b: u8) -> bool {
    b.is_ascii() && std::path::is_separator(b as char)
}

/// Last element of a path, with the same edge cases as Go's `filepath.Base`:
/// trailing separators are dropped, an empty path gives `.` and a path made
/// only of separators gives a single separator.
fn base_name(path: &[u8]) -> &[u8] {
    if path.is_empty() {
        return b".";
    }
    let end = match path.iter().rposition(|b| !is_separator(*b)) {
        Some(i) => i + 1,
        None => return &path[..1],
    };
    let trimmed = &path[..end];
    match trimmed.iter().rposition(|b| is_separator(*b)) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}
