use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Length of a [`CacheKey`] in bytes (SHA-512 output).
pub const KEY_LEN: usize = 64;

/// Identifier of a single cache entry.
///
/// A `CacheKey` is the SHA-512 digest of an artifact's fingerprint string.
/// It is never assigned by hand: keys come out of the key deriver, or are
/// parsed back from the hex file names of an existing storage root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; KEY_LEN]);

impl CacheKey {
    /// Wrap a finished 64-byte digest.
    pub fn from_digest(digest: [u8; KEY_LEN]) -> Self {
        Self(digest)
    }

    /// Digest bytes as produced by SHA-512.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lowercase hex rendering (128 characters). This is the entry's file name.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters. Enough to tell entries apart in logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Recover a key from an entry's file name, e.g. when listing an
    /// existing storage root.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != KEY_LEN {
            return Err(TypeError::InvalidLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; KEY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.short_hex())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<CacheKey> for [u8; KEY_LEN] {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

// Serde has no derive support for 64-byte arrays, so keys travel as hex.
impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
