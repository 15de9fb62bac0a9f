use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

/// Length of every generated key, in hex characters
pub const KEY_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of a layout document's exact bytes
///
/// Two inputs that differ by a single byte (whitespace included) get different
/// keys. Collisions are not detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Derive the cache key for `json`
#[must_use]
pub fn generate_key(json: &str) -> CacheKey {
    generate_key_bytes(json.as_bytes())
}

/// Derive the cache key for raw bytes, which need not be UTF-8
#[must_use]
pub fn generate_key_bytes(bytes: &[u8]) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    CacheKey(hex_encode_lower(&hasher.finalize()))
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}
