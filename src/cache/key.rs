//! Cache key derivation.
//!
//! The key is the configured origin base concatenated with the request path.
//! Query strings are dropped and nothing is normalized: `/A` and `/a` are
//! different keys, `/x?page=1` and `/x?page=2` are the same key.

use std::fmt;

/// Identifies one cache slot. Also the exact URL fetched from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `path` against the `origin` base address.
    pub fn new(origin: &str, path: &str) -> Self {
        let mut key = String::with_capacity(origin.len() + path.len());
        key.push_str(origin);
        key.push_str(path);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
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
