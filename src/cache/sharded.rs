//! Sharded cache store.
//!
//! Same contract as [`LockedStore`](super::LockedStore), but the map is a
//! `DashMap`: each shard has its own lock, so inserts for unrelated keys do
//! not contend. Visibility is still atomic per key.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::{CacheEntry, CacheKey, CacheStore};

/// Cache store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct ShardedStore {
    inner: DashMap<CacheKey, Arc<CacheEntry>>,
}

impl ShardedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for ShardedStore {
    fn lookup(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.inner.insert(key, Arc::new(entry));
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
