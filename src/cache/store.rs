//! Single-lock cache store.
//!
//! # Responsibilities
//! - Map cache keys to entries behind one shared/exclusive lock
//! - Let any number of lookups run in parallel
//! - Serialize every insert, regardless of key
//!
//! # Design Decisions
//! - Entries are stored as `Arc<CacheEntry>` so a lookup only holds the read
//!   lock long enough to clone a pointer
//! - The entry is fully built before the write lock is taken; the lock only
//!   covers the map slot swap
//! - A poisoned lock is recovered: the map only ever holds complete entries

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::{CacheEntry, CacheKey, CacheStore};

/// Cache store guarded by a single `RwLock`.
#[derive(Debug, Default)]
pub struct LockedStore {
    inner: RwLock<HashMap<CacheKey, Arc<CacheEntry>>>,
}

impl LockedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for LockedStore {
    fn lookup(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn insert(&self, key: CacheKey, entry: CacheEntry) {
        let entry = Arc::new(entry);
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key, entry);
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
