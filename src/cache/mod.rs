//! Response cache subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → key.rs (origin + path → CacheKey)
//!     → CacheStore::lookup
//!         hit  → entry.rs (owned body + header snapshot) → client
//!         miss → origin fetch → CacheStore::insert
//! ```
//!
//! # Design Decisions
//! - The store is injected as `Arc<dyn CacheStore>`, never a global
//! - Entries are immutable once inserted; a later insert replaces the whole entry
//! - No eviction and no expiry: the store only grows
//! - `LockedStore` is the reference single-lock layout; `ShardedStore` lets
//!   writers to different keys proceed in parallel

pub mod entry;
pub mod flight;
pub mod key;
pub mod sharded;
pub mod store;

use std::fmt::Debug;
use std::sync::Arc;

pub use entry::CacheEntry;
pub use flight::{FlightGroup, FlightGuard};
pub use key::CacheKey;
pub use sharded::ShardedStore;
pub use store::LockedStore;

use crate::config::schema::StoreKind;

/// A concurrent key → entry map shared by every request.
///
/// Implementations must never expose a partially written entry: a lookup
/// racing an insert for the same key sees either the old entry or the new one.
pub trait CacheStore: Send + Sync + Debug {
    /// Look up the entry for `key`. `None` means a miss.
    fn lookup(&self, key: &CacheKey) -> Option<Arc<CacheEntry>>;

    /// Insert `entry` under `key`, fully replacing any previous entry.
    fn insert(&self, key: CacheKey, entry: CacheEntry);

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the store selected in configuration.
pub fn build_store(kind: StoreKind) -> Arc<dyn CacheStore> {
    match kind {
        StoreKind::Locked => Arc::new(LockedStore::new()),
        StoreKind::Sharded => Arc::new(ShardedStore::new()),
    }
}
