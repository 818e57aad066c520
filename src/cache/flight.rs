//! Opt-in single-flight for cold keys.
//!
//! Without it, N concurrent misses for the same key each fetch the origin and
//! the last insert wins. With it, the first miss holds a per-key slot until
//! its insert lands; the others wait on the slot, then re-check the cache.
//!
//! Disabled by default (`cache.single_flight = false`).

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::cache::CacheKey;

/// One key's lock plus the number of requests holding or awaiting it.
#[derive(Debug, Default)]
struct Slot {
    lock: Arc<Mutex<()>>,
    users: usize,
}

/// Per-key async slots for in-flight origin fetches.
#[derive(Debug, Default)]
pub struct FlightGroup {
    slots: DashMap<CacheKey, Slot>,
}

impl FlightGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other request holds the slot for `key`, then hold it.
    ///
    /// Cancel-safe: dropping the returned future while it waits gives up
    /// this request's claim on the slot.
    pub async fn enter(&self, key: &CacheKey) -> FlightGuard<'_> {
        let lock = {
            let mut slot = self.slots.entry(key.clone()).or_default();
            slot.users += 1;
            slot.lock.clone()
        };

        // Registered before the wait so cancellation still releases the claim.
        let mut guard = FlightGuard {
            group: self,
            key: key.clone(),
            permit: None,
        };
        guard.permit = Some(lock.lock_owned().await);
        guard
    }

    /// Number of keys with a live slot.
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

/// A claim on a key's slot. Dropping it releases the slot and, once the
/// last claim is gone, removes it from the group.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    group: &'a FlightGroup,
    key: CacheKey,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        drop(self.permit.take());
        if let Entry::Occupied(mut slot) = self.group.slots.entry(self.key.clone()) {
            slot.get_mut().users -= 1;
            if slot.get().users == 0 {
                slot.remove();
            }
        }
    }
}
