//! Per-identity mutual exclusion for mutating store calls.
//!
//! ```
//! use blobsave::locks::IdentityLocks;
//! use blobsave::store::BlobId;
//!
//! let locks = IdentityLocks::new();
//! let id = BlobId::new("abc").unwrap();
//! let _guard = locks.lock(&id);
//! // store.update(&id, ..) while holding the guard
//! ```

use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::sync::Arc;

use crate::store::BlobId;

type Slot = Arc<Mutex<()>>;

/// One mutex per identity, created on demand and pruned once unused.
/// Distinct identities never contend.
#[derive(Debug, Default)]
pub struct IdentityLocks {
    slots: DashMap<BlobId, Slot>,
}

/// Holds the lock for one identity until dropped.
#[must_use = "the identity is unlocked as soon as the guard is dropped"]
pub struct IdentityGuard<'a> {
    table: &'a IdentityLocks,
    id: BlobId,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &BlobId) -> Slot {
        // The shard lock is released before the caller blocks on the slot.
        self.slots.entry(id.clone()).or_default().clone()
    }

    /// Block until no other guard for `id` is alive.
    pub fn lock(&self, id: &BlobId) -> IdentityGuard<'_> {
        let guard = self.slot(id).lock_arc();
        IdentityGuard { table: self, id: id.clone(), guard: Some(guard) }
    }

    /// Non-blocking variant of [`IdentityLocks::lock`].
    pub fn try_lock(&self, id: &BlobId) -> Option<IdentityGuard<'_>> {
        let slot = self.slot(id);
        match slot.try_lock_arc() {
            Some(guard) => Some(IdentityGuard { table: self, id: id.clone(), guard: Some(guard) }),
            None => {
                drop(slot);
                self.prune(id);
                None
            }
        }
    }

    fn prune(&self, id: &BlobId) {
        // Only the table still references the slot: nobody holds or awaits it.
        self.slots.remove_if(id, |_, slot| Arc::strong_count(slot) == 1);
    }

    /// Number of identities with a live guard or a waiter.
    pub fn active(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.table.prune(&self.id);
    }
}
