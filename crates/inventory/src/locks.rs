//! Per-item serialization of quantity-affecting operations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use common::ItemId;

/// Registry of per-item mutexes.
///
/// At most one quantity-affecting operation for a given item runs at a
/// time; operations on different items never block each other. Snapshot
/// reads take the same lock, so a reader can never observe a half-applied
/// fulfillment.
#[derive(Clone, Default)]
pub struct ItemLocks {
    locks: Arc<RwLock<HashMap<ItemId, Arc<Mutex<()>>>>>,
}

impl ItemLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for an item, waiting if it is held.
    pub async fn acquire(&self, item_id: ItemId) -> OwnedMutexGuard<()> {
        let lock = {
            let locks = self.locks.read().await;
            locks.get(&item_id).cloned()
        };

        let lock = match lock {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                locks
                    .entry(item_id)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };

        lock.lock_owned().await
    }
}
