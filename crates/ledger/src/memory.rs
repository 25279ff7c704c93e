use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::ItemId;

use crate::error::Result;
use crate::movement::StockMovement;
use crate::store::{MovementStore, MovementStream};

/// In-memory movement store.
///
/// Keeps movements in insertion order, which is also chronological because
/// movements are timestamped when they are built. Provides the same
/// interface a persistent implementation would.
#[derive(Clone, Default)]
pub struct InMemoryMovementStore {
    movements: Arc<RwLock<Vec<StockMovement>>>,
}

impl InMemoryMovementStore {
    /// Creates a new empty movement store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all movements.
    pub async fn clear(&self) {
        self.movements.write().await.clear();
    }
}

#[async_trait]
impl MovementStore for InMemoryMovementStore {
    async fn append(&self, movement: StockMovement) -> Result<()> {
        self.movements.write().await.push(movement);
        Ok(())
    }

    async fn movements_for(&self, item_id: ItemId) -> Result<Vec<StockMovement>> {
        let store = self.movements.read().await;
        Ok(store
            .iter()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn movement_count(&self) -> Result<usize> {
        Ok(self.movements.read().await.len())
    }

    async fn stream_all(&self) -> Result<MovementStream> {
        use futures_util::stream;

        let store = self.movements.read().await;
        let movements = store.clone();
        let stream = stream::iter(movements.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }
}
