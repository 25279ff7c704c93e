use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use common::ItemId;

use crate::error::Result;
use crate::movement::StockMovement;

/// A stream of movements, in insertion order.
pub type MovementStream = Pin<Box<dyn Stream<Item = Result<StockMovement>> + Send>>;

/// Storage port for the stock ledger.
///
/// The ledger is append-only: implementations must never modify or remove a
/// movement once appended. All implementations must be thread-safe.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Appends one movement to the log.
    async fn append(&self, movement: StockMovement) -> Result<()>;

    /// Returns all movements for an item, oldest first.
    ///
    /// This is a read-only projection and is safe to re-query at any time.
    async fn movements_for(&self, item_id: ItemId) -> Result<Vec<StockMovement>>;

    /// Returns the total number of movements stored.
    async fn movement_count(&self) -> Result<usize>;

    /// Streams every movement in the log, in insertion order (audit export).
    async fn stream_all(&self) -> Result<MovementStream>;
}
