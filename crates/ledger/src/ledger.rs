//! The stock ledger: movement recording and the on-hand fold.

use common::{ItemId, Quantity};

use crate::error::{LedgerError, Result};
use crate::movement::{Direction, StockMovement};
use crate::store::MovementStore;

/// Authoritative history of physical stock changes for all items.
///
/// On-hand quantity is derived by folding an item's movements, so there is
/// a single source of truth. Quantity-affecting calls for the same item must
/// be serialized by the caller (the inventory service holds a per-item lock
/// around them); calls for different items need no coordination.
pub struct StockLedger<M: MovementStore> {
    store: M,
}

impl<M: MovementStore> StockLedger<M> {
    /// Creates a ledger over the given movement store.
    pub fn new(store: M) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &M {
        &self.store
    }

    /// Records a movement and returns it.
    ///
    /// An `Out` movement that would drive the item's on-hand quantity below
    /// zero fails with [`LedgerError::InsufficientStock`] and appends
    /// nothing.
    pub async fn record(
        &self,
        item_id: ItemId,
        direction: Direction,
        quantity: Quantity,
        actor: &str,
        reference: Option<String>,
        notes: Option<String>,
    ) -> Result<StockMovement> {
        let movement =
            StockMovement::record(item_id, direction, quantity, actor, reference, notes)?;

        if direction == Direction::Out {
            let on_hand = self.on_hand(item_id).await?;
            if quantity > on_hand {
                return Err(LedgerError::InsufficientStock {
                    item_id,
                    requested: quantity,
                    on_hand,
                });
            }
        }

        self.store.append(movement.clone()).await?;
        metrics::counter!("ledger_movements_total").increment(1);
        tracing::debug!(
            %item_id,
            direction = %movement.direction,
            quantity = %movement.quantity,
            "movement recorded"
        );

        Ok(movement)
    }

    /// Returns the item's on-hand quantity (fold over its movements).
    pub async fn on_hand(&self, item_id: ItemId) -> Result<Quantity> {
        let movements = self.store.movements_for(item_id).await?;
        Ok(movements
            .iter()
            .fold(Quantity::zero(), |acc, m| acc + m.effect()))
    }

    /// Returns all movements for an item, oldest first.
    pub async fn movements_for(&self, item_id: ItemId) -> Result<Vec<StockMovement>> {
        self.store.movements_for(item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMovementStore;

    fn ledger() -> StockLedger<InMemoryMovementStore> {
        StockLedger::new(InMemoryMovementStore::new())
    }

    #[tokio::test]
    async fn on_hand_starts_at_zero() {
        let ledger = ledger();
        let on_hand = ledger.on_hand(ItemId::new()).await.unwrap();
        assert!(on_hand.is_zero());
    }

    #[tokio::test]
    async fn on_hand_folds_in_and_out() {
        let ledger = ledger();
        let item_id = ItemId::new();

        ledger
            .record(item_id, Direction::In, Quantity::from_whole(10), "w", None, None)
            .await
            .unwrap();
        ledger
            .record(item_id, Direction::In, Quantity::from_whole(5), "w", None, None)
            .await
            .unwrap();
        ledger
            .record(item_id, Direction::Out, Quantity::from_whole(7), "w", None, None)
            .await
            .unwrap();

        assert_eq!(
            ledger.on_hand(item_id).await.unwrap(),
            Quantity::from_whole(8)
        );
    }

    #[tokio::test]
    async fn out_movement_cannot_overdraw() {
        let ledger = ledger();
        let item_id = ItemId::new();

        ledger
            .record(item_id, Direction::In, Quantity::from_whole(3), "w", None, None)
            .await
            .unwrap();

        let result = ledger
            .record(item_id, Direction::Out, Quantity::from_whole(4), "w", None, None)
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientStock { .. })
        ));

        // Nothing was appended and on-hand is unchanged.
        assert_eq!(ledger.store().movement_count().await.unwrap(), 1);
        assert_eq!(
            ledger.on_hand(item_id).await.unwrap(),
            Quantity::from_whole(3)
        );
    }

    #[tokio::test]
    async fn out_movement_can_empty_the_shelf() {
        let ledger = ledger();
        let item_id = ItemId::new();

        ledger
            .record(item_id, Direction::In, Quantity::from_whole(3), "w", None, None)
            .await
            .unwrap();
        ledger
            .record(item_id, Direction::Out, Quantity::from_whole(3), "w", None, None)
            .await
            .unwrap();

        assert!(ledger.on_hand(item_id).await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let ledger = ledger();
        let result = ledger
            .record(
                ItemId::new(),
                Direction::In,
                Quantity::zero(),
                "w",
                None,
                None,
            )
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidQuantity { .. })));
    }

    #[tokio::test]
    async fn reference_and_notes_are_kept() {
        let ledger = ledger();
        let item_id = ItemId::new();

        let movement = ledger
            .record(
                item_id,
                Direction::In,
                Quantity::from_whole(1),
                "jmendez",
                Some("DN-1042".to_string()),
                Some("partial delivery".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(movement.actor, "jmendez");
        assert_eq!(movement.reference.as_deref(), Some("DN-1042"));
        assert_eq!(movement.notes.as_deref(), Some("partial delivery"));
    }

    #[tokio::test]
    async fn movements_for_is_restartable() {
        let ledger = ledger();
        let item_id = ItemId::new();

        ledger
            .record(item_id, Direction::In, Quantity::from_whole(2), "w", None, None)
            .await
            .unwrap();

        let first = ledger.movements_for(item_id).await.unwrap();
        let second = ledger.movements_for(item_id).await.unwrap();
        assert_eq!(first, second);
    }
}
