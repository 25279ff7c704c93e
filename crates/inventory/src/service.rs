//! The stock service: every quantity-affecting operation, serialized per item.

use chrono::{DateTime, Utc};
use serde::Serialize;

use common::{ItemId, Money, Quantity, ReservationId, Unit};
use ledger::{Direction, MovementStore, StockLedger, StockMovement};

use crate::catalog::{Catalog, Item};
use crate::error::{InventoryError, Result};
use crate::locks::ItemLocks;
use crate::query::StockSnapshot;
use crate::reservation::{Reservation, ReservationStore};
use crate::status::{ReservationStatus, StockLevel};

/// What happened to an item on a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalOutcome {
    /// The item had no ledger history and was physically deleted.
    Deleted,
    /// The item had ledger history and was retired instead, preserving
    /// the audit trail.
    Retired,
}

/// Write-side entry point for stock, reservations, and catalog maintenance.
///
/// Owns the movement ledger, the reservation store, and the catalog port.
/// Every operation that touches quantities runs under the item's lock, so
/// on-hand, committed, and available stay consistent without global
/// locking; operations on different items proceed in parallel.
pub struct StockService<C, M, R>
where
    C: Catalog,
    M: MovementStore,
    R: ReservationStore,
{
    catalog: C,
    ledger: StockLedger<M>,
    reservations: R,
    locks: ItemLocks,
}

impl<C, M, R> StockService<C, M, R>
where
    C: Catalog,
    M: MovementStore,
    R: ReservationStore,
{
    /// Creates a service over the given catalog and stores.
    pub fn new(catalog: C, movement_store: M, reservation_store: R) -> Self {
        Self {
            catalog,
            ledger: StockLedger::new(movement_store),
            reservations: reservation_store,
            locks: ItemLocks::new(),
        }
    }

    /// Returns a reference to the catalog port.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns a reference to the stock ledger.
    pub fn ledger(&self) -> &StockLedger<M> {
        &self.ledger
    }

    /// Returns a reference to the reservation store.
    pub fn reservations(&self) -> &R {
        &self.reservations
    }

    // -- Catalog maintenance --

    /// Creates a new catalog item.
    #[tracing::instrument(skip(self))]
    pub async fn create_item(
        &self,
        name: &str,
        part_number: &str,
        unit: Unit,
        unit_price: Money,
        min_level: Quantity,
    ) -> Result<Item> {
        let item = Item::new(name, part_number, unit, unit_price, min_level)?;
        self.catalog.insert(item.clone()).await?;
        tracing::info!(item_id = %item.id, part_number = %item.part_number, "item created");
        Ok(item)
    }

    /// Updates an item's mutable fields. The unit of measure is fixed at
    /// creation.
    #[tracing::instrument(skip(self))]
    pub async fn update_item(
        &self,
        item_id: ItemId,
        name: &str,
        unit_price: Money,
        min_level: Quantity,
    ) -> Result<Item> {
        let mut item = self.existing_item(item_id).await?;
        if unit_price.is_negative() {
            return Err(InventoryError::NegativePrice { price: unit_price });
        }
        if min_level.is_negative() {
            return Err(InventoryError::NegativeMinLevel { min_level });
        }
        if !item.unit.accepts(min_level) {
            return Err(InventoryError::QuantityPrecision {
                quantity: min_level,
                unit: item.unit,
            });
        }

        item.name = name.to_string();
        item.unit_price = unit_price;
        item.min_level = min_level;
        self.catalog.update(item.clone()).await?;
        Ok(item)
    }

    /// Retires an item: it stays readable but rejects all stock activity.
    #[tracing::instrument(skip(self))]
    pub async fn retire_item(&self, item_id: ItemId) -> Result<Item> {
        let mut item = self.existing_item(item_id).await?;
        item.retired = true;
        self.catalog.update(item.clone()).await?;
        tracing::info!(%item_id, "item retired");
        Ok(item)
    }

    /// Removes an item, downgrading to a retire when ledger history exists.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, item_id: ItemId) -> Result<RemovalOutcome> {
        let item = self.existing_item(item_id).await?;
        let history = self.ledger.movements_for(item_id).await?;
        if history.is_empty() {
            self.catalog.remove(item_id).await?;
            tracing::info!(%item_id, "item deleted");
            Ok(RemovalOutcome::Deleted)
        } else {
            let mut item = item;
            item.retired = true;
            self.catalog.update(item).await?;
            tracing::info!(%item_id, "item has ledger history, retired instead");
            Ok(RemovalOutcome::Retired)
        }
    }

    /// Looks up an item by ID.
    pub async fn get_item(&self, item_id: ItemId) -> Result<Item> {
        self.existing_item(item_id).await
    }

    /// Returns all catalog items in creation order.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        self.catalog.list().await
    }

    // -- Stock movements --

    /// Records incoming stock for an item.
    #[tracing::instrument(skip(self))]
    pub async fn receive_stock(
        &self,
        item_id: ItemId,
        quantity: Quantity,
        actor: &str,
        reference: Option<String>,
        notes: Option<String>,
    ) -> Result<StockMovement> {
        let item = self.active_item(item_id).await?;
        check_quantity(&item, quantity)?;

        let _guard = self.locks.acquire(item_id).await;
        let movement = self
            .ledger
            .record(item_id, Direction::In, quantity, actor, reference, notes)
            .await?;
        metrics::counter!("stock_received_total").increment(1);
        Ok(movement)
    }

    /// Records outgoing stock for an item.
    ///
    /// Available quantity is a hard floor: an issuance may not consume
    /// stock that an active reservation has committed, so confirmed
    /// reservations can never be broken by unrelated issuances.
    #[tracing::instrument(skip(self))]
    pub async fn issue_stock(
        &self,
        item_id: ItemId,
        quantity: Quantity,
        actor: &str,
        reference: Option<String>,
        notes: Option<String>,
    ) -> Result<StockMovement> {
        let item = self.active_item(item_id).await?;
        check_quantity(&item, quantity)?;

        let _guard = self.locks.acquire(item_id).await;
        let available = self.available_locked(item_id).await?;
        if quantity > available {
            return Err(InventoryError::InsufficientStock {
                item_id,
                requested: quantity,
                available,
            });
        }

        let movement = self
            .ledger
            .record(item_id, Direction::Out, quantity, actor, reference, notes)
            .await?;
        metrics::counter!("stock_issued_total").increment(1);
        Ok(movement)
    }

    // -- Reservation lifecycle --

    /// Creates a pending reservation, checking availability first.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(
        &self,
        item_id: ItemId,
        quantity: Quantity,
        context_ref: Option<String>,
        planned_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Reservation> {
        let item = self.active_item(item_id).await?;
        check_quantity(&item, quantity)?;

        let _guard = self.locks.acquire(item_id).await;
        let available = self.available_locked(item_id).await?;
        if quantity > available {
            return Err(InventoryError::InsufficientAvailability {
                item_id,
                requested: quantity,
                available,
            });
        }

        let reservation = Reservation::new(item_id, quantity, context_ref, planned_date, notes);
        self.reservations.insert(reservation.clone()).await?;
        metrics::counter!("reservations_created_total").increment(1);
        tracing::info!(
            reservation_id = %reservation.id,
            %item_id,
            quantity = %quantity,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Confirms a pending reservation. Committed quantity is unchanged:
    /// pending and confirmed both count.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_reservation(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let item_id = self.reservation_item(reservation_id).await?;
        let _guard = self.locks.acquire(item_id).await;

        let mut reservation = self.existing_reservation(reservation_id).await?;
        reservation.confirm()?;
        self.reservations.update(reservation.clone()).await?;
        Ok(reservation)
    }

    /// Cancels a pending or confirmed reservation, releasing its committed
    /// quantity immediately.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_reservation(&self, reservation_id: ReservationId) -> Result<Reservation> {
        let item_id = self.reservation_item(reservation_id).await?;
        let _guard = self.locks.acquire(item_id).await;

        let mut reservation = self.existing_reservation(reservation_id).await?;
        reservation.cancel()?;
        self.reservations.update(reservation.clone()).await?;
        metrics::counter!("reservations_cancelled_total").increment(1);
        Ok(reservation)
    }

    /// Fulfills a reservation: appends the matching `out` movement, then
    /// flips the status.
    ///
    /// If the ledger rejects the movement the reservation is left exactly
    /// as it was; fulfillment is never partially applied.
    #[tracing::instrument(skip(self))]
    pub async fn fulfill_reservation(
        &self,
        reservation_id: ReservationId,
        actor: &str,
    ) -> Result<(Reservation, StockMovement)> {
        let item_id = self.reservation_item(reservation_id).await?;
        let _guard = self.locks.acquire(item_id).await;

        let current = self.existing_reservation(reservation_id).await?;
        let mut fulfilled = current.clone();
        fulfilled.fulfill()?;

        let movement = self
            .ledger
            .record(
                current.item_id,
                Direction::Out,
                current.quantity,
                actor,
                current.context_ref.clone(),
                None,
            )
            .await?;

        self.reservations.update(fulfilled.clone()).await?;
        metrics::counter!("reservations_fulfilled_total").increment(1);
        tracing::info!(
            %reservation_id,
            item_id = %current.item_id,
            quantity = %current.quantity,
            "reservation fulfilled"
        );
        Ok((fulfilled, movement))
    }

    // -- Queries --

    /// Takes a single consistent read of an item's stock position.
    #[tracing::instrument(skip(self))]
    pub async fn snapshot(&self, item_id: ItemId) -> Result<StockSnapshot> {
        let item = self.existing_item(item_id).await?;
        let _guard = self.locks.acquire(item_id).await;
        self.snapshot_locked(&item).await
    }

    /// Returns the items classified low or critical, ascending by available
    /// quantity. Retired items are skipped.
    #[tracing::instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<StockSnapshot>> {
        let items = self.catalog.list().await?;
        let mut snapshots = Vec::new();
        for item in items.iter().filter(|i| i.is_active()) {
            let _guard = self.locks.acquire(item.id).await;
            let snapshot = self.snapshot_locked(item).await?;
            if snapshot.status != StockLevel::Ok {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by_key(|s| s.available);
        Ok(snapshots)
    }

    /// Returns an item's movements, oldest first.
    pub async fn movements_for(&self, item_id: ItemId) -> Result<Vec<StockMovement>> {
        self.existing_item(item_id).await?;
        self.ledger.movements_for(item_id).await.map_err(Into::into)
    }

    /// Returns an item's reservations in creation order, optionally
    /// filtered to a single status.
    pub async fn reservations_for(
        &self,
        item_id: ItemId,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        self.existing_item(item_id).await?;
        self.reservations.list_for_item(item_id, status).await
    }

    /// Returns the item's on-hand quantity.
    pub async fn on_hand(&self, item_id: ItemId) -> Result<Quantity> {
        self.existing_item(item_id).await?;
        let _guard = self.locks.acquire(item_id).await;
        self.ledger.on_hand(item_id).await.map_err(Into::into)
    }

    /// Returns the item's committed quantity (sum over active reservations).
    pub async fn committed(&self, item_id: ItemId) -> Result<Quantity> {
        self.existing_item(item_id).await?;
        let _guard = self.locks.acquire(item_id).await;
        self.committed_locked(item_id).await
    }

    /// Loads the active reservations for a context and intersects them with
    /// a direct part-selection set (see [`crate::conflict::find_overlap`]).
    pub async fn overlap_for_context(
        &self,
        direct_selections: &std::collections::HashSet<ItemId>,
        context_ref: &str,
    ) -> Result<std::collections::BTreeSet<ItemId>> {
        let reservations = self.reservations.list_active_for_context(context_ref).await?;
        Ok(crate::conflict::find_overlap(direct_selections, &reservations))
    }

    // -- Internal helpers --

    async fn existing_item(&self, item_id: ItemId) -> Result<Item> {
        self.catalog
            .get(item_id)
            .await?
            .ok_or(InventoryError::UnknownItem { item_id })
    }

    async fn active_item(&self, item_id: ItemId) -> Result<Item> {
        let item = self.existing_item(item_id).await?;
        if item.retired {
            return Err(InventoryError::ItemRetired { item_id });
        }
        Ok(item)
    }

    async fn existing_reservation(&self, reservation_id: ReservationId) -> Result<Reservation> {
        self.reservations
            .get(reservation_id)
            .await?
            .ok_or(InventoryError::UnknownReservation { reservation_id })
    }

    async fn reservation_item(&self, reservation_id: ReservationId) -> Result<ItemId> {
        Ok(self.existing_reservation(reservation_id).await?.item_id)
    }

    async fn committed_locked(&self, item_id: ItemId) -> Result<Quantity> {
        let reservations = self.reservations.list_for_item(item_id, None).await?;
        Ok(reservations
            .iter()
            .filter(|r| r.is_active())
            .map(|r| r.quantity)
            .sum())
    }

    async fn available_locked(&self, item_id: ItemId) -> Result<Quantity> {
        let on_hand = self.ledger.on_hand(item_id).await?;
        let committed = self.committed_locked(item_id).await?;
        Ok(on_hand - committed)
    }

    async fn snapshot_locked(&self, item: &Item) -> Result<StockSnapshot> {
        let on_hand = self.ledger.on_hand(item.id).await?;
        let committed = self.committed_locked(item.id).await?;
        Ok(StockSnapshot {
            item_id: item.id,
            on_hand,
            committed,
            available: on_hand - committed,
            status: StockLevel::classify(on_hand, item.min_level),
            min_level: item.min_level,
        })
    }
}

fn check_quantity(item: &Item, quantity: Quantity) -> Result<()> {
    if !quantity.is_positive() {
        return Err(InventoryError::InvalidQuantity { quantity });
    }
    if !item.unit.accepts(quantity) {
        return Err(InventoryError::QuantityPrecision {
            quantity,
            unit: item.unit,
        });
    }
    Ok(())
}
