//! Reservations and their storage port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use common::{ItemId, Quantity, ReservationId};

use crate::error::{InventoryError, Result};
use crate::status::ReservationStatus;

/// A time-bound commitment of stock to a future use.
///
/// The quantity is fixed at creation: there is no amend operation. Amending
/// is modeled as cancel + re-reserve so the availability check always runs
/// from scratch instead of being patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: ReservationId,

    /// The reserved item.
    pub item_id: ItemId,

    /// Reserved quantity, always greater than zero.
    pub quantity: Quantity,

    /// Optional link to the order or client this reservation serves.
    pub context_ref: Option<String>,

    /// When the reservation was created.
    pub created_at: DateTime<Utc>,

    /// When the reserved stock is planned to be consumed.
    pub planned_date: DateTime<Utc>,

    /// Current lifecycle state.
    pub status: ReservationStatus,

    /// Optional free-form notes.
    pub notes: Option<String>,
}

impl Reservation {
    /// Creates a new pending reservation.
    pub fn new(
        item_id: ItemId,
        quantity: Quantity,
        context_ref: Option<String>,
        planned_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            item_id,
            quantity,
            context_ref,
            created_at: Utc::now(),
            planned_date,
            status: ReservationStatus::Pending,
            notes,
        }
    }

    /// Moves the reservation from pending to confirmed.
    pub fn confirm(&mut self) -> Result<()> {
        if !self.status.can_confirm() {
            return Err(InventoryError::InvalidTransition {
                status: self.status,
                action: "confirm",
            });
        }
        self.status = ReservationStatus::Confirmed;
        Ok(())
    }

    /// Cancels the reservation, releasing its committed quantity.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.status.can_cancel() {
            return Err(InventoryError::InvalidTransition {
                status: self.status,
                action: "cancel",
            });
        }
        self.status = ReservationStatus::Cancelled;
        Ok(())
    }

    /// Marks the reservation fulfilled.
    ///
    /// The caller must have appended the matching `out` movement first; see
    /// [`crate::StockService::fulfill_reservation`].
    pub fn fulfill(&mut self) -> Result<()> {
        if !self.status.can_fulfill() {
            return Err(InventoryError::InvalidTransition {
                status: self.status,
                action: "fulfill",
            });
        }
        self.status = ReservationStatus::Fulfilled;
        Ok(())
    }

    /// Returns true if the reservation counts against committed quantity.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Storage port for reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Inserts a new reservation.
    async fn insert(&self, reservation: Reservation) -> Result<()>;

    /// Looks up a reservation by ID.
    async fn get(&self, reservation_id: ReservationId) -> Result<Option<Reservation>>;

    /// Replaces an existing reservation by ID.
    async fn update(&self, reservation: Reservation) -> Result<()>;

    /// Returns reservations for an item in creation order, optionally
    /// filtered to a single status.
    async fn list_for_item(
        &self,
        item_id: ItemId,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>>;

    /// Returns the active (pending or confirmed) reservations attached to a
    /// context reference.
    async fn list_active_for_context(&self, context_ref: &str) -> Result<Vec<Reservation>>;

    /// Returns the total number of reservations stored.
    async fn reservation_count(&self) -> Result<usize>;
}

/// In-memory reservation store.
#[derive(Clone, Default)]
pub struct InMemoryReservationStore {
    reservations: Arc<RwLock<Vec<Reservation>>>,
}

impl InMemoryReservationStore {
    /// Creates a new empty reservation store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn insert(&self, reservation: Reservation) -> Result<()> {
        self.reservations.write().await.push(reservation);
        Ok(())
    }

    async fn get(&self, reservation_id: ReservationId) -> Result<Option<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .cloned())
    }

    async fn update(&self, reservation: Reservation) -> Result<()> {
        let mut reservations = self.reservations.write().await;
        let existing = reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
            .ok_or(InventoryError::UnknownReservation {
                reservation_id: reservation.id,
            })?;
        *existing = reservation;
        Ok(())
    }

    async fn list_for_item(
        &self,
        item_id: ItemId,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .iter()
            .filter(|r| r.item_id == item_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    async fn list_active_for_context(&self, context_ref: &str) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .iter()
            .filter(|r| r.is_active())
            .filter(|r| r.context_ref.as_deref() == Some(context_ref))
            .cloned()
            .collect())
    }

    async fn reservation_count(&self) -> Result<usize> {
        Ok(self.reservations.read().await.len())
    }
}
