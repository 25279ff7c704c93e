//! Inventory error types.

use thiserror::Error;

use common::{ItemId, Money, PartNumber, Quantity, ReservationId, Unit};
use ledger::LedgerError;

use crate::status::ReservationStatus;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Reference to an item that does not exist.
    #[error("unknown item: {item_id}")]
    UnknownItem { item_id: ItemId },

    /// Mutation attempted against a retired item.
    #[error("item {item_id} is retired")]
    ItemRetired { item_id: ItemId },

    /// Reference to a reservation that does not exist.
    #[error("unknown reservation: {reservation_id}")]
    UnknownReservation { reservation_id: ReservationId },

    /// An issuance would drive the item's available quantity negative.
    /// Nothing is recorded when this is returned.
    #[error(
        "insufficient stock for item {item_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        item_id: ItemId,
        requested: Quantity,
        available: Quantity,
    },

    /// A reservation request exceeds the item's available quantity.
    /// The reservation is not created.
    #[error(
        "insufficient availability for item {item_id}: requested {requested}, available {available}"
    )]
    InsufficientAvailability {
        item_id: ItemId,
        requested: Quantity,
        available: Quantity,
    },

    /// A reservation status change was requested from a state that does not
    /// permit it.
    #[error("invalid transition: cannot {action} a {status} reservation")]
    InvalidTransition {
        status: ReservationStatus,
        action: &'static str,
    },

    /// A quantity was zero or negative.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: Quantity },

    /// A quantity uses more decimal places than the item's unit allows.
    #[error("quantity {quantity} does not match the precision of unit {unit}")]
    QuantityPrecision { quantity: Quantity, unit: Unit },

    /// A unit price below zero.
    #[error("invalid unit price: {price} (must not be negative)")]
    NegativePrice { price: Money },

    /// A minimum stock level below zero.
    #[error("invalid minimum level: {min_level} (must not be negative)")]
    NegativeMinLevel { min_level: Quantity },

    /// A part number that is already taken by another catalog item.
    #[error("duplicate part number: {part_number}")]
    DuplicatePartNumber { part_number: PartNumber },

    /// An error surfaced by the stock ledger.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
