use thiserror::Error;

use common::{ItemId, Quantity};

/// Errors that can occur when interacting with the stock ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An outbound movement would drive the item's on-hand quantity negative.
    /// Nothing is appended when this is returned.
    #[error("insufficient stock for item {item_id}: requested {requested}, on hand {on_hand}")]
    InsufficientStock {
        item_id: ItemId,
        requested: Quantity,
        on_hand: Quantity,
    },

    /// A movement quantity was zero or negative.
    #[error("invalid movement quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: Quantity },

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
