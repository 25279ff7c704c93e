use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{ItemId, MovementId, Quantity};

use crate::error::{LedgerError, Result};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Stock entered the warehouse (receiving, returns).
    In,
    /// Stock left the warehouse (issuing, reservation fulfillment).
    Out,
}

impl Direction {
    /// Returns the direction name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded stock-in or stock-out event.
///
/// Movements are immutable once appended; corrections are made by appending
/// a compensating movement, never by editing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique identifier for this movement.
    pub id: MovementId,

    /// The item that moved.
    pub item_id: ItemId,

    /// Whether stock came in or went out.
    pub direction: Direction,

    /// Moved quantity, always greater than zero.
    pub quantity: Quantity,

    /// When the movement was recorded.
    pub recorded_at: DateTime<Utc>,

    /// Who recorded the movement (opaque identity from the caller).
    pub actor: String,

    /// Optional reference document (delivery note, service order).
    pub reference: Option<String>,

    /// Optional free-form notes.
    pub notes: Option<String>,
}

impl StockMovement {
    /// Builds a new movement, validating that the quantity is positive.
    pub fn record(
        item_id: ItemId,
        direction: Direction,
        quantity: Quantity,
        actor: impl Into<String>,
        reference: Option<String>,
        notes: Option<String>,
    ) -> Result<Self> {
        if !quantity.is_positive() {
            return Err(LedgerError::InvalidQuantity { quantity });
        }

        Ok(Self {
            id: MovementId::new(),
            item_id,
            direction,
            quantity,
            recorded_at: Utc::now(),
            actor: actor.into(),
            reference,
            notes,
        })
    }

    /// Returns the signed effect of this movement on on-hand stock.
    pub fn effect(&self) -> Quantity {
        match self.direction {
            Direction::In => self.quantity,
            Direction::Out => Quantity::zero() - self.quantity,
        }
    }
}
