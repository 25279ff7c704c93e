//! Reservation state machine and stock level classification.

use serde::{Deserialize, Serialize};

use common::Quantity;

/// The state of a reservation in its lifecycle.
///
/// State transitions:
/// ```text
/// (create) ──► Pending ──confirm──► Confirmed
///                 │                     │
///                 ├──cancel──► Cancelled◄┘
///                 │                     │
///                 └──fulfill──► Fulfilled◄┘
/// ```
///
/// `Fulfilled` and `Cancelled` are terminal. While a reservation is
/// `Pending` or `Confirmed`, its quantity counts against the item's
/// committed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Freshly created, awaiting confirmation.
    #[default]
    Pending,

    /// Confirmed for a planned visit.
    Confirmed,

    /// Consumed; a matching `out` movement exists (terminal state).
    Fulfilled,

    /// Released without consumption (terminal state).
    Cancelled,
}

impl ReservationStatus {
    /// Returns true if the reservation can be confirmed in this state.
    pub fn can_confirm(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    /// Returns true if the reservation can be cancelled in this state.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Returns true if the reservation can be fulfilled in this state.
    pub fn can_fulfill(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Returns true if this is a terminal state (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Fulfilled | ReservationStatus::Cancelled
        )
    }

    /// Returns true if the reservation counts against committed quantity.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Fulfilled => "fulfilled",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stock level classification of an item, derived from on-hand quantity
/// and the item's minimum level.
///
/// An externally-supplied "ordered" overlay (open purchase order) lives
/// outside this core and is merged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// On-hand at or above the minimum level.
    Ok,
    /// On-hand above zero but below the minimum level.
    Low,
    /// Nothing on the shelf.
    Critical,
}

impl StockLevel {
    /// Classifies an item from its on-hand quantity and minimum level.
    pub fn classify(on_hand: Quantity, min_level: Quantity) -> Self {
        if on_hand.is_zero() {
            StockLevel::Critical
        } else if on_hand < min_level {
            StockLevel::Low
        } else {
            StockLevel::Ok
        }
    }

    /// Returns the level name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Ok => "ok",
            StockLevel::Low => "low",
            StockLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
