//! Shared types for the inventory stock and reservation core.

pub mod quantity;
pub mod types;

pub use quantity::{Money, Quantity, Unit};
pub use types::{ItemId, MovementId, PartNumber, ReservationId};
