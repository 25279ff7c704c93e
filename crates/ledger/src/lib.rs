//! Append-only stock movement ledger.
//!
//! The ledger is the authoritative history of physical stock changes. The
//! on-hand quantity of an item is never stored; it is derived by folding the
//! item's movements, so the log and the quantity cannot drift apart.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod movement;
pub mod store;

pub use common::{ItemId, MovementId, Quantity};
pub use error::{LedgerError, Result};
pub use ledger::StockLedger;
pub use memory::InMemoryMovementStore;
pub use movement::{Direction, StockMovement};
pub use store::{MovementStore, MovementStream};
