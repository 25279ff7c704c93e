//! Inventory core: catalog port, reservation lifecycle, and stock queries.
//!
//! The [`StockService`] is the single write-side entry point. It owns the
//! movement ledger, the reservation store, and the catalog port, and it
//! serializes quantity-affecting operations per item so that on-hand,
//! committed, and available quantities can never drift apart.

pub mod catalog;
pub mod conflict;
pub mod error;
pub mod locks;
pub mod query;
pub mod reservation;
pub mod service;
pub mod status;

pub use catalog::{Catalog, InMemoryCatalog, Item};
pub use conflict::find_overlap;
pub use error::{InventoryError, Result};
pub use locks::ItemLocks;
pub use query::StockSnapshot;
pub use reservation::{InMemoryReservationStore, Reservation, ReservationStore};
pub use service::{RemovalOutcome, StockService};
pub use status::{ReservationStatus, StockLevel};
