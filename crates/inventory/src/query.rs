//! Read-side composite view of an item's stock position.

use serde::Serialize;

use common::{ItemId, Quantity};

use crate::status::StockLevel;

/// A single consistent read of an item's derived quantities.
///
/// All fields are computed from the ledger and the reservation store under
/// the item's lock; none of them is stored anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSnapshot {
    /// The item this snapshot describes.
    pub item_id: ItemId,

    /// Physical stock on the shelf (ledger fold).
    pub on_hand: Quantity,

    /// Stock promised to active reservations.
    pub committed: Quantity,

    /// On-hand minus committed; what can still be reserved or issued.
    pub available: Quantity,

    /// Level classification against the item's minimum level.
    pub status: StockLevel,

    /// The minimum level the classification compares against.
    pub min_level: Quantity,
}
