//! Overlap detection between direct part selections and reservations.

use std::collections::{BTreeSet, HashSet};

use common::ItemId;

use crate::reservation::Reservation;

/// Returns the items that appear both in the direct-selection set and in an
/// active (pending or confirmed) reservation.
///
/// Pure function with no stored state: callers invoke it on every edit of
/// either input and render the result as a non-blocking warning. Picking a
/// part both ways is allowed (a technician may genuinely want a reserved
/// quantity plus an ad-hoc one), it just gets flagged. The result is an
/// ordered set so repeated renders are stable.
pub fn find_overlap(
    direct_selections: &HashSet<ItemId>,
    reservations: &[Reservation],
) -> BTreeSet<ItemId> {
    reservations
        .iter()
        .filter(|r| r.is_active())
        .map(|r| r.item_id)
        .filter(|item_id| direct_selections.contains(item_id))
        .collect()
}
