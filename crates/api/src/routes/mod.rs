//! Route handlers.

pub mod health;
pub mod items;
pub mod metrics;
pub mod reservations;

use common::{ItemId, ReservationId};

use crate::error::ApiError;

pub(crate) fn parse_item_id(id: &str) -> Result<ItemId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid item id: {e}")))?;
    Ok(ItemId::from_uuid(uuid))
}

pub(crate) fn parse_reservation_id(id: &str) -> Result<ReservationId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid reservation id: {e}")))?;
    Ok(ReservationId::from_uuid(uuid))
}
