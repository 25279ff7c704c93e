//! Reservation lifecycle and overlap detection endpoints.

use std::collections::HashSet;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ItemId, Quantity};
use inventory::{Catalog, Reservation, ReservationStatus, ReservationStore};
use ledger::MovementStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::items::{AppState, MovementResponse};
use crate::routes::{parse_item_id, parse_reservation_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub item_id: String,
    pub quantity_thousandths: i64,
    pub context_ref: Option<String>,
    pub planned_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct FulfillRequest {
    pub actor: String,
}

#[derive(Deserialize)]
pub struct OverlapRequest {
    pub direct_selections: Vec<String>,
    pub context_ref: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct ReservationResponse {
    pub id: String,
    pub item_id: String,
    pub quantity_thousandths: i64,
    pub context_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub planned_date: DateTime<Utc>,
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

impl From<Reservation> for ReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.to_string(),
            item_id: reservation.item_id.to_string(),
            quantity_thousandths: reservation.quantity.thousandths(),
            context_ref: reservation.context_ref,
            created_at: reservation.created_at,
            planned_date: reservation.planned_date,
            status: reservation.status,
            notes: reservation.notes,
        }
    }
}

#[derive(Serialize)]
pub struct FulfillResponse {
    pub reservation: ReservationResponse,
    pub movement: MovementResponse,
}

#[derive(Serialize)]
pub struct OverlapResponse {
    pub conflicting: Vec<String>,
}

// -- Handlers --

/// POST /reservations — create a pending reservation.
#[tracing::instrument(skip(state, req))]
pub async fn create<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&req.item_id)?;
    let reservation = state
        .service
        .reserve(
            item_id,
            Quantity::from_thousandths(req.quantity_thousandths),
            req.context_ref,
            req.planned_date,
            req.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// POST /reservations/:id/confirm — pending → confirmed.
#[tracing::instrument(skip(state))]
pub async fn confirm<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<ReservationResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let reservation_id = parse_reservation_id(&id)?;
    let reservation = state.service.confirm_reservation(reservation_id).await?;
    Ok(Json(reservation.into()))
}

/// POST /reservations/:id/cancel — release the committed quantity.
#[tracing::instrument(skip(state))]
pub async fn cancel<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<ReservationResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let reservation_id = parse_reservation_id(&id)?;
    let reservation = state.service.cancel_reservation(reservation_id).await?;
    Ok(Json(reservation.into()))
}

/// POST /reservations/:id/fulfill — consume the reserved stock.
#[tracing::instrument(skip(state, req))]
pub async fn fulfill<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
    Json(req): Json<FulfillRequest>,
) -> Result<Json<FulfillResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let reservation_id = parse_reservation_id(&id)?;
    let (reservation, movement) = state
        .service
        .fulfill_reservation(reservation_id, &req.actor)
        .await?;
    Ok(Json(FulfillResponse {
        reservation: reservation.into(),
        movement: movement.into(),
    }))
}

/// POST /overlap — flag parts selected directly that a context already
/// reserves.
#[tracing::instrument(skip(state, req))]
pub async fn overlap<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Json(req): Json<OverlapRequest>,
) -> Result<Json<OverlapResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let mut direct: HashSet<ItemId> = HashSet::new();
    for id in &req.direct_selections {
        direct.insert(parse_item_id(id)?);
    }

    let conflicting = state
        .service
        .overlap_for_context(&direct, &req.context_ref)
        .await?;
    Ok(Json(OverlapResponse {
        conflicting: conflicting.iter().map(|id| id.to_string()).collect(),
    }))
}
