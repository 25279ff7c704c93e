//! Catalog maintenance, stock movements, and stock queries.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Money, Quantity, Unit};
use inventory::{
    Catalog, Item, RemovalOutcome, ReservationStatus, ReservationStore, StockService,
    StockSnapshot,
};
use ledger::{MovementStore, StockMovement};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::parse_item_id;

/// Shared application state accessible from all handlers.
pub struct AppState<C, M, R>
where
    C: Catalog,
    M: MovementStore,
    R: ReservationStore,
{
    pub service: StockService<C, M, R>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub part_number: String,
    pub unit: Unit,
    pub unit_price_cents: i64,
    pub min_level_thousandths: i64,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub unit_price_cents: i64,
    pub min_level_thousandths: i64,
}

#[derive(Deserialize)]
pub struct StockMovementRequest {
    pub quantity_thousandths: i64,
    pub actor: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    pub status: Option<ReservationStatus>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub part_number: String,
    pub unit: Unit,
    pub unit_price_cents: i64,
    pub min_level_thousandths: i64,
    pub retired: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            part_number: item.part_number.to_string(),
            unit: item.unit,
            unit_price_cents: item.unit_price.cents(),
            min_level_thousandths: item.min_level.thousandths(),
            retired: item.retired,
            created_at: item.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct MovementResponse {
    pub id: String,
    pub item_id: String,
    pub direction: ledger::Direction,
    pub quantity_thousandths: i64,
    pub recorded_at: DateTime<Utc>,
    pub actor: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl From<StockMovement> for MovementResponse {
    fn from(movement: StockMovement) -> Self {
        Self {
            id: movement.id.to_string(),
            item_id: movement.item_id.to_string(),
            direction: movement.direction,
            quantity_thousandths: movement.quantity.thousandths(),
            recorded_at: movement.recorded_at,
            actor: movement.actor,
            reference: movement.reference,
            notes: movement.notes,
        }
    }
}

#[derive(Serialize)]
pub struct RemovalResponse {
    pub outcome: RemovalOutcome,
}

// -- Handlers --

/// POST /items — create a catalog item.
#[tracing::instrument(skip(state, req))]
pub async fn create<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item = state
        .service
        .create_item(
            &req.name,
            &req.part_number,
            req.unit,
            Money::from_cents(req.unit_price_cents),
            Quantity::from_thousandths(req.min_level_thousandths),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /items — list all catalog items.
#[tracing::instrument(skip(state))]
pub async fn list<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let items = state.service.list_items().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// GET /items/:id — fetch one catalog item.
#[tracing::instrument(skip(state))]
pub async fn get<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let item = state.service.get_item(item_id).await?;
    Ok(Json(item.into()))
}

/// PUT /items/:id — update name, price, and minimum level.
#[tracing::instrument(skip(state, req))]
pub async fn update<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let item = state
        .service
        .update_item(
            item_id,
            &req.name,
            Money::from_cents(req.unit_price_cents),
            Quantity::from_thousandths(req.min_level_thousandths),
        )
        .await?;
    Ok(Json(item.into()))
}

/// DELETE /items/:id — remove an item, or retire it if it has history.
#[tracing::instrument(skip(state))]
pub async fn remove<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<RemovalResponse>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let outcome = state.service.remove_item(item_id).await?;
    Ok(Json(RemovalResponse { outcome }))
}

/// POST /items/:id/receive — record incoming stock.
#[tracing::instrument(skip(state, req))]
pub async fn receive<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
    Json(req): Json<StockMovementRequest>,
) -> Result<(StatusCode, Json<MovementResponse>), ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let movement = state
        .service
        .receive_stock(
            item_id,
            Quantity::from_thousandths(req.quantity_thousandths),
            &req.actor,
            req.reference,
            req.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement.into())))
}

/// POST /items/:id/issue — record outgoing stock.
#[tracing::instrument(skip(state, req))]
pub async fn issue<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
    Json(req): Json<StockMovementRequest>,
) -> Result<(StatusCode, Json<MovementResponse>), ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let movement = state
        .service
        .issue_stock(
            item_id,
            Quantity::from_thousandths(req.quantity_thousandths),
            &req.actor,
            req.reference,
            req.notes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement.into())))
}

/// GET /items/:id/snapshot — derived quantities and level classification.
#[tracing::instrument(skip(state))]
pub async fn snapshot<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<StockSnapshot>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let snapshot = state.service.snapshot(item_id).await?;
    Ok(Json(snapshot))
}

/// GET /items/:id/movements — movement history, oldest first.
#[tracing::instrument(skip(state))]
pub async fn movements<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MovementResponse>>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let movements = state.service.movements_for(item_id).await?;
    Ok(Json(movements.into_iter().map(Into::into).collect()))
}

/// GET /items/:id/reservations — reservations, optionally by status.
#[tracing::instrument(skip(state))]
pub async fn reservations<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
    Path(id): Path<String>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<Vec<super::reservations::ReservationResponse>>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let item_id = parse_item_id(&id)?;
    let reservations = state
        .service
        .reservations_for(item_id, query.status)
        .await?;
    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// GET /items/low-stock — low and critical items, ascending by available.
#[tracing::instrument(skip(state))]
pub async fn low_stock<C, M, R>(
    State(state): State<Arc<AppState<C, M, R>>>,
) -> Result<Json<Vec<StockSnapshot>>, ApiError>
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let snapshots = state.service.low_stock().await?;
    Ok(Json(snapshots))
}
