//! HTTP API server for the inventory stock and reservation core.
//!
//! Exposes catalog maintenance, stock movements, the reservation lifecycle,
//! and the read-side queries over REST, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use inventory::{Catalog, InMemoryCatalog, InMemoryReservationStore, ReservationStore, StockService};
use ledger::{InMemoryMovementStore, MovementStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::items::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, M, R>(state: Arc<AppState<C, M, R>>, metrics_handle: PrometheusHandle) -> Router
where
    C: Catalog + 'static,
    M: MovementStore + 'static,
    R: ReservationStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/items", post(routes::items::create::<C, M, R>))
        .route("/items", get(routes::items::list::<C, M, R>))
        .route("/items/low-stock", get(routes::items::low_stock::<C, M, R>))
        .route("/items/{id}", get(routes::items::get::<C, M, R>))
        .route("/items/{id}", put(routes::items::update::<C, M, R>))
        .route("/items/{id}", delete(routes::items::remove::<C, M, R>))
        .route(
            "/items/{id}/receive",
            post(routes::items::receive::<C, M, R>),
        )
        .route("/items/{id}/issue", post(routes::items::issue::<C, M, R>))
        .route(
            "/items/{id}/snapshot",
            get(routes::items::snapshot::<C, M, R>),
        )
        .route(
            "/items/{id}/movements",
            get(routes::items::movements::<C, M, R>),
        )
        .route(
            "/items/{id}/reservations",
            get(routes::items::reservations::<C, M, R>),
        )
        .route(
            "/reservations",
            post(routes::reservations::create::<C, M, R>),
        )
        .route(
            "/reservations/{id}/confirm",
            post(routes::reservations::confirm::<C, M, R>),
        )
        .route(
            "/reservations/{id}/cancel",
            post(routes::reservations::cancel::<C, M, R>),
        )
        .route(
            "/reservations/{id}/fulfill",
            post(routes::reservations::fulfill::<C, M, R>),
        )
        .route("/overlap", post(routes::reservations::overlap::<C, M, R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by the in-memory stores.
pub fn create_default_state()
-> Arc<AppState<InMemoryCatalog, InMemoryMovementStore, InMemoryReservationStore>> {
    let service = StockService::new(
        InMemoryCatalog::new(),
        InMemoryMovementStore::new(),
        InMemoryReservationStore::new(),
    );
    Arc::new(AppState { service })
}
