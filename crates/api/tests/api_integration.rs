//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    let state = api::create_default_state();
    api::create_app(state, get_metrics_handle())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_filter_item(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/items",
        Some(json!({
            "name": "Pleated filter 16x25",
            "part_number": "FLT-1625",
            "unit": "piece",
            "unit_price_cents": 899,
            "min_level_thousandths": 10_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn receive(app: &Router, item_id: &str, quantity_thousandths: i64) {
    let (status, _) = send(
        app,
        "POST",
        &format!("/items/{item_id}/receive"),
        Some(json!({
            "quantity_thousandths": quantity_thousandths,
            "actor": "warehouse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn health_check() {
    let app = setup();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let app = setup();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_and_get_item() {
    let app = setup();
    let item_id = create_filter_item(&app).await;

    let (status, body) = send(&app, "GET", &format!("/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pleated filter 16x25");
    assert_eq!(body["part_number"], "FLT-1625");
    assert_eq!(body["unit"], "piece");
    assert_eq!(body["retired"], false);
}

#[tokio::test]
async fn duplicate_part_number_conflicts() {
    let app = setup();
    create_filter_item(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/items",
        Some(json!({
            "name": "Another filter",
            "part_number": "FLT-1625",
            "unit": "piece",
            "unit_price_cents": 999,
            "min_level_thousandths": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("FLT-1625"));
}

#[tokio::test]
async fn unknown_item_is_404() {
    let app = setup();
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/items/{missing}/snapshot"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_400() {
    let app = setup();
    let (status, _) = send(&app, "GET", "/items/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receive_then_snapshot() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 8_000).await;

    let (status, body) = send(&app, "GET", &format!("/items/{item_id}/snapshot"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["on_hand"], 8_000);
    assert_eq!(body["committed"], 0);
    assert_eq!(body["available"], 8_000);
    assert_eq!(body["status"], "low");

    receive(&app, &item_id, 5_000).await;
    let (_, body) = send(&app, "GET", &format!("/items/{item_id}/snapshot"), None).await;
    assert_eq!(body["on_hand"], 13_000);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn zero_quantity_receive_is_400() {
    let app = setup();
    let item_id = create_filter_item(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/items/{item_id}/receive"),
        Some(json!({ "quantity_thousandths": 0, "actor": "warehouse" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overdraw_issue_is_409() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 5_000).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/items/{item_id}/issue"),
        Some(json!({ "quantity_thousandths": 6_000, "actor": "tech" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("insufficient"));

    // The rejected issue recorded nothing.
    let (_, movements) = send(&app, "GET", &format!("/items/{item_id}/movements"), None).await;
    assert_eq!(movements.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reservation_lifecycle_over_http() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 10_000).await;

    // Reserve 4.
    let (status, reservation) = send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": item_id,
            "quantity_thousandths": 4_000,
            "context_ref": "SO-2051",
            "planned_date": "2026-08-12T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["status"], "pending");
    let reservation_id = reservation["id"].as_str().unwrap().to_string();

    let (_, snapshot) = send(&app, "GET", &format!("/items/{item_id}/snapshot"), None).await;
    assert_eq!(snapshot["committed"], 4_000);
    assert_eq!(snapshot["available"], 6_000);

    // Confirm, then fulfill.
    let (status, confirmed) = send(
        &app,
        "POST",
        &format!("/reservations/{reservation_id}/confirm"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, fulfilled) = send(
        &app,
        "POST",
        &format!("/reservations/{reservation_id}/fulfill"),
        Some(json!({ "actor": "jmendez" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fulfilled["reservation"]["status"], "fulfilled");
    assert_eq!(fulfilled["movement"]["direction"], "out");
    assert_eq!(fulfilled["movement"]["quantity_thousandths"], 4_000);
    assert_eq!(fulfilled["movement"]["reference"], "SO-2051");

    // Fulfilling again is a stale-state conflict.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/reservations/{reservation_id}/fulfill"),
        Some(json!({ "actor": "jmendez" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, snapshot) = send(&app, "GET", &format!("/items/{item_id}/snapshot"), None).await;
    assert_eq!(snapshot["on_hand"], 6_000);
    assert_eq!(snapshot["committed"], 0);
}

#[tokio::test]
async fn over_reservation_is_409() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 10_000).await;

    let (status, _) = send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": item_id,
            "quantity_thousandths": 10_000,
            "planned_date": "2026-08-12T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": item_id,
            "quantity_thousandths": 1_000,
            "planned_date": "2026-08-12T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn reservation_list_filters_by_status() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 10_000).await;

    let (_, first) = send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": item_id,
            "quantity_thousandths": 2_000,
            "planned_date": "2026-08-12T09:00:00Z"
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": item_id,
            "quantity_thousandths": 3_000,
            "planned_date": "2026-08-14T09:00:00Z"
        })),
    )
    .await;
    let first_id = first["id"].as_str().unwrap();
    send(
        &app,
        "POST",
        &format!("/reservations/{first_id}/confirm"),
        None,
    )
    .await;

    let (status, confirmed) = send(
        &app,
        "GET",
        &format!("/items/{item_id}/reservations?status=confirmed"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed.as_array().unwrap().len(), 1);
    assert_eq!(confirmed[0]["id"], *first_id);

    let (_, all) = send(
        &app,
        "GET",
        &format!("/items/{item_id}/reservations"),
        None,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn overlap_endpoint_flags_reserved_parts() {
    let app = setup();
    let filter_id = create_filter_item(&app).await;
    let (_, capacitor) = send(
        &app,
        "POST",
        "/items",
        Some(json!({
            "name": "Run capacitor 35/5",
            "part_number": "CAP-355",
            "unit": "piece",
            "unit_price_cents": 1250,
            "min_level_thousandths": 0
        })),
    )
    .await;
    let capacitor_id = capacitor["id"].as_str().unwrap().to_string();
    receive(&app, &capacitor_id, 4_000).await;

    send(
        &app,
        "POST",
        "/reservations",
        Some(json!({
            "item_id": capacitor_id,
            "quantity_thousandths": 1_000,
            "context_ref": "SO-2051",
            "planned_date": "2026-08-12T09:00:00Z"
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/overlap",
        Some(json!({
            "direct_selections": [filter_id, capacitor_id],
            "context_ref": "SO-2051"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let conflicting = body["conflicting"].as_array().unwrap();
    assert_eq!(conflicting.len(), 1);
    assert_eq!(conflicting[0], Value::String(capacitor_id));
}

#[tokio::test]
async fn low_stock_lists_ascending_by_available() {
    let app = setup();
    let filter_id = create_filter_item(&app).await;
    receive(&app, &filter_id, 8_000).await;

    let (_, capacitor) = send(
        &app,
        "POST",
        "/items",
        Some(json!({
            "name": "Run capacitor 35/5",
            "part_number": "CAP-355",
            "unit": "piece",
            "unit_price_cents": 1250,
            "min_level_thousandths": 4_000
        })),
    )
    .await;
    let capacitor_id = capacitor["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/items/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["item_id"], *capacitor_id);
    assert_eq!(entries[0]["status"], "critical");
    assert_eq!(entries[1]["item_id"], filter_id);
    assert_eq!(entries[1]["status"], "low");
}

#[tokio::test]
async fn delete_item_with_history_retires() {
    let app = setup();
    let item_id = create_filter_item(&app).await;
    receive(&app, &item_id, 1_000).await;

    let (status, body) = send(&app, "DELETE", &format!("/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "retired");

    // Further receiving is rejected, but the item stays readable.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/items/{item_id}/receive"),
        Some(json!({ "quantity_thousandths": 1_000, "actor": "warehouse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, item) = send(&app, "GET", &format!("/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["retired"], true);
}

#[tokio::test]
async fn delete_item_without_history_deletes() {
    let app = setup();
    let item_id = create_filter_item(&app).await;

    let (status, body) = send(&app, "DELETE", &format!("/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "deleted");

    let (status, _) = send(&app, "GET", &format!("/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
