//! Router tests over an in-memory data store

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_health_check() {
    let state = state_with(FakeStore::default());
    let response = get(router(&state), "/api/v1/health").await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_scan_item_code() {
    let state = state_with(FakeStore {
        items: vec![item("0042", "Projector")],
        ..Default::default()
    });

    let response = get(router(&state), "/api/v1/scan/ITEM-0042").await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reference"], json!({"identifier": "0042", "kind": "item"}));
    assert_eq!(body["collection"], "inventory_items");
    assert_eq!(body["found"], true);
    assert_eq!(body["item"]["name"], "Projector");
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn test_scan_user_code_not_found() {
    let state = state_with(FakeStore {
        users: vec![user("ab12")],
        ..Default::default()
    });

    let body = body_json(get(router(&state), "/api/v1/scan/USER-zz99").await).await;
    assert_eq!(body["reference"]["kind"], "user");
    assert_eq!(body["collection"], "users");
    assert_eq!(body["found"], false);

    let body = body_json(get(router(&state), "/api/v1/scan/user-ab12").await).await;
    assert_eq!(body["found"], true);
    assert_eq!(body["user"]["lastname"], "Lovelace");
}

#[tokio::test]
async fn test_scan_unknown_code() {
    let state = state_with(FakeStore::default());
    let body = body_json(get(router(&state), "/api/v1/scan/XYZ").await).await;

    assert_eq!(body["reference"], json!({"identifier": "XYZ", "kind": "unknown"}));
    assert!(body["collection"].is_null());
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn test_scan_blank_code() {
    let state = state_with(FakeStore::default());
    let response = get(router(&state), "/api/v1/scan/%20%20").await;

    assert_status(&response, StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_render_barcode() {
    let state = state_with(FakeStore::default());
    let response = get(router(&state), "/api/v1/barcodes/42?kind=item").await;

    assert_status(&response, StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let svg = body_text(response).await;
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">ITEM-42</text>"));
}

#[tokio::test]
async fn test_render_barcode_rejects_unsupported_characters() {
    let state = state_with(FakeStore::default());
    let response = get(router(&state), "/api/v1/barcodes/a%23b").await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_render_barcode_rejects_lowercase() {
    let state = state_with(FakeStore::default());
    let response = get(router(&state), "/api/v1/barcodes/jdoe?kind=user").await;

    assert_status(&response, StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("'j'"));
}

fn borrow_store() -> FakeStore {
    FakeStore {
        items: vec![item("0042", "Projector")],
        users: vec![user("ab12")],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_borrow_and_return() {
    let state = state_with(borrow_store());

    let response = post_json(
        router(&state),
        "/api/v1/borrow-records",
        json!({"item_code": "ITEM-0042", "user_code": "USER-ab12", "duration_days": 7}),
    )
    .await;
    assert_status(&response, StatusCode::CREATED);
    let record = body_json(response).await;
    assert_eq!(record["item_id"], 1);
    assert_eq!(record["user_id"], 7);
    let code = record["code"].as_str().unwrap().to_string();

    let list = body_json(get(router(&state), "/api/v1/notifications").await).await;
    assert_eq!(list[0]["variant"], "success");
    assert_eq!(list[0]["description"], "Projector lent to Ada Lovelace");

    let uri = format!("/api/v1/borrow-records/BORROW-{}/return", code);
    let response = send(
        router(&state),
        axum::http::Request::post(&uri).body(axum::body::Body::empty()).unwrap(),
    )
    .await;
    assert_status(&response, StatusCode::OK);
    assert!(!body_json(response).await["returned_at"].is_null());

    let response = send(
        router(&state),
        axum::http::Request::post(&uri).body(axum::body::Body::empty()).unwrap(),
    )
    .await;
    assert_status(&response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_borrow_error_statuses() {
    let state = state_with(borrow_store());
    let borrow = |item_code: &str| {
        json!({"item_code": item_code, "user_code": "USER-ab12"})
    };

    let response = post_json(router(&state), "/api/v1/borrow-records", borrow("ITEM-9999")).await;
    assert_status(&response, StatusCode::NOT_FOUND);

    let response = post_json(router(&state), "/api/v1/borrow-records", borrow("ITEM-0042")).await;
    assert_status(&response, StatusCode::CREATED);

    let response = post_json(router(&state), "/api/v1/borrow-records", borrow("ITEM-0042")).await;
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(
        router(&state),
        axum::http::Request::post("/api/v1/borrow-records/BORROW-NOPE/return")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_lifecycle() {
    let state = state_with(FakeStore::default());

    let response = post_json(
        router(&state),
        "/api/v1/notifications",
        json!({"title": "Saved", "description": "Item updated", "variant": "success"}),
    )
    .await;
    assert_status(&response, StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let list = body_json(get(router(&state), "/api/v1/notifications").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Saved");
    assert_eq!(list[0]["variant"], "success");
    assert_eq!(list[0]["id"], id.as_str());

    let uri = format!("/api/v1/notifications/{}", id);
    assert_status(&delete(router(&state), &uri).await, StatusCode::NO_CONTENT);
    assert_status(&delete(router(&state), &uri).await, StatusCode::NOT_FOUND);

    let list = body_json(get(router(&state), "/api/v1/notifications").await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_publish_requires_title() {
    let state = state_with(FakeStore::default());
    let response = post_json(router(&state), "/api/v1/notifications", json!({"title": ""})).await;

    assert_status(&response, StatusCode::BAD_REQUEST);
    assert!(state.notifications.snapshot().is_empty());
}

#[tokio::test]
async fn test_readiness_follows_probe() {
    let state = state_with(FakeStore {
        reachable: true,
        ..Default::default()
    });

    let response = get(router(&state), "/api/v1/ready").await;
    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["database"]["state"], "loading");

    state.services.health.probe().await;

    let response = get(router(&state), "/api/v1/ready").await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await["database"]["state"], "connected");
}

#[tokio::test]
async fn test_failed_probe_publishes_notification() {
    let state = state_with(FakeStore::default());
    state.services.health.probe().await;

    let body = body_json(get(router(&state), "/api/v1/ready").await).await;
    assert_eq!(body["database"]["state"], "error");
    assert_eq!(body["database"]["detail"], "connection refused");

    let list = body_json(get(router(&state), "/api/v1/notifications").await).await;
    assert_eq!(list[0]["variant"], "destructive");
}
