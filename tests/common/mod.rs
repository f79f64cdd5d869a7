//! Shared fixtures for router tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use stockroom_server::{
    api,
    barcode::BarcodeClassifier,
    models::{BorrowRecord, InventoryItem, User},
    notifications::NotificationBus,
    repository::{DataStore, Repository, StoreHealth},
    services::Services,
    AppConfig, AppError, AppResult, AppState,
};

/// In-memory stand-in for the database lookups
#[derive(Default)]
pub struct FakeStore {
    pub items: Vec<InventoryItem>,
    pub users: Vec<User>,
    pub borrow_records: Mutex<Vec<BorrowRecord>>,
    pub reachable: bool,
}

#[async_trait]
impl DataStore for FakeStore {
    async fn find_item_by_code(&self, code: &str) -> AppResult<Option<InventoryItem>> {
        Ok(self.items.iter().find(|i| i.code == code).cloned())
    }

    async fn find_user_by_code(&self, code: &str) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.code == code).cloned())
    }

    async fn find_borrow_record_by_code(&self, code: &str) -> AppResult<Option<BorrowRecord>> {
        let records = self.borrow_records.lock().unwrap();
        Ok(records.iter().find(|r| r.code == code).cloned())
    }

    async fn create_borrow_record(
        &self,
        item_id: i32,
        user_id: i32,
        due_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut records = self.borrow_records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.item_id == item_id && r.returned_at.is_none())
        {
            return Err(AppError::BusinessRule("Item is already borrowed".to_string()));
        }

        let record = BorrowRecord {
            id: records.len() as i32 + 1,
            code: format!("B{}", records.len() + 1),
            item_id,
            user_id,
            borrowed_at: Utc::now(),
            due_at: Some(due_at),
            returned_at: None,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn return_borrow_record(&self, code: &str) -> AppResult<BorrowRecord> {
        let mut records = self.borrow_records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| AppError::NotFound(format!("Borrow record {} not found", code)))?;
        if record.returned_at.is_some() {
            return Err(AppError::Conflict(format!("Borrow record {} already returned", code)));
        }
        record.returned_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn health_check(&self) -> StoreHealth {
        StoreHealth {
            reachable: self.reachable,
            detail: (!self.reachable).then(|| "connection refused".to_string()),
        }
    }
}

pub fn item(code: &str, name: &str) -> InventoryItem {
    InventoryItem {
        id: 1,
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        location: Some("Shelf A".to_string()),
        quantity: 3,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn user(code: &str) -> User {
    User {
        id: 7,
        code: code.to_string(),
        firstname: Some("Ada".to_string()),
        lastname: Some("Lovelace".to_string()),
        email: None,
        created_at: Utc::now(),
    }
}

/// Application state over a fake store. The Postgres pool is lazy and never
/// used by the routes under test.
pub fn state_with(store: FakeStore) -> AppState {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let notifications = NotificationBus::new(config.notifications.dwell());
    let services = Services::new(
        Repository::new(pool),
        Arc::new(store),
        BarcodeClassifier::default(),
        notifications.clone(),
        &config,
    );

    AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        notifications,
    }
}

pub fn router(state: &AppState) -> Router {
    api::router(state.clone())
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router never fails")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status);
}
