//! API handlers for Stockroom REST endpoints

pub mod barcodes;
pub mod borrow_records;
pub mod health;
pub mod items;
pub mod notifications;
pub mod openapi;
pub mod scan;
pub mod users;

use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub items: Vec<T>,
    /// Total number of matching records
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub per_page: i64,
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Scanning
        .route("/scan/:token", get(scan::scan))
        .route("/barcodes/:identifier", get(barcodes::render_barcode))
        // Collections
        .route("/items", get(items::list_items))
        .route("/users", get(users::list_users))
        .route("/borrow-records", get(borrow_records::list_borrow_records))
        .route("/borrow-records", post(borrow_records::create_borrow_record))
        .route("/borrow-records/:code/return", post(borrow_records::return_borrow_record))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications", post(notifications::publish_notification))
        .route("/notifications/stream", get(notifications::stream_notifications))
        .route("/notifications/:id", delete(notifications::dismiss_notification))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
