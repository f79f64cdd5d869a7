//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{barcodes, borrow_records, health, items, notifications, scan, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "0.1.0",
        description = "Inventory tracking REST API with barcode lookup",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Scanning
        scan::scan,
        barcodes::render_barcode,
        // Collections
        items::list_items,
        users::list_users,
        borrow_records::list_borrow_records,
        borrow_records::create_borrow_record,
        borrow_records::return_borrow_record,
        // Notifications
        notifications::list_notifications,
        notifications::publish_notification,
        notifications::dismiss_notification,
        notifications::stream_notifications,
    ),
    components(
        schemas(
            // Scanning
            crate::services::scan::ScanResult,
            crate::barcode::ClassifiedReference,
            crate::barcode::EntityKind,
            crate::repository::Collection,
            // Collections
            crate::models::item::InventoryItem,
            crate::models::item::ItemQuery,
            crate::models::user::User,
            crate::models::user::UserQuery,
            crate::models::borrow_record::BorrowRecord,
            crate::models::borrow_record::BorrowRecordQuery,
            crate::models::borrow_record::CreateBorrowRecord,
            // Notifications
            crate::notifications::Notification,
            crate::notifications::NotificationId,
            crate::notifications::NotificationVariant,
            notifications::PublishNotificationRequest,
            notifications::PublishNotificationResponse,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            crate::models::ConnectionStatus,
            crate::models::ConnectionState,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scan", description = "Barcode classification, lookup and rendering"),
        (name = "items", description = "Inventory items"),
        (name = "users", description = "Borrowers"),
        (name = "borrow-records", description = "Borrowing and returns"),
        (name = "notifications", description = "Transient notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
