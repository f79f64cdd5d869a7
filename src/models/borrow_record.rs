//! Borrow record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Borrow record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    /// Code printed on the borrow slip
    pub code: String,
    pub item_id: i32,
    pub user_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// Borrow record query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BorrowRecordQuery {
    pub item_id: Option<i32>,
    pub user_id: Option<i32>,
    /// Only records not yet returned
    pub open: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create borrow record request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrowRecord {
    /// Item code (as scanned, prefix allowed)
    #[validate(length(min = 1, message = "Item code is required"))]
    pub item_code: String,
    /// User code (as scanned, prefix allowed)
    #[validate(length(min = 1, message = "User code is required"))]
    pub user_code: String,
    /// Loan duration in days
    #[validate(range(min = 1, max = 365, message = "Duration must be between 1 and 365 days"))]
    pub duration_days: Option<i64>,
}
