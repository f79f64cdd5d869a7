//! Borrower model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// User (borrower) record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    /// Code carried by the user's card
    pub code: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Case-insensitive match on first or last name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
