//! Inventory item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Inventory item record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryItem {
    pub id: i32,
    /// Code carried by the item's barcode
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Shelf or room where the item is stored
    pub location: Option<String>,
    /// Units on hand
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Item query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Case-insensitive match on name
    pub name: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
