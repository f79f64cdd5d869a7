//! Inventory item endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::item::{InventoryItem, ItemQuery},
    repository::Pagination,
};

use super::PaginatedResponse;

/// List inventory items with search and pagination
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(ItemQuery),
    responses(
        (status = 200, description = "List of items", body = PaginatedResponse<InventoryItem>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<PaginatedResponse<InventoryItem>>> {
    let page = Pagination::new(query.page, query.per_page);
    let (items, total) = state.services.repository.items.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}
