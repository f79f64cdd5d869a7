//! Inventory items repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::item::{InventoryItem, ItemQuery},
};

use super::Pagination;

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by barcode code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// Search items with pagination
    pub async fn search(&self, query: &ItemQuery) -> AppResult<(Vec<InventoryItem>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref name) = query.name {
            params.push(format!("%{}%", name.to_lowercase()));
            conditions.push(format!("LOWER(name) LIKE ${}", params.len()));
        }

        if let Some(ref location) = query.location {
            params.push(location.clone());
            conditions.push(format!("location = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM inventory_items {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM inventory_items {} ORDER BY name, id LIMIT {} OFFSET {}",
            where_clause, page.per_page, page.offset
        );
        let mut select_builder = sqlx::query_as::<_, InventoryItem>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let items = select_builder.fetch_all(&self.pool).await?;

        Ok((items, total))
    }
}
