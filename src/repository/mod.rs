//! Repository layer for database operations

pub mod borrow_records;
pub mod items;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use utoipa::ToSchema;

use crate::{
    barcode::EntityKind,
    error::AppResult,
    models::{BorrowRecord, InventoryItem, User},
};

/// Named collections held by the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    InventoryItems,
    BorrowRecords,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::InventoryItems => "inventory_items",
            Collection::BorrowRecords => "borrow_records",
        }
    }

    /// Collection holding the entities of a barcode kind
    pub fn for_kind(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Item => Some(Collection::InventoryItems),
            EntityKind::Borrowing => Some(Collection::BorrowRecords),
            EntityKind::User => Some(Collection::Users),
            EntityKind::Unknown => None,
        }
    }
}

/// Outcome of a data store reachability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHealth {
    pub reachable: bool,
    pub detail: Option<String>,
}

/// Data store operations used by the services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_item_by_code(&self, code: &str) -> AppResult<Option<InventoryItem>>;

    async fn find_user_by_code(&self, code: &str) -> AppResult<Option<User>>;

    async fn find_borrow_record_by_code(&self, code: &str) -> AppResult<Option<BorrowRecord>>;

    /// Open a borrow record. Fails with `BusinessRule` if the item is out.
    async fn create_borrow_record(
        &self,
        item_id: i32,
        user_id: i32,
        due_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord>;

    /// Close a borrow record. `NotFound` if unknown, `Conflict` if already
    /// returned.
    async fn return_borrow_record(&self, code: &str) -> AppResult<BorrowRecord>;

    async fn health_check(&self) -> StoreHealth;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub users: users::UsersRepository,
    pub borrow_records: borrow_records::BorrowRecordsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            borrow_records: borrow_records::BorrowRecordsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl DataStore for Repository {
    async fn find_item_by_code(&self, code: &str) -> AppResult<Option<InventoryItem>> {
        self.items.get_by_code(code).await
    }

    async fn find_user_by_code(&self, code: &str) -> AppResult<Option<User>> {
        self.users.get_by_code(code).await
    }

    async fn find_borrow_record_by_code(&self, code: &str) -> AppResult<Option<BorrowRecord>> {
        self.borrow_records.get_by_code(code).await
    }

    async fn create_borrow_record(
        &self,
        item_id: i32,
        user_id: i32,
        due_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        self.borrow_records.create(item_id, user_id, due_at).await
    }

    async fn return_borrow_record(&self, code: &str) -> AppResult<BorrowRecord> {
        self.borrow_records.return_by_code(code).await
    }

    async fn health_check(&self) -> StoreHealth {
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => StoreHealth {
                reachable: true,
                detail: None,
            },
            Err(e) => StoreHealth {
                reachable: false,
                detail: Some(e.to_string()),
            },
        }
    }
}

/// Page window resolved from optional query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: i64,
    /// Rows per page, also the query LIMIT
    pub per_page: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: i64 = 20;
    pub const MAX_PER_PAGE: i64 = 200;

    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE);
        Self {
            page,
            per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }
}
