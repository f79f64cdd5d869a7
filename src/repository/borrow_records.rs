//! Borrow records repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::borrow_record::{BorrowRecord, BorrowRecordQuery},
};

use super::Pagination;

/// Length of generated borrow slip codes
const CODE_LEN: usize = 10;

/// Partial unique index allowing one open record per item
const OPEN_RECORD_INDEX: &str = "idx_borrow_records_open";

#[derive(Clone)]
pub struct BorrowRecordsRepository {
    pool: Pool<Postgres>,
}

impl BorrowRecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by slip code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Search borrow records with pagination, most recent first
    pub async fn search(&self, query: &BorrowRecordQuery) -> AppResult<(Vec<BorrowRecord>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut params: Vec<i32> = Vec::new();

        if let Some(item_id) = query.item_id {
            params.push(item_id);
            conditions.push(format!("item_id = ${}", params.len()));
        }

        if let Some(user_id) = query.user_id {
            params.push(user_id);
            conditions.push(format!("user_id = ${}", params.len()));
        }

        match query.open {
            Some(true) => conditions.push("returned_at IS NULL".to_string()),
            Some(false) => conditions.push("returned_at IS NOT NULL".to_string()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM borrow_records {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM borrow_records {} ORDER BY borrowed_at DESC, id DESC LIMIT {} OFFSET {}",
            where_clause, page.per_page, page.offset
        );
        let mut select_builder = sqlx::query_as::<_, BorrowRecord>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let records = select_builder.fetch_all(&self.pool).await?;

        Ok((records, total))
    }

    /// Create a borrow record for an item that is not currently out
    pub async fn create(
        &self,
        item_id: i32,
        user_id: i32,
        due_at: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let already_borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE item_id = $1 AND returned_at IS NULL)",
        )
        .bind(item_id)
        .fetch_one(&self.pool)
        .await?;

        if already_borrowed {
            return Err(AppError::BusinessRule("Item is already borrowed".to_string()));
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (code, item_id, user_id, borrowed_at, due_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_code())
        .bind(item_id)
        .bind(user_id)
        .bind(Utc::now())
        .bind(due_at)
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(record)
    }

    /// Mark a borrow record as returned
    pub async fn return_by_code(&self, code: &str) -> AppResult<BorrowRecord> {
        let returned = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records SET returned_at = $2
            WHERE code = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match returned {
            Some(record) => Ok(record),
            None => match self.get_by_code(code).await? {
                Some(_) => Err(AppError::Conflict(format!(
                    "Borrow record {} already returned",
                    code
                ))),
                None => Err(AppError::NotFound(format!("Borrow record {} not found", code))),
            },
        }
    }
}

/// A concurrent borrow of the same item loses on the open-record index
fn insert_error(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.constraint() == Some(OPEN_RECORD_INDEX) =>
        {
            AppError::BusinessRule("Item is already borrowed".to_string())
        }
        _ => AppError::Database(error),
    }
}

/// Random slip code, restricted to characters a Code 39 label can carry
fn new_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(CODE_LEN)
        .collect()
}
