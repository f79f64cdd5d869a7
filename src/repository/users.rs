//! Users repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::user::{User, UserQuery},
};

use super::Pagination;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by card code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Search users with pagination
    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut params: Vec<String> = Vec::new();
        let where_clause = match query.name {
            Some(ref name) => {
                params.push(format!("%{}%", name.to_lowercase()));
                "WHERE (LOWER(firstname) LIKE $1 OR LOWER(lastname) LIKE $1)"
            }
            None => "",
        };

        let count_query = format!("SELECT COUNT(*) FROM users {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM users {} ORDER BY lastname, firstname, id LIMIT {} OFFSET {}",
            where_clause, page.per_page, page.offset
        );
        let mut select_builder = sqlx::query_as::<_, User>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let users = select_builder.fetch_all(&self.pool).await?;

        Ok((users, total))
    }
}
