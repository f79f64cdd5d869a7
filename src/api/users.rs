//! User endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::user::{User, UserQuery},
    repository::Pagination,
};

use super::PaginatedResponse;

/// List users with search and pagination
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = PaginatedResponse<User>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<PaginatedResponse<User>>> {
    let page = Pagination::new(query.page, query.per_page);
    let (items, total) = state.services.repository.users.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}
