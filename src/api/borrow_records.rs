//! Borrow record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrow_record::{BorrowRecord, BorrowRecordQuery, CreateBorrowRecord},
    repository::Pagination,
};

use super::PaginatedResponse;

/// List borrow records, most recent first
#[utoipa::path(
    get,
    path = "/borrow-records",
    tag = "borrow-records",
    params(BorrowRecordQuery),
    responses(
        (status = 200, description = "List of borrow records", body = PaginatedResponse<BorrowRecord>)
    )
)]
pub async fn list_borrow_records(
    State(state): State<crate::AppState>,
    Query(query): Query<BorrowRecordQuery>,
) -> AppResult<Json<PaginatedResponse<BorrowRecord>>> {
    let page = Pagination::new(query.page, query.per_page);
    let (items, total) = state.services.repository.borrow_records.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// Lend an item to a user
#[utoipa::path(
    post,
    path = "/borrow-records",
    tag = "borrow-records",
    request_body = CreateBorrowRecord,
    responses(
        (status = 201, description = "Borrow record created", body = BorrowRecord),
        (status = 404, description = "Item or user not found"),
        (status = 422, description = "Item is already borrowed")
    )
)]
pub async fn create_borrow_record(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBorrowRecord>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let record = state.services.borrows.borrow(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed item
#[utoipa::path(
    post,
    path = "/borrow-records/{code}/return",
    tag = "borrow-records",
    params(("code" = String, Path, description = "Borrow record code, prefix allowed")),
    responses(
        (status = 200, description = "Borrow record closed", body = BorrowRecord),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow_record(
    State(state): State<crate::AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.borrows.return_record(&code).await?;
    Ok(Json(record))
}
