//! Barcode scan endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, services::scan::ScanResult};

/// Classify a scanned code and fetch the record it identifies
#[utoipa::path(
    get,
    path = "/scan/{token}",
    tag = "scan",
    params(("token" = String, Path, description = "Scanned or typed barcode")),
    responses(
        (status = 200, description = "Classification and matching record", body = ScanResult),
        (status = 400, description = "Empty barcode")
    )
)]
pub async fn scan(
    State(state): State<crate::AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<ScanResult>> {
    let result = state.services.scan.lookup(&token).await?;
    Ok(Json(result))
}
