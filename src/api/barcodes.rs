//! Barcode image endpoint

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    barcode::{render_svg, EntityKind, RenderOptions},
    error::{AppError, AppResult},
};

/// Barcode rendering options
#[derive(Debug, Deserialize, IntoParams)]
pub struct BarcodeQuery {
    /// Prefix the identifier with the canonical marker for this kind
    pub kind: Option<EntityKind>,
    /// Print the code under the bars (default: true)
    pub caption: Option<bool>,
    /// Bar height in pixels
    pub height: Option<u32>,
}

/// Render an identifier as a Code 39 SVG image
#[utoipa::path(
    get,
    path = "/barcodes/{identifier}",
    tag = "scan",
    params(
        ("identifier" = String, Path, description = "Identifier to encode"),
        BarcodeQuery
    ),
    responses(
        (status = 200, description = "SVG image", content_type = "image/svg+xml", body = String),
        (status = 400, description = "Identifier cannot be encoded")
    )
)]
pub async fn render_barcode(
    State(state): State<crate::AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<BarcodeQuery>,
) -> AppResult<impl IntoResponse> {
    let text = match query.kind {
        Some(kind) => state
            .services
            .scan
            .classifier()
            .encode(&identifier, kind)
            .ok_or_else(|| {
                AppError::BadRequest(format!("'{}' cannot be encoded as a {} code", identifier, kind))
            })?,
        None => identifier,
    };

    let defaults = RenderOptions::default();
    let options = RenderOptions {
        caption: query.caption.unwrap_or(defaults.caption),
        height: query.height.unwrap_or(defaults.height).clamp(10, 1000),
        ..defaults
    };

    let svg = render_svg(&text, &options)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
