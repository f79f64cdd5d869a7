//! Notification endpoints

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    notifications::{NewNotification, Notification, NotificationId, NotificationVariant},
};

/// Publish notification request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PublishNotificationRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: String,
    #[serde(default)]
    pub variant: NotificationVariant,
}

#[derive(Serialize, ToSchema)]
pub struct PublishNotificationResponse {
    pub id: NotificationId,
}

/// Current notifications, in display order
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Live notifications", body = Vec<Notification>)
    )
)]
pub async fn list_notifications(State(state): State<crate::AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.snapshot().to_vec())
}

/// Publish a notification
#[utoipa::path(
    post,
    path = "/notifications",
    tag = "notifications",
    request_body = PublishNotificationRequest,
    responses(
        (status = 201, description = "Notification published", body = PublishNotificationResponse),
        (status = 400, description = "Invalid notification")
    )
)]
pub async fn publish_notification(
    State(state): State<crate::AppState>,
    Json(request): Json<PublishNotificationRequest>,
) -> AppResult<(StatusCode, Json<PublishNotificationResponse>)> {
    request.validate()?;

    let id = state.notifications.publish(NewNotification::new(
        request.title,
        request.description,
        request.variant,
    ));
    Ok((StatusCode::CREATED, Json(PublishNotificationResponse { id })))
}

/// Dismiss a notification before it expires
#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification dismissed"),
        (status = 404, description = "Notification not found or already expired")
    )
)]
pub async fn dismiss_notification(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.notifications.dismiss(NotificationId::from(id)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Notification {} not found", id)))
    }
}

/// Server-sent events: one `notifications` event per change, carrying the
/// full collection
#[utoipa::path(
    get,
    path = "/notifications/stream",
    tag = "notifications",
    responses(
        (status = 200, description = "Event stream of notification snapshots", content_type = "text/event-stream", body = String)
    )
)]
pub async fn stream_notifications(
    State(state): State<crate::AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.notifications.watch().into_stream().map(|snapshot| {
        let event = Event::default()
            .event("notifications")
            .id(snapshot.version().to_string())
            .json_data(&*snapshot)
            .unwrap_or_else(|e| {
                tracing::error!("Failed to encode notification snapshot: {}", e);
                Event::default().comment("encoding error")
            });
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
