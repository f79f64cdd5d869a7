//! Borrow and return service

use std::sync::Arc;

use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    barcode::{BarcodeClassifier, EntityKind},
    error::{AppError, AppResult},
    models::{BorrowRecord, CreateBorrowRecord},
    notifications::{NewNotification, NotificationBus},
    repository::DataStore,
};

#[derive(Clone)]
pub struct BorrowService {
    store: Arc<dyn DataStore>,
    classifier: Arc<BarcodeClassifier>,
    notifications: NotificationBus,
    default_loan_days: i64,
}

impl BorrowService {
    pub fn new(
        store: Arc<dyn DataStore>,
        classifier: Arc<BarcodeClassifier>,
        notifications: NotificationBus,
        default_loan_days: i64,
    ) -> Self {
        Self {
            store,
            classifier,
            notifications,
            default_loan_days,
        }
    }

    /// Lend an item to a user. Both codes may be given as scanned.
    pub async fn borrow(&self, request: CreateBorrowRecord) -> AppResult<BorrowRecord> {
        request.validate()?;

        let item_code = resolve_code(&self.classifier, &request.item_code, EntityKind::Item)?;
        let user_code = resolve_code(&self.classifier, &request.user_code, EntityKind::User)?;

        let item = self
            .store
            .find_item_by_code(&item_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_code)))?;
        let user = self
            .store
            .find_user_by_code(&user_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_code)))?;

        let days = request.duration_days.unwrap_or(self.default_loan_days);
        let due_at = Utc::now() + Duration::days(days);
        let record = self.store.create_borrow_record(item.id, user.id, due_at).await?;

        tracing::info!(record = %record.code, item = %item.code, user = %user.code, "Item borrowed");
        self.notifications.publish(NewNotification::success(
            "Item borrowed",
            format!(
                "{} lent to {}",
                item.name,
                display_name(user.firstname.as_deref(), user.lastname.as_deref(), &user.code)
            ),
        ));

        Ok(record)
    }

    /// Close a borrow record. The code may be given as scanned.
    pub async fn return_record(&self, code: &str) -> AppResult<BorrowRecord> {
        let code = resolve_code(&self.classifier, code, EntityKind::Borrowing)?;
        let record = self.store.return_borrow_record(&code).await?;

        tracing::info!(record = %record.code, "Item returned");
        self.notifications.publish(NewNotification::success(
            "Item returned",
            format!("Borrow record {} closed", record.code),
        ));

        Ok(record)
    }
}

/// Identifier to look up for a code that should be of `expected` kind.
///
/// Prefixed codes are stripped; bare codes are taken as they are. A code
/// classified as another kind is refused.
pub fn resolve_code(
    classifier: &BarcodeClassifier,
    raw: &str,
    expected: EntityKind,
) -> AppResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest(format!("Missing {} code", expected)));
    }

    let reference = classifier.classify(raw);
    match reference.kind {
        kind if kind == expected => Ok(reference.identifier),
        EntityKind::Unknown => Ok(reference.identifier),
        other => Err(AppError::BadRequest(format!(
            "Expected a {} code, got a {} code",
            expected, other
        ))),
    }
}

fn display_name(firstname: Option<&str>, lastname: Option<&str>, code: &str) -> String {
    let name = [firstname, lastname]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        code.to_string()
    } else {
        name
    }
}
