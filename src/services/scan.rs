//! Barcode scan dispatch
//!
//! Classifies a scanned token and fetches the record it points to from the
//! collection matching its kind.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    barcode::{BarcodeClassifier, ClassifiedReference},
    error::{AppError, AppResult},
    models::{BorrowRecord, InventoryItem, User},
    repository::{Collection, DataStore},
};

/// Outcome of a scan lookup
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScanResult {
    /// Token as received, trimmed
    pub token: String,
    pub reference: ClassifiedReference,
    /// Collection that was queried, absent for unknown codes
    pub collection: Option<Collection>,
    /// Whether a matching record exists
    pub found: bool,
    pub item: Option<InventoryItem>,
    pub user: Option<User>,
    pub borrow_record: Option<BorrowRecord>,
}

impl ScanResult {
    fn new(token: &str, reference: ClassifiedReference) -> Self {
        Self {
            token: token.to_string(),
            collection: Collection::for_kind(reference.kind),
            reference,
            found: false,
            item: None,
            user: None,
            borrow_record: None,
        }
    }
}

#[derive(Clone)]
pub struct ScanService {
    classifier: Arc<BarcodeClassifier>,
    store: Arc<dyn DataStore>,
}

impl ScanService {
    pub fn new(classifier: Arc<BarcodeClassifier>, store: Arc<dyn DataStore>) -> Self {
        Self { classifier, store }
    }

    pub fn classifier(&self) -> &BarcodeClassifier {
        &self.classifier
    }

    /// Classify a raw token. Blank input is rejected here, before the
    /// classifier sees it.
    pub fn classify(&self, token: &str) -> AppResult<ClassifiedReference> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest("Barcode is empty".to_string()));
        }
        Ok(self.classifier.classify(token))
    }

    /// Classify a token and fetch the record it identifies.
    ///
    /// A code that matches no record is not an error: the result carries
    /// `found: false`.
    pub async fn lookup(&self, token: &str) -> AppResult<ScanResult> {
        let reference = self.classify(token)?;
        let mut result = ScanResult::new(token.trim(), reference);
        let code = result.reference.identifier.clone();

        match result.collection {
            Some(Collection::InventoryItems) => {
                result.item = self.store.find_item_by_code(&code).await?;
                result.found = result.item.is_some();
            }
            Some(Collection::Users) => {
                result.user = self.store.find_user_by_code(&code).await?;
                result.found = result.user.is_some();
            }
            Some(Collection::BorrowRecords) => {
                result.borrow_record = self.store.find_borrow_record_by_code(&code).await?;
                result.found = result.borrow_record.is_some();
            }
            None => {}
        }

        tracing::debug!(
            token = %result.token,
            kind = %result.reference.kind,
            found = result.found,
            "Barcode scanned"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::EntityKind;
    use crate::repository::MockDataStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn item() -> InventoryItem {
        InventoryItem {
            id: 1,
            code: "0042".to_string(),
            name: "Projector".to_string(),
            description: None,
            location: Some("Room B".to_string()),
            quantity: 1,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(store: MockDataStore) -> ScanService {
        ScanService::new(Arc::new(BarcodeClassifier::default()), Arc::new(store))
    }

    #[tokio::test]
    async fn test_item_scan_queries_items() {
        let mut store = MockDataStore::new();
        store
            .expect_find_item_by_code()
            .with(eq("0042"))
            .times(1)
            .returning(|_| Ok(Some(item())));

        let result = service(store).lookup("  ITEM-0042 ").await.unwrap();
        assert_eq!(result.token, "ITEM-0042");
        assert_eq!(result.reference, ClassifiedReference::new("0042", EntityKind::Item));
        assert_eq!(result.collection, Some(Collection::InventoryItems));
        assert!(result.found);
        assert_eq!(result.item.map(|i| i.name), Some("Projector".to_string()));
    }

    #[tokio::test]
    async fn test_missing_record_is_not_an_error() {
        let mut store = MockDataStore::new();
        store
            .expect_find_borrow_record_by_code()
            .with(eq("77"))
            .times(1)
            .returning(|_| Ok(None));

        let result = service(store).lookup("BORROW-77").await.unwrap();
        assert_eq!(result.collection, Some(Collection::BorrowRecords));
        assert!(!result.found);
        assert!(result.borrow_record.is_none());
    }

    #[tokio::test]
    async fn test_unknown_scan_skips_the_store() {
        // no expectations: any store call would panic
        let result = service(MockDataStore::new()).lookup("XYZ").await.unwrap();
        assert_eq!(result.reference, ClassifiedReference::unknown("XYZ"));
        assert_eq!(result.collection, None);
        assert!(!result.found);
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected() {
        let error = service(MockDataStore::new()).lookup("   ").await.unwrap_err();
        assert!(matches!(error, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockDataStore::new();
        store
            .expect_find_user_by_code()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let error = service(store).lookup("USER-5").await.unwrap_err();
        assert!(matches!(error, AppError::Database(_)));
    }
}
