//! Business logic services

pub mod borrows;
pub mod health;
pub mod scan;

use std::sync::Arc;

use crate::{
    barcode::BarcodeClassifier,
    config::AppConfig,
    notifications::NotificationBus,
    repository::{DataStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub scan: scan::ScanService,
    pub borrows: borrows::BorrowService,
    pub health: health::HealthService,
}

impl Services {
    /// Create all services. `store` backs scans, borrows and health checks
    /// and is normally the repository itself; `repository` serves listings.
    pub fn new(
        repository: Repository,
        store: Arc<dyn DataStore>,
        classifier: BarcodeClassifier,
        notifications: NotificationBus,
        config: &AppConfig,
    ) -> Self {
        let classifier = Arc::new(classifier);
        Self {
            scan: scan::ScanService::new(classifier.clone(), store.clone()),
            borrows: borrows::BorrowService::new(
                store.clone(),
                classifier,
                notifications.clone(),
                config.scanner.default_loan_days,
            ),
            health: health::HealthService::new(
                store,
                notifications,
                config.database.connect_timeout(),
            ),
            repository,
        }
    }
}
