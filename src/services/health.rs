//! Data store connection probe

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::{
    models::{ConnectionState, ConnectionStatus},
    notifications::{NewNotification, NotificationBus},
    repository::DataStore,
};

#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn DataStore>,
    notifications: NotificationBus,
    timeout: Duration,
    status: Arc<RwLock<ConnectionStatus>>,
}

impl HealthService {
    pub fn new(store: Arc<dyn DataStore>, notifications: NotificationBus, timeout: Duration) -> Self {
        Self {
            store,
            notifications,
            timeout,
            status: Arc::new(RwLock::new(ConnectionStatus::loading())),
        }
    }

    /// Last known connection status
    pub fn status(&self) -> ConnectionStatus {
        self.status
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Check data store reachability and record the outcome.
    ///
    /// Failures are reported through the status and a destructive
    /// notification, never as an error.
    pub async fn probe(&self) -> ConnectionStatus {
        let status = match tokio::time::timeout(self.timeout, self.store.health_check()).await {
            Ok(health) if health.reachable => ConnectionStatus::connected(),
            Ok(health) => ConnectionStatus::error(
                health.detail.unwrap_or_else(|| "unknown error".to_string()),
            ),
            Err(_) => ConnectionStatus::error(format!(
                "no answer within {} ms",
                self.timeout.as_millis()
            )),
        };

        match status.state {
            ConnectionState::Connected => tracing::info!("Data store connection verified"),
            _ => {
                tracing::warn!(detail = ?status.detail, "Data store unreachable");
                self.notifications.publish(NewNotification::destructive(
                    "Database unavailable",
                    "Lookups will fail until the data store is reachable",
                ));
            }
        }

        *self
            .status
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = status.clone();
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationVariant;
    use crate::repository::{MockDataStore, StoreHealth};

    fn service(store: MockDataStore, bus: &NotificationBus) -> HealthService {
        HealthService::new(Arc::new(store), bus.clone(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_status_starts_loading() {
        let bus = NotificationBus::default();
        let health = service(MockDataStore::new(), &bus);
        assert_eq!(health.status().state, ConnectionState::Loading);
    }

    #[tokio::test]
    async fn test_probe_connected() {
        let bus = NotificationBus::default();
        let mut store = MockDataStore::new();
        store.expect_health_check().times(1).returning(|| StoreHealth {
            reachable: true,
            detail: None,
        });

        let health = service(store, &bus);
        let status = health.probe().await;

        assert!(status.is_connected());
        assert!(status.checked_at.is_some());
        assert_eq!(health.status(), status);
        assert!(bus.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_probe_failure_notifies() {
        let bus = NotificationBus::default();
        let mut store = MockDataStore::new();
        store.expect_health_check().times(1).returning(|| StoreHealth {
            reachable: false,
            detail: Some("connection refused".to_string()),
        });

        let health = service(store, &bus);
        let status = health.probe().await;

        assert_eq!(status.state, ConnectionState::Error);
        assert_eq!(status.detail.as_deref(), Some("connection refused"));

        let snapshot = bus.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].variant, NotificationVariant::Destructive);
    }
}
