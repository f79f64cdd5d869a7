//! Notification types

use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity of a published notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NotificationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual style of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
    Success,
}

/// Notification content, before it is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: NotificationVariant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Success)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Destructive)
    }
}

/// A live notification held by the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub created_at: DateTime<Utc>,
}

impl From<NewNotification> for Notification {
    fn from(new: NewNotification) -> Self {
        Self {
            id: NotificationId::new(),
            title: new.title,
            description: new.description,
            variant: new.variant,
            created_at: Utc::now(),
        }
    }
}

/// Immutable view of the notification collection at one point in time.
///
/// Versions grow with every change, so two snapshots of the same bus can be
/// ordered.
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    notifications: Arc<[Notification]>,
}

impl Snapshot {
    pub(crate) fn new(version: u64, notifications: &[Notification]) -> Self {
        Self {
            version,
            notifications: Arc::from(notifications),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.notifications.iter().map(|n| n.id).collect()
    }
}

impl Deref for Snapshot {
    type Target = [Notification];

    fn deref(&self) -> &Self::Target {
        &self.notifications
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.notifications == other.notifications
    }
}

impl Eq for Snapshot {}
