//! Transient user-facing notifications

pub mod bus;
pub mod model;

pub use bus::{NotificationBus, Observer, Subscription, Watcher, DEFAULT_DWELL};
pub use model::{NewNotification, Notification, NotificationId, NotificationVariant, Snapshot};
