//! In-memory notification bus
//!
//! Producers publish transient notifications; any number of observers
//! receive the whole collection after every change. Each notification is
//! removed automatically once its dwell time has elapsed, or earlier when it
//! is dismissed.

use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

use super::model::{NewNotification, Notification, NotificationId, Snapshot};

/// Default time a notification stays visible
pub const DEFAULT_DWELL: Duration = Duration::from_millis(3000);

/// Callback invoked with every new snapshot
pub type Observer = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Opaque token returned by [`NotificationBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

struct ObserverEntry {
    subscription: Subscription,
    callback: Observer,
    /// One past the highest snapshot version delivered, zero before the first
    last_seen: AtomicU64,
}

impl ObserverEntry {
    fn deliver(&self, snapshot: &Snapshot) {
        // a slower broadcast must not overwrite a newer one
        let mark = snapshot.version() + 1;
        if self.last_seen.fetch_max(mark, Ordering::SeqCst) >= mark {
            return;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.callback)(snapshot)));
        if result.is_err() {
            tracing::error!(
                subscription = self.subscription.0,
                version = snapshot.version(),
                "Notification observer panicked, skipping it for this broadcast"
            );
        }
    }
}

#[derive(Default)]
struct BusState {
    notifications: Vec<Notification>,
    version: u64,
    timers: HashMap<NotificationId, AbortHandle>,
    observers: BTreeMap<Subscription, Arc<ObserverEntry>>,
    next_subscription: u64,
}

impl BusState {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.version, &self.notifications)
    }

    /// Record a change and collect what must be broadcast
    fn changed(&mut self) -> (Snapshot, Vec<Arc<ObserverEntry>>) {
        self.version += 1;
        (self.snapshot(), self.observers.values().cloned().collect())
    }

    fn remove(&mut self, id: NotificationId) -> bool {
        match self.notifications.iter().position(|n| n.id == id) {
            Some(index) => {
                self.notifications.remove(index);
                true
            }
            None => false,
        }
    }
}

struct Inner {
    dwell: Duration,
    state: Mutex<BusState>,
}

/// Shared handle to a notification bus. Clones refer to the same bus.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("NotificationBus")
            .field("dwell", &self.inner.dwell)
            .field("notifications", &state.notifications.len())
            .field("observers", &state.observers.len())
            .field("version", &state.version)
            .finish()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_DWELL)
    }
}

impl NotificationBus {
    pub fn new(dwell: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                dwell,
                state: Mutex::new(BusState::default()),
            }),
        }
    }

    pub fn dwell(&self) -> Duration {
        self.inner.dwell
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a notification and broadcast the new collection.
    ///
    /// The notification is removed after the dwell time. Scheduling needs a
    /// Tokio runtime; without one the notification stays until dismissed.
    pub fn publish(&self, new: impl Into<NewNotification>) -> NotificationId {
        let notification = Notification::from(new.into());
        let id = notification.id;

        let (snapshot, observers) = {
            let mut state = self.state();
            state.notifications.push(notification);
            if let Some(timer) = self.schedule_expiry(id) {
                state.timers.insert(id, timer);
            }
            state.changed()
        };

        tracing::debug!(notification = %id, live = snapshot.len(), "Notification published");
        broadcast(&snapshot, &observers);
        id
    }

    fn schedule_expiry(&self, id: NotificationId) -> Option<AbortHandle> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    notification = %id,
                    "No async runtime available, notification will not expire"
                );
                return None;
            }
        };

        let bus: Weak<Inner> = Arc::downgrade(&self.inner);
        let dwell = self.inner.dwell;
        let task = handle.spawn(async move {
            tokio::time::sleep(dwell).await;
            if let Some(inner) = bus.upgrade() {
                NotificationBus { inner }.expire(id);
            }
        });
        Some(task.abort_handle())
    }

    fn expire(&self, id: NotificationId) {
        let changed = {
            let mut state = self.state();
            state.timers.remove(&id);
            state.remove(id).then(|| state.changed())
        };

        if let Some((snapshot, observers)) = changed {
            tracing::debug!(notification = %id, live = snapshot.len(), "Notification expired");
            broadcast(&snapshot, &observers);
        }
    }

    /// Remove a notification before its dwell time elapses.
    ///
    /// Returns `false` if it was already gone. The pending expiry is
    /// cancelled; an expiry that fires anyway finds nothing to remove.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let changed = {
            let mut state = self.state();
            if let Some(timer) = state.timers.remove(&id) {
                timer.abort();
            }
            state.remove(id).then(|| state.changed())
        };

        match changed {
            Some((snapshot, observers)) => {
                tracing::debug!(notification = %id, live = snapshot.len(), "Notification dismissed");
                broadcast(&snapshot, &observers);
                true
            }
            None => false,
        }
    }

    /// Register an observer. It receives the current collection right away
    /// and every later change.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let (entry, snapshot) = {
            let mut state = self.state();
            state.next_subscription += 1;
            let subscription = Subscription(state.next_subscription);
            let entry = Arc::new(ObserverEntry {
                subscription,
                callback: Arc::new(observer),
                last_seen: AtomicU64::new(0),
            });
            state.observers.insert(subscription, entry.clone());
            (entry, state.snapshot())
        };

        tracing::debug!(subscription = entry.subscription.0, "Notification observer registered");
        entry.deliver(&snapshot);
        entry.subscription
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let removed = self.state().observers.remove(&subscription).is_some();
        if removed {
            tracing::debug!(subscription = subscription.0, "Notification observer removed");
        }
        removed
    }

    /// Current collection
    pub fn snapshot(&self) -> Snapshot {
        self.state().snapshot()
    }

    pub fn observer_count(&self) -> usize {
        self.state().observers.len()
    }

    /// Subscribe through a channel. Dropping the returned watcher
    /// unsubscribes.
    pub fn watch(&self) -> Watcher {
        let (sender, receiver) = watch::channel(self.snapshot());
        let subscription = self.subscribe(move |snapshot| {
            sender.send_replace(snapshot.clone());
        });
        Watcher {
            receiver,
            guard: SubscriptionGuard {
                bus: self.clone(),
                subscription,
            },
        }
    }
}

fn broadcast(snapshot: &Snapshot, observers: &[Arc<ObserverEntry>]) {
    for observer in observers {
        observer.deliver(snapshot);
    }
}

struct SubscriptionGuard {
    bus: NotificationBus,
    subscription: Subscription,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

/// Channel-backed subscription
pub struct Watcher {
    receiver: watch::Receiver<Snapshot>,
    guard: SubscriptionGuard,
}

impl Watcher {
    pub fn subscription(&self) -> Subscription {
        self.guard.subscription
    }

    /// Latest snapshot seen by this watcher
    pub fn current(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Stream of snapshots, starting with the current one. The subscription
    /// lives as long as the stream.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot> + Send + 'static {
        let guard = self.guard;
        WatchStream::new(self.receiver).map(move |snapshot| {
            let _alive = &guard;
            snapshot
        })
    }
}
