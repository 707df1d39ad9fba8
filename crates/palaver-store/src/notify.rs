//! Change notification for store observers.
//!
//! Every [`StoreTx`](crate::StoreTx) batch collects the keys it touched
//! into a [`ChangeSet`]; when the batch ends, one [`StoreNotification`]
//! is broadcast to all subscribers.  Subscribers that lag behind the
//! channel capacity receive an empty notification and should re-read the
//! store.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use palaver_shared::{ChannelId, ServerId, UserId};

use crate::records::Applied;

const NOTIFICATION_CHANNEL_SIZE: usize = 1024;

/// Identifies one record across all sub-stores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Channel(ChannelId),
    Server(ServerId),
    ServerMember(ServerId, UserId),
    User(UserId),
    Friend(UserId),
    Mention(ChannelId),
    /// The cached message list of one channel.
    MessageChannel(ChannelId),
    /// The global current-voice-session pointer.
    VoiceSession,
    /// The logged-in account record.
    Account,
}

/// One batch worth of changes, sorted and deduplicated per bucket.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StoreNotification {
    pub added: Vec<EntityKey>,
    pub updated: Vec<EntityKey>,
    pub removed: Vec<EntityKey>,
}

impl StoreNotification {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn contains_added(&self, key: &EntityKey) -> bool {
        self.added.binary_search(key).is_ok()
    }

    pub fn contains_updated(&self, key: &EntityKey) -> bool {
        self.updated.binary_search(key).is_ok()
    }

    pub fn contains_removed(&self, key: &EntityKey) -> bool {
        self.removed.binary_search(key).is_ok()
    }
}

/// Accumulates changed keys during one batch.
#[derive(Debug, Default)]
pub struct ChangeSet {
    added: Vec<EntityKey>,
    updated: Vec<EntityKey>,
    removed: Vec<EntityKey>,
}

impl ChangeSet {
    pub fn added(&mut self, key: EntityKey) {
        self.added.push(key);
    }

    pub fn updated(&mut self, key: EntityKey) {
        self.updated.push(key);
    }

    pub fn removed(&mut self, key: EntityKey) {
        self.removed.push(key);
    }

    /// Record a [`Records::set`](crate::Records::set) outcome.
    pub fn apply(&mut self, key: EntityKey, applied: Applied) {
        match applied {
            Applied::Added => self.added(key),
            Applied::Updated => self.updated(key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn build(mut self) -> StoreNotification {
        self.added.sort_unstable();
        self.added.dedup();
        self.updated.sort_unstable();
        self.updated.dedup();
        self.removed.sort_unstable();
        self.removed.dedup();
        StoreNotification {
            added: self.added,
            updated: self.updated,
            removed: self.removed,
        }
    }
}

/// Broadcasts one [`StoreNotification`] per finished batch.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: broadcast::Sender<Arc<StoreNotification>>,
}

impl NotificationSender {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        Self { tx }
    }

    pub fn notify(&self, notification: impl Into<Arc<StoreNotification>>) {
        // No receivers is fine; nobody is observing.
        let _ = self.tx.send(notification.into());
    }

    pub fn subscribe(&self) -> impl Stream<Item = Arc<StoreNotification>> {
        BroadcastStream::new(self.tx.subscribe()).map(|res| match res {
            Ok(notification) => notification,
            Err(BroadcastStreamRecvError::Lagged(n)) => {
                warn!(missed = n, "store notification subscriber lagged");
                Arc::new(StoreNotification::default())
            }
        })
    }
}

impl Default for NotificationSender {
    fn default() -> Self {
        Self::new()
    }
}
