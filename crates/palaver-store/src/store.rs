//! The store aggregate and its batched mutation handle.
//!
//! [`Store`] owns every entity record map.  Reads go straight through its
//! methods; all writes go through a [`StoreTx`] obtained from
//! [`Store::tx`].  A `StoreTx` is one batch: writes apply in call order
//! and exactly one [`StoreNotification`] is broadcast when the handle is
//! dropped, so observers never see a partial cross-store state.

use std::ops::Deref;

use indexmap::IndexMap;
use tokio_stream::Stream;

use palaver_shared::{ChannelId, ServerId, UserId};

use crate::models::{Account, Channel, Friend, Mention, Message, Server, ServerMember, User};
use crate::notify::{ChangeSet, EntityKey, NotificationSender, StoreNotification};
use crate::records::Records;

/// Navigation collaborator, passed explicitly into deletion so the store
/// never reaches into ambient routing state.
pub trait Navigator {
    /// The channel the UI is currently focused on, if any.
    fn focused_channel(&self) -> Option<ChannelId>;

    /// Replace the current location with a server channel.
    fn replace_to_channel(&mut self, server_id: &ServerId, channel_id: &ChannelId);
}

/// Central client state: one keyed record map per entity type, the
/// message cache, the voice-session pointer, and the account.
#[derive(Debug, Default)]
pub struct Store {
    pub(crate) channels: Records<ChannelId, Channel>,
    pub(crate) servers: Records<ServerId, Server>,
    pub(crate) members: Records<(ServerId, UserId), ServerMember>,
    pub(crate) users: Records<UserId, User>,
    pub(crate) friends: Records<UserId, Friend>,
    pub(crate) mentions: Records<ChannelId, Mention>,
    pub(crate) messages: IndexMap<ChannelId, Vec<Message>>,
    pub(crate) voice_channel: Option<ChannelId>,
    pub(crate) account: Account,
    notifier: NotificationSender,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a batch.  All writes on the returned handle are observed as
    /// a single notification when it drops.
    pub fn tx(&mut self) -> StoreTx<'_> {
        StoreTx {
            store: self,
            changes: ChangeSet::default(),
        }
    }

    /// Subscribe to batch notifications.
    pub fn subscribe(&self) -> impl Stream<Item = std::sync::Arc<StoreNotification>> {
        self.notifier.subscribe()
    }
}

/// One batch of store writes; notifies on drop.
pub struct StoreTx<'a> {
    pub(crate) store: &'a mut Store,
    pub(crate) changes: ChangeSet,
}

impl Deref for StoreTx<'_> {
    type Target = Store;

    fn deref(&self) -> &Store {
        self.store
    }
}

impl Drop for StoreTx<'_> {
    fn drop(&mut self) {
        let changes = std::mem::take(&mut self.changes);
        if !changes.is_empty() {
            self.store.notifier.notify(changes.build());
        }
    }
}

impl StoreTx<'_> {
    /// Clear every sub-store in one batch (session teardown).
    pub fn reset_all(&mut self) {
        let channel_keys: Vec<ChannelId> = self.store.channels.keys().cloned().collect();
        for id in channel_keys {
            self.changes.removed(EntityKey::Channel(id));
        }
        let server_keys: Vec<ServerId> = self.store.servers.keys().cloned().collect();
        for id in server_keys {
            self.changes.removed(EntityKey::Server(id));
        }
        let member_keys: Vec<(ServerId, UserId)> = self.store.members.keys().cloned().collect();
        for (server_id, user_id) in member_keys {
            self.changes.removed(EntityKey::ServerMember(server_id, user_id));
        }
        let user_keys: Vec<UserId> = self.store.users.keys().cloned().collect();
        for id in user_keys {
            self.changes.removed(EntityKey::User(id));
        }
        let friend_keys: Vec<UserId> = self.store.friends.keys().cloned().collect();
        for id in friend_keys {
            self.changes.removed(EntityKey::Friend(id));
        }
        let mention_keys: Vec<ChannelId> = self.store.mentions.keys().cloned().collect();
        for id in mention_keys {
            self.changes.removed(EntityKey::Mention(id));
        }
        let message_keys: Vec<ChannelId> = self.store.messages.keys().cloned().collect();
        for id in message_keys {
            self.changes.removed(EntityKey::MessageChannel(id));
        }

        self.store.channels.clear();
        self.store.servers.clear();
        self.store.members.clear();
        self.store.users.clear();
        self.store.friends.clear();
        self.store.mentions.clear();
        self.store.messages.clear();

        if self.store.voice_channel.take().is_some() {
            self.changes.updated(EntityKey::VoiceSession);
        }
        if self.store.account != Account::default() {
            self.store.account = Account::default();
            self.changes.updated(EntityKey::Account);
        }
    }
}
