//! Per-channel message cache.

use palaver_shared::raw::RawMessage;
use palaver_shared::ChannelId;

use crate::models::Message;
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

fn from_raw(raw: RawMessage) -> Message {
    Message {
        id: raw.id,
        channel_id: raw.channel_id,
        created_by_id: raw.created_by_id,
        content: raw.content,
        created_at: raw.created_at,
    }
}

impl StoreTx<'_> {
    /// Replace the cached message list of a channel (history load).
    pub fn set_channel_messages(&mut self, channel_id: &ChannelId, messages: Vec<RawMessage>) {
        let messages: Vec<Message> = messages.into_iter().map(from_raw).collect();
        self.store.messages.insert(channel_id.clone(), messages);
        self.changes
            .updated(EntityKey::MessageChannel(channel_id.clone()));
    }

    /// Append one message to its channel's cache.
    pub fn push_message(&mut self, raw: RawMessage) {
        let channel_id = raw.channel_id.clone();
        self.store
            .messages
            .entry(channel_id.clone())
            .or_default()
            .push(from_raw(raw));
        self.changes.updated(EntityKey::MessageChannel(channel_id));
    }

    /// Purge the cache of one channel.  Called by the channel deletion
    /// coordinator; safe when nothing is cached.
    pub fn delete_channel_messages(&mut self, channel_id: &ChannelId) -> bool {
        let removed = self.store.messages.shift_remove(channel_id).is_some();
        if removed {
            self.changes
                .removed(EntityKey::MessageChannel(channel_id.clone()));
        }
        removed
    }
}

impl Store {
    /// Cached messages of a channel; `None` when never loaded.
    pub fn channel_messages(&self, channel_id: &ChannelId) -> Option<&[Message]> {
        self.messages.get(channel_id).map(Vec::as_slice)
    }
}
