//! Mention index operations.  Derived mention counts read this store; the
//! channel records themselves never cache a count.

use palaver_shared::{ChannelId, ServerId, UserId};

use crate::models::Mention;
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Insert or replace the mention entry for a channel.
    pub fn set_mention(&mut self, mention: Mention) {
        let id = mention.channel_id.clone();
        let applied = self.store.mentions.set(id.clone(), mention);
        self.changes.apply(EntityKey::Mention(id), applied);
    }

    /// Bump the mention count for a channel, creating the entry when
    /// absent.
    pub fn increment_mention(
        &mut self,
        channel_id: &ChannelId,
        mentioned_by_id: &UserId,
        server_id: Option<&ServerId>,
    ) {
        let updated = self.store.mentions.update(channel_id, |m| {
            m.count += 1;
            m.mentioned_by_id = mentioned_by_id.clone();
        });
        if updated {
            self.changes.updated(EntityKey::Mention(channel_id.clone()));
            return;
        }

        self.store.mentions.set(
            channel_id.clone(),
            Mention {
                channel_id: channel_id.clone(),
                mentioned_by_id: mentioned_by_id.clone(),
                server_id: server_id.cloned(),
                count: 1,
            },
        );
        self.changes.added(EntityKey::Mention(channel_id.clone()));
    }

    /// Clear the mention entry for a channel (notification dismissed).
    pub fn remove_mention(&mut self, channel_id: &ChannelId) -> bool {
        let removed = self.store.mentions.remove(channel_id).is_some();
        if removed {
            self.changes.removed(EntityKey::Mention(channel_id.clone()));
        }
        removed
    }
}

impl Store {
    pub fn mention(&self, channel_id: &ChannelId) -> Option<&Mention> {
        self.mentions.get(channel_id)
    }
}
