//! Friend store operations, keyed by the other user's id.

use palaver_shared::raw::RawFriend;
use palaver_shared::{FriendStatus, UserId};

use crate::models::Friend;
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Insert or replace one friend relationship.  The inline recipient
    /// user is upserted into the user store; the friend record keeps only
    /// a weak reference to it.
    pub fn set_friend(&mut self, raw: RawFriend) {
        let recipient_id = raw.recipient.id.clone();
        self.set_user(raw.recipient);

        let friend = Friend {
            recipient_id: recipient_id.clone(),
            status: raw.status,
            created_at: raw.created_at,
        };
        let applied = self.store.friends.set(recipient_id.clone(), friend);
        self.changes.apply(EntityKey::Friend(recipient_id), applied);
    }

    /// Bulk-load the friend list (login payload), in this batch.
    pub fn set_friends(&mut self, friends: Vec<RawFriend>) {
        for raw in friends {
            self.set_friend(raw);
        }
    }

    /// Change the relationship status (request accepted, blocked…).
    /// Returns `false` when no relationship is loaded for `id`.
    pub fn update_friend_status(&mut self, id: &UserId, status: FriendStatus) -> bool {
        let ok = self.store.friends.update(id, |friend| friend.status = status);
        if ok {
            self.changes.updated(EntityKey::Friend(id.clone()));
        }
        ok
    }

    pub fn remove_friend(&mut self, id: &UserId) -> bool {
        let removed = self.store.friends.remove(id).is_some();
        if removed {
            self.changes.removed(EntityKey::Friend(id.clone()));
        }
        removed
    }
}

impl Store {
    pub fn friend(&self, id: &UserId) -> Option<&Friend> {
        self.friends.get(id)
    }

    /// All friend relationships, in insertion order.
    pub fn friends(&self) -> impl Iterator<Item = &Friend> {
        self.friends.values()
    }
}
