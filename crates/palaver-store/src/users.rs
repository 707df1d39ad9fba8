//! User store operations.

use palaver_shared::raw::RawUser;
use palaver_shared::UserId;

use crate::models::{PresenceStatus, User};
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Upsert a user from a raw payload.  An existing record keeps its
    /// client-local presence; the server fields are overwritten.
    pub fn set_user(&mut self, raw: RawUser) {
        let updated = self.store.users.update(&raw.id, |user| {
            user.username = raw.username.clone();
            user.tag = raw.tag.clone();
            user.avatar = raw.avatar.clone();
            user.hex_color = raw.hex_color.clone();
        });
        if updated {
            self.changes.updated(EntityKey::User(raw.id));
            return;
        }

        let user = User {
            id: raw.id.clone(),
            username: raw.username,
            tag: raw.tag,
            avatar: raw.avatar,
            hex_color: raw.hex_color,
            presence: None,
        };
        self.store.users.set(raw.id.clone(), user);
        self.changes.added(EntityKey::User(raw.id));
    }

    /// Apply a presence push.  Returns `false` when the user is not
    /// loaded.
    pub fn update_user_presence(&mut self, id: &UserId, presence: Option<PresenceStatus>) -> bool {
        let ok = self.store.users.update(id, |user| user.presence = presence);
        if ok {
            self.changes.updated(EntityKey::User(id.clone()));
        }
        ok
    }
}

impl Store {
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// All loaded users, in insertion order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}
