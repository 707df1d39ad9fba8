//! Server membership store operations, keyed by `(server, user)`.

use palaver_shared::raw::RawServerMember;
use palaver_shared::{ServerId, UserId};

use crate::models::ServerMember;
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Insert or fully replace a membership from a raw payload.
    pub fn set_member(&mut self, raw: RawServerMember) {
        let member = ServerMember {
            server_id: raw.server_id.clone(),
            user_id: raw.user_id.clone(),
            permissions: raw.permissions,
            joined_at: raw.joined_at,
        };
        let key = (raw.server_id.clone(), raw.user_id.clone());
        let applied = self.store.members.set(key, member);
        self.changes
            .apply(EntityKey::ServerMember(raw.server_id, raw.user_id), applied);
    }

    pub fn remove_member(&mut self, server_id: &ServerId, user_id: &UserId) -> bool {
        let removed = self
            .store
            .members
            .remove(&(server_id.clone(), user_id.clone()))
            .is_some();
        if removed {
            self.changes
                .removed(EntityKey::ServerMember(server_id.clone(), user_id.clone()));
        }
        removed
    }

    /// Remove every membership of one server, in this batch.
    pub fn remove_server_members(&mut self, server_id: &ServerId) {
        let keys: Vec<(ServerId, UserId)> = self
            .store
            .members
            .keys()
            .filter(|(sid, _)| sid == server_id)
            .cloned()
            .collect();
        for (server_id, user_id) in keys {
            self.store.members.remove(&(server_id.clone(), user_id.clone()));
            self.changes
                .removed(EntityKey::ServerMember(server_id, user_id));
        }
    }
}

impl Store {
    pub fn member(&self, server_id: &ServerId, user_id: &UserId) -> Option<&ServerMember> {
        self.members.get(&(server_id.clone(), user_id.clone()))
    }

    /// Members of one server, in insertion order.
    pub fn server_members(&self, server_id: &ServerId) -> Vec<&ServerMember> {
        self.members
            .values()
            .filter(|m| &m.server_id == server_id)
            .collect()
    }
}
