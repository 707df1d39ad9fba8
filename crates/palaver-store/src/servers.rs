//! Server (guild) store operations.

use tracing::debug;

use palaver_shared::raw::RawServer;
use palaver_shared::ServerId;

use crate::models::{Server, ServerUpdate};
use crate::notify::EntityKey;
use crate::store::{Navigator, Store, StoreTx};

impl StoreTx<'_> {
    /// Insert or fully replace a server from a raw payload.
    pub fn set_server(&mut self, raw: RawServer) {
        let server = Server {
            id: raw.id.clone(),
            name: raw.name,
            default_channel_id: raw.default_channel_id,
            created_by_id: raw.created_by_id,
            avatar: raw.avatar,
            created_at: raw.created_at,
        };
        let applied = self.store.servers.set(raw.id.clone(), server);
        self.changes.apply(EntityKey::Server(raw.id), applied);
    }

    /// Merge a partial update into an existing server.  Returns `false`
    /// when the server is not loaded.
    pub fn update_server(&mut self, id: &ServerId, update: ServerUpdate) -> bool {
        let ok = self.store.servers.update(id, |server| {
            if let Some(name) = update.name {
                server.name = name;
            }
            if let Some(default_channel_id) = update.default_channel_id {
                server.default_channel_id = Some(default_channel_id);
            }
            if let Some(avatar) = update.avatar {
                server.avatar = Some(avatar);
            }
        });
        if ok {
            self.changes.updated(EntityKey::Server(id.clone()));
        }
        ok
    }

    /// Remove a server together with its channels and memberships, in
    /// this batch (server-left handling).
    pub fn delete_server(&mut self, id: &ServerId, nav: &mut dyn Navigator) {
        self.remove_server_channels(id, nav);
        self.remove_server_members(id);
        if self.store.servers.remove(id).is_some() {
            debug!(server_id = %id, "server deleted");
            self.changes.removed(EntityKey::Server(id.clone()));
        }
    }
}

impl Store {
    pub fn server(&self, id: &ServerId) -> Option<&Server> {
        self.servers.get(id)
    }

    /// All loaded servers, in insertion order.
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use palaver_shared::raw::{ChannelType, RawChannel, RawServerMember};
    use palaver_shared::ChannelId;

    use super::*;

    struct NoNav;

    impl Navigator for NoNav {
        fn focused_channel(&self) -> Option<ChannelId> {
            None
        }

        fn replace_to_channel(&mut self, _server_id: &ServerId, _channel_id: &ChannelId) {}
    }

    #[test]
    fn test_delete_server_cascades_to_channels_and_members() {
        let mut store = Store::new();
        let created_at = Utc.timestamp_millis_opt(100).unwrap();
        {
            let mut tx = store.tx();
            tx.set_server(RawServer {
                id: "s1".into(),
                name: "server".to_string(),
                default_channel_id: None,
                created_by_id: None,
                avatar: None,
                created_at,
            });
            tx.set_channel(RawChannel {
                id: "c1".into(),
                name: None,
                channel_type: ChannelType::ServerText,
                permissions: 0,
                server_id: Some("s1".into()),
                category_id: None,
                created_by_id: None,
                recipient: None,
                created_at,
                last_messaged_at: None,
                order: None,
            });
            tx.set_member(RawServerMember {
                server_id: "s1".into(),
                user_id: "u1".into(),
                permissions: 0,
                joined_at: created_at,
            });
        }

        store.tx().delete_server(&"s1".into(), &mut NoNav);
        assert!(store.server(&"s1".into()).is_none());
        assert!(store.channel(&"c1".into()).is_none());
        assert!(store.member(&"s1".into(), &"u1".into()).is_none());
    }
}
