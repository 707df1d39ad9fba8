//! Push-event dispatch.
//!
//! The socket layer deserializes server pushes into [`ServerEvent`] and
//! hands them to [`handle_event`], which routes each to the store's entry
//! points.  One event is one batch: observers see its full effect or
//! nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use palaver_shared::raw::{RawChannel, RawFriend, RawMessage, RawServer, RawServerMember};
use palaver_shared::{ChannelId, ServerId, UserId};

use palaver_store::{
    ChannelUpdate, Navigator, PresenceStatus, ServerUpdate, Store,
};

/// A state-bearing push from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "t",
    content = "d",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    ChannelCreated(RawChannel),
    ChannelUpdated {
        channel_id: ChannelId,
        update: ChannelUpdate,
    },
    ChannelDeleted {
        channel_id: ChannelId,
        server_id: Option<ServerId>,
    },
    ServerJoined {
        server: RawServer,
        channels: Vec<RawChannel>,
        members: Vec<RawServerMember>,
    },
    ServerUpdated {
        server_id: ServerId,
        update: ServerUpdate,
    },
    ServerLeft {
        server_id: ServerId,
    },
    MemberJoined(RawServerMember),
    MemberLeft {
        server_id: ServerId,
        user_id: UserId,
    },
    FriendsLoaded(Vec<RawFriend>),
    FriendAdded(RawFriend),
    FriendRemoved {
        user_id: UserId,
    },
    UserPresenceUpdated {
        user_id: UserId,
        presence: Option<PresenceStatus>,
    },
    MessageCreated(RawMessage),
    NotificationDismissed {
        channel_id: ChannelId,
        at: DateTime<Utc>,
    },
    /// The session was invalidated (logout, reconnect as someone else).
    SessionEnded,
}

/// Land one push event in the store, as a single batch.
pub fn handle_event(store: &mut Store, nav: &mut dyn Navigator, event: ServerEvent) {
    let mut tx = store.tx();
    match event {
        ServerEvent::ChannelCreated(raw) => tx.set_channel(raw),
        ServerEvent::ChannelUpdated { channel_id, update } => {
            if !tx.update_channel(&channel_id, update) {
                debug!(channel_id = %channel_id, "update for unloaded channel dropped");
            }
        }
        ServerEvent::ChannelDeleted {
            channel_id,
            server_id,
        } => tx.delete_channel(&channel_id, server_id.as_ref(), nav),
        ServerEvent::ServerJoined {
            server,
            channels,
            members,
        } => {
            tx.set_server(server);
            for raw in channels {
                tx.set_channel(raw);
            }
            for raw in members {
                tx.set_member(raw);
            }
        }
        ServerEvent::ServerUpdated { server_id, update } => {
            if !tx.update_server(&server_id, update) {
                debug!(server_id = %server_id, "update for unloaded server dropped");
            }
        }
        ServerEvent::ServerLeft { server_id } => tx.delete_server(&server_id, nav),
        ServerEvent::MemberJoined(raw) => tx.set_member(raw),
        ServerEvent::MemberLeft { server_id, user_id } => {
            tx.remove_member(&server_id, &user_id);
        }
        ServerEvent::FriendsLoaded(friends) => tx.set_friends(friends),
        ServerEvent::FriendAdded(raw) => tx.set_friend(raw),
        ServerEvent::FriendRemoved { user_id } => {
            tx.remove_friend(&user_id);
        }
        ServerEvent::UserPresenceUpdated { user_id, presence } => {
            if !tx.update_user_presence(&user_id, presence) {
                debug!(user_id = %user_id, "presence for unknown user dropped");
            }
        }
        ServerEvent::MessageCreated(message) => {
            let channel_id = message.channel_id.clone();
            let created_at = message.created_at;
            let author = message.created_by_id.clone();

            let account_id = tx.account().user_id.clone();
            let mentions_me = account_id
                .as_ref()
                .map(|id| message.mention_user_ids.contains(id) && *id != author)
                .unwrap_or(false);
            let server_id = tx.channel(&channel_id).and_then(|ch| ch.server_id.clone());

            tx.push_message(message);
            tx.update_last_messaged(&channel_id, Some(created_at));
            if mentions_me {
                tx.increment_mention(&channel_id, &author, server_id.as_ref());
            }
        }
        ServerEvent::NotificationDismissed { channel_id, at } => {
            tx.remove_mention(&channel_id);
            tx.update_last_seen(&channel_id, Some(at));
        }
        ServerEvent::SessionEnded => tx.reset_all(),
    }
}
