//! Store record types.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer.  Records hold the server-reported fields plus
//! client-local state (last-seen, call-joined, DM recipient id); derived
//! values such as notification state are computed by [`crate::Store`] and
//! deliberately absent here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use palaver_shared::permissions::{self, all_permissions, has_bit, Bitwise};
use palaver_shared::raw::ChannelType;
use palaver_shared::{ChannelId, FriendStatus, ServerId, UserId};

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A conversation channel (server channel or DM).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Channel capability bitmask (see `permissions::channel`).
    pub permissions: u64,
    pub server_id: Option<ServerId>,
    pub category_id: Option<ChannelId>,
    pub created_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub last_messaged_at: Option<DateTime<Utc>>,
    /// Manual position within the server channel list.
    pub order: Option<i32>,

    // Client-local fields, never sent by the server.
    /// When the account holder last viewed this channel.
    pub last_seen: Option<DateTime<Utc>>,
    /// When the account holder joined this channel's voice call.
    pub call_joined_at: Option<DateTime<Utc>>,
    /// DM counterpart, as a weak reference into the user store.
    pub recipient_id: Option<UserId>,
}

impl Channel {
    /// Decode the permission bitmask into the enabled channel capabilities,
    /// in table order.
    pub fn permission_list(&self) -> Vec<&'static Bitwise> {
        all_permissions(&permissions::channel::ALL, self.permissions)
    }

    /// Whether the channel carries the private-channel bit.
    pub fn is_private(&self) -> bool {
        has_bit(self.permissions, permissions::channel::PRIVATE_CHANNEL.bit)
    }
}

/// Partial channel update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelUpdate {
    pub name: Option<String>,
    pub permissions: Option<u64>,
    pub category_id: Option<ChannelId>,
    pub last_messaged_at: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

/// Three-valued notification signal for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationState {
    None,
    Unread,
    Mention,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A server (guild) grouping channels and members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    /// Navigation fallback when the focused channel is deleted.
    pub default_channel_id: Option<ChannelId>,
    pub created_by_id: Option<UserId>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial server update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerUpdate {
    pub name: Option<String>,
    pub default_channel_id: Option<ChannelId>,
    pub avatar: Option<String>,
}

/// Membership of one user in one server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMember {
    pub server_id: ServerId,
    pub user_id: UserId,
    /// Union of the member's role bitmasks (see `permissions::role`).
    pub permissions: u64,
    pub joined_at: DateTime<Utc>,
}

impl ServerMember {
    /// Test one role capability bit.
    pub fn has_permission(&self, bit: u64) -> bool {
        has_bit(self.permissions, bit)
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Online status, as pushed by the presence feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    Offline,
    Online,
    Busy,
    Away,
}

/// A known user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub tag: String,
    pub avatar: Option<String>,
    pub hex_color: Option<String>,
    /// Client-local; absent until a presence update arrives.
    pub presence: Option<PresenceStatus>,
}

// ---------------------------------------------------------------------------
// Friend
// ---------------------------------------------------------------------------

/// A friend relationship, keyed by the other user's id.  The user record
/// itself lives in the user store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub recipient_id: UserId,
    pub status: FriendStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Mention
// ---------------------------------------------------------------------------

/// Unacknowledged mentions in one channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub channel_id: ChannelId,
    /// Author of the most recent mentioning message.
    pub mentioned_by_id: UserId,
    pub server_id: Option<ServerId>,
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One cached chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub channel_id: ChannelId,
    pub created_by_id: UserId,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// The logged-in account.  All fields are absent until the session loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub tag: Option<String>,
    pub email: Option<String>,
    pub email_confirmed: bool,
}

/// Partial account update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub tag: Option<String>,
    pub email: Option<String>,
    pub email_confirmed: Option<bool>,
}
