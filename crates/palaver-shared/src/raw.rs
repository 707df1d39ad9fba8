//! Raw server payloads.
//!
//! These are the already-deserialized shapes the push layer delivers when
//! an entity is created or loaded.  The store converts them into its own
//! records; they never carry client-local fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, FriendStatus, ServerId, UserId};

/// Channel kind as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    ServerText,
    DmText,
    Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawChannel {
    pub id: ChannelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Channel capability bitmask (see `permissions::channel`).
    #[serde(default)]
    pub permissions: u64,
    #[serde(default)]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub category_id: Option<ChannelId>,
    #[serde(default)]
    pub created_by_id: Option<UserId>,
    /// DM counterpart, delivered inline on DM channels.
    #[serde(default)]
    pub recipient: Option<RawUser>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_messaged_at: Option<DateTime<Utc>>,
    /// Manual ordering position within the server channel list.
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: UserId,
    pub username: String,
    pub tag: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub hex_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawServer {
    pub id: ServerId,
    pub name: String,
    /// Channel to land on when entering the server; also the navigation
    /// fallback when the focused channel is deleted.
    #[serde(default)]
    pub default_channel_id: Option<ChannelId>,
    #[serde(default)]
    pub created_by_id: Option<UserId>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawServerMember {
    pub server_id: ServerId,
    pub user_id: UserId,
    /// Union of the member's role bitmasks (see `permissions::role`).
    #[serde(default)]
    pub permissions: u64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawFriend {
    pub status: FriendStatus,
    /// The other side of the relationship, delivered inline.
    pub recipient: RawUser,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    pub channel_id: ChannelId,
    pub created_by_id: UserId,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Users mentioned in the message body.
    #[serde(default)]
    pub mention_user_ids: Vec<UserId>,
}
