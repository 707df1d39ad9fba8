//! REST-style service collaborators.
//!
//! Each trait mirrors one backend surface; coordinators depend on the
//! trait so tests can substitute in-memory fakes.  Every call resolves to
//! a success value or a [`ServiceError`]; nothing here retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use palaver_shared::raw::RawFriend;
use palaver_shared::{ChannelId, ServerId, TicketCategory, TicketId, UserId};

use crate::error::ServiceResult;

/// Short-lived credential required before joining voice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub tag: Option<String>,
    pub email: Option<String>,
    /// Current password, required for sensitive changes.
    pub password: Option<String>,
    pub new_password: Option<String>,
    /// Socket connection to keep logged in when the token rotates.
    pub socket_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserResponse {
    /// Present when the change rotated the session token.
    pub new_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: String,
    pub body: String,
    pub category: TicketCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub category: TicketCategory,
}

#[async_trait]
pub trait VoiceService: Send + Sync {
    async fn generate_credential(&self) -> ServiceResult<Credential>;
    async fn join_voice(&self, channel_id: &ChannelId, socket_id: &str) -> ServiceResult<()>;
    async fn leave_voice(&self, channel_id: &ChannelId) -> ServiceResult<()>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn update_user(&self, request: UpdateUserRequest) -> ServiceResult<UpdateUserResponse>;
    async fn delete_account(&self, password: &str) -> ServiceResult<()>;
    /// Returns a human-readable confirmation message.
    async fn send_email_confirm_code(&self) -> ServiceResult<String>;
    async fn verify_email_confirm_code(&self, code: &str) -> ServiceResult<bool>;
}

#[async_trait]
pub trait FriendService: Send + Sync {
    async fn add_friend(&self, username: &str, tag: &str) -> ServiceResult<RawFriend>;
    async fn remove_friend(&self, user_id: &UserId) -> ServiceResult<()>;
    async fn accept_friend(&self, user_id: &UserId) -> ServiceResult<()>;
}

#[async_trait]
pub trait ModerationService: Send + Sync {
    async fn delete_server(&self, server_id: &ServerId, password: &str) -> ServiceResult<()>;
}

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn create_ticket(&self, request: CreateTicketRequest) -> ServiceResult<Ticket>;
}
