//! # palaver-shared
//!
//! Types shared between the store and client crates: entity id newtypes,
//! raw server payloads (the already-deserialized shapes delivered by the
//! push layer), and the permission bitmask tables.

pub mod permissions;
pub mod raw;
pub mod types;

pub use permissions::{all_permissions, has_bit, Bitwise};
pub use types::{ChannelId, FriendStatus, ServerId, TicketCategory, TicketId, UserId};
