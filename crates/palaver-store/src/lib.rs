//! # palaver-store
//!
//! Client-side entity record stores for the Palaver chat application.
//!
//! Server-pushed state lands in keyed record maps (channels, servers,
//! members, users, friends, mentions, a message cache, the voice-session
//! pointer, and the account).  All mutation goes through a [`StoreTx`]
//! batch: writes apply in call order and observers receive exactly one
//! [`StoreNotification`] per batch, so no consumer ever sees a partial
//! cross-store state.  Derived views (permission lists, notification
//! state, mention counts, DM recipients) are computed on demand from
//! current store contents and never cached in the records.

pub mod account;
pub mod channels;
pub mod friends;
pub mod members;
pub mod mentions;
pub mod messages;
pub mod models;
pub mod notify;
pub mod records;
pub mod servers;
pub mod store;
pub mod users;
pub mod voice;

pub use models::*;
pub use notify::{EntityKey, NotificationSender, StoreNotification};
pub use records::Records;
pub use store::{Navigator, Store, StoreTx};
