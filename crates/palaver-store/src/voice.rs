//! Global voice-session pointer.
//!
//! At most one channel holds the account's voice session.  Coordinators
//! that set or clear the pointer after an asynchronous gap must
//! re-validate it first; the store itself only records the value.

use palaver_shared::ChannelId;

use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Point the voice session at a channel, or clear it with `None`.
    pub fn set_current_voice(&mut self, channel_id: Option<ChannelId>) {
        if self.store.voice_channel != channel_id {
            self.store.voice_channel = channel_id;
            self.changes.updated(EntityKey::VoiceSession);
        }
    }
}

impl Store {
    /// The channel currently holding the voice session, if any.
    pub fn current_voice_channel(&self) -> Option<&ChannelId> {
        self.voice_channel.as_ref()
    }
}
