//! Voice-call session coordination.
//!
//! Both entry points suspend at network boundaries; the store is only
//! touched after the call resolves, and only after re-validating that the
//! state the caller saw is still current.  A stale response therefore
//! never marks a session current or clears a session it no longer owns.

use tracing::{debug, info};

use palaver_shared::ChannelId;

use crate::error::ServiceResult;
use crate::services::VoiceService;
use crate::{lock, SharedStore};

/// Join the voice call of a channel: acquire a credential, request the
/// join, and only then record the channel as the current session.
///
/// If the channel was deleted while the requests were in flight the
/// result is dropped silently.
pub async fn join_call(
    store: &SharedStore,
    voice: &dyn VoiceService,
    channel_id: ChannelId,
    socket_id: &str,
) -> ServiceResult<()> {
    voice.generate_credential().await?;
    voice.join_voice(&channel_id, socket_id).await?;

    let mut guard = lock(store)?;
    if guard.channel(&channel_id).is_none() {
        debug!(channel_id = %channel_id, "channel gone before voice join resolved, dropping");
        return Ok(());
    }
    info!(channel_id = %channel_id, "joined voice");
    guard.tx().set_current_voice(Some(channel_id));
    Ok(())
}

/// Leave the voice call of a channel.  The global pointer is cleared only
/// when it still points at this channel; a join that superseded this
/// session while the leave was in flight is left untouched.
pub async fn leave_call(
    store: &SharedStore,
    voice: &dyn VoiceService,
    channel_id: &ChannelId,
) -> ServiceResult<()> {
    voice.leave_voice(channel_id).await?;

    let mut guard = lock(store)?;
    if guard.current_voice_channel() == Some(channel_id) {
        info!(channel_id = %channel_id, "left voice");
        guard.tx().set_current_voice(None);
    } else {
        debug!(channel_id = %channel_id, "voice session superseded, leaving pointer untouched");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use palaver_shared::raw::{ChannelType, RawChannel};
    use palaver_store::Store;

    use super::*;
    use crate::services::Credential;

    #[derive(Default)]
    struct FakeVoice {
        credentials: AtomicU32,
        joins: AtomicU32,
        leaves: AtomicU32,
        fail_join: bool,
    }

    #[async_trait]
    impl VoiceService for FakeVoice {
        async fn generate_credential(&self) -> ServiceResult<Credential> {
            self.credentials.fetch_add(1, Ordering::SeqCst);
            Ok(Credential {
                token: "t".to_string(),
            })
        }

        async fn join_voice(&self, _channel_id: &ChannelId, _socket_id: &str) -> ServiceResult<()> {
            self.joins.fetch_add(1, Ordering::SeqCst);
            if self.fail_join {
                return Err(crate::ServiceError::new("join rejected"));
            }
            Ok(())
        }

        async fn leave_voice(&self, _channel_id: &ChannelId) -> ServiceResult<()> {
            self.leaves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn store_with_channels(ids: &[&str]) -> SharedStore {
        let mut store = Store::new();
        {
            let mut tx = store.tx();
            for id in ids {
                tx.set_channel(RawChannel {
                    id: (*id).into(),
                    name: None,
                    channel_type: ChannelType::ServerText,
                    permissions: 0,
                    server_id: None,
                    category_id: None,
                    created_by_id: None,
                    recipient: None,
                    created_at: Utc.timestamp_millis_opt(100).unwrap(),
                    last_messaged_at: None,
                    order: None,
                });
            }
        }
        Arc::new(Mutex::new(store))
    }

    #[tokio::test]
    async fn test_join_then_leave_clears_pointer() {
        let store = store_with_channels(&["a"]);
        let voice = FakeVoice::default();

        join_call(&store, &voice, "a".into(), "sock").await.unwrap();
        assert_eq!(
            store.lock().unwrap().current_voice_channel(),
            Some(&"a".into())
        );

        leave_call(&store, &voice, &"a".into()).await.unwrap();
        assert!(store.lock().unwrap().current_voice_channel().is_none());
    }

    #[tokio::test]
    async fn test_stale_leave_keeps_superseding_session() {
        let store = store_with_channels(&["a", "b"]);
        let voice = FakeVoice::default();

        join_call(&store, &voice, "a".into(), "sock").await.unwrap();
        // A second join lands before A's leave resolves.
        join_call(&store, &voice, "b".into(), "sock").await.unwrap();
        leave_call(&store, &voice, &"a".into()).await.unwrap();

        assert_eq!(
            store.lock().unwrap().current_voice_channel(),
            Some(&"b".into())
        );
    }

    #[tokio::test]
    async fn test_failed_join_leaves_no_session() {
        let store = store_with_channels(&["a"]);
        let voice = FakeVoice {
            fail_join: true,
            ..FakeVoice::default()
        };

        let err = join_call(&store, &voice, "a".into(), "sock")
            .await
            .unwrap_err();
        assert_eq!(err.message, "join rejected");
        assert!(store.lock().unwrap().current_voice_channel().is_none());
    }

    #[tokio::test]
    async fn test_join_dropped_when_channel_deleted_mid_flight() {
        // The channel never existed in the store; the join response must
        // be dropped instead of resurrecting state.
        let store = store_with_channels(&[]);
        let voice = FakeVoice::default();

        join_call(&store, &voice, "ghost".into(), "sock")
            .await
            .unwrap();
        assert!(store.lock().unwrap().current_voice_channel().is_none());
    }
}
