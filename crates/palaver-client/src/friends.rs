//! Friend relationship coordinators.
//!
//! Each mutation hits the service first and lands in the store only on
//! success; results for relationships that vanished while the request
//! was in flight are dropped.

use tracing::debug;

use palaver_shared::{FriendStatus, UserId};

use crate::error::ServiceResult;
use crate::services::FriendService;
use crate::{lock, SharedStore};

/// Send a friend request by username and tag.
pub async fn add_friend(
    store: &SharedStore,
    friends: &dyn FriendService,
    username: &str,
    tag: &str,
) -> ServiceResult<()> {
    let raw = friends.add_friend(username, tag).await?;
    lock(store)?.tx().set_friend(raw);
    Ok(())
}

/// Remove (or decline) a relationship.
pub async fn remove_friend(
    store: &SharedStore,
    friends: &dyn FriendService,
    user_id: &UserId,
) -> ServiceResult<()> {
    friends.remove_friend(user_id).await?;
    let mut guard = lock(store)?;
    if !guard.tx().remove_friend(user_id) {
        debug!(user_id = %user_id, "friend already gone when removal resolved");
    }
    Ok(())
}

/// Accept an incoming request.
pub async fn accept_friend(
    store: &SharedStore,
    friends: &dyn FriendService,
    user_id: &UserId,
) -> ServiceResult<()> {
    friends.accept_friend(user_id).await?;
    let mut guard = lock(store)?;
    if !guard.tx().update_friend_status(user_id, FriendStatus::Friends) {
        debug!(user_id = %user_id, "relationship gone when accept resolved, dropping");
    }
    Ok(())
}
