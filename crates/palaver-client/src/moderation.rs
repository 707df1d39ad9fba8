//! Moderation batch operations.

use thiserror::Error;
use tracing::warn;

use palaver_shared::ServerId;

use crate::error::ServiceError;
use crate::services::ModerationService;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeleteServersError {
    /// A field-attributed rejection (wrong password); remaining servers
    /// were not attempted.
    #[error(transparent)]
    Rejected(ServiceError),

    /// The batch completed, but some deletions failed.
    #[error("{failed} of {total} servers could not be deleted")]
    Partial { failed: usize, total: usize },
}

/// Delete a batch of servers with one password confirmation.
///
/// A rejection attributed to the password aborts the loop immediately;
/// other failures are recorded and the remaining servers are still
/// attempted.
pub async fn delete_servers(
    moderation: &dyn ModerationService,
    server_ids: &[ServerId],
    password: &str,
) -> Result<(), DeleteServersError> {
    let total = server_ids.len();
    let mut failed = 0;

    for server_id in server_ids {
        match moderation.delete_server(server_id, password).await {
            Ok(()) => {}
            Err(err) if err.is_path("password") => {
                warn!(server_id = %server_id, "password rejected, aborting batch");
                return Err(DeleteServersError::Rejected(err));
            }
            Err(err) => {
                warn!(server_id = %server_id, error = %err, "server deletion failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(DeleteServersError::Partial { failed, total });
    }
    Ok(())
}
