//! Account mutation coordinators.
//!
//! Validation failures are detected locally and returned before any
//! network call; no store mutation happens on any failure path.

use tracing::{debug, info};

use palaver_store::AccountUpdate;

use crate::error::{ServiceError, ServiceResult};
use crate::services::{UpdateUserRequest, UpdateUserResponse, UserService};
use crate::{lock, SharedStore};

const MAX_PASSWORD_LEN: usize = 72;

/// Caller-supplied account changes; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub username: Option<String>,
    pub tag: Option<String>,
    pub email: Option<String>,
    /// Current password, required by the backend for sensitive changes.
    pub password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
    pub socket_id: Option<String>,
}

/// Update the logged-in account.
///
/// A changed email resets the confirmed flag; a rotated session token is
/// surfaced in the response for the caller to persist.
pub async fn update_account(
    store: &SharedStore,
    users: &dyn UserService,
    input: UpdateAccountInput,
) -> ServiceResult<UpdateUserResponse> {
    if let Some(new_password) = &input.new_password {
        if input.confirm_new_password.as_deref() != Some(new_password.as_str()) {
            return Err(ServiceError::new("Confirm password does not match."));
        }
        if new_password.len() > MAX_PASSWORD_LEN {
            return Err(ServiceError::new(
                "Password must be less than 72 characters.",
            ));
        }
    }

    let email_changed = match &input.email {
        Some(email) => {
            let guard = lock(store)?;
            guard.account().email.as_deref() != Some(email.as_str())
        }
        None => false,
    };

    let request = UpdateUserRequest {
        username: input.username.clone(),
        tag: input.tag.clone(),
        email: input.email.clone(),
        password: input.password,
        new_password: input.new_password,
        socket_id: input.socket_id,
    };
    let response = users.update_user(request).await?;

    let mut guard = lock(store)?;
    let mut update = AccountUpdate {
        username: input.username,
        tag: input.tag,
        email: input.email,
        ..AccountUpdate::default()
    };
    if email_changed {
        debug!("email changed, confirmation required again");
        update.email_confirmed = Some(false);
    }
    guard.tx().set_account(update);
    info!("account updated");

    Ok(response)
}

/// Delete the logged-in account.  The backend re-checks the password; a
/// rejection comes back attributed to the `password` path.  Session
/// teardown (store reset, disconnect) is driven by the resulting push
/// event, not here.
pub async fn delete_account(users: &dyn UserService, password: &str) -> ServiceResult<()> {
    users.delete_account(password).await?;
    info!("account deleted");
    Ok(())
}

/// Request an email confirmation code.  Rate-limit rejections carry the
/// remaining cooldown in `retry_after_secs`.
pub async fn send_email_code(users: &dyn UserService) -> ServiceResult<String> {
    users.send_email_confirm_code().await
}

/// Verify an emailed confirmation code; marks the account confirmed on
/// success.
pub async fn confirm_email(
    store: &SharedStore,
    users: &dyn UserService,
    code: &str,
) -> ServiceResult<bool> {
    let confirmed = users.verify_email_confirm_code(code).await?;
    if confirmed {
        lock(store)?.tx().set_account(AccountUpdate {
            email_confirmed: Some(true),
            ..AccountUpdate::default()
        });
        info!("email confirmed");
    }
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use palaver_store::Store;

    use super::*;

    #[derive(Default)]
    struct FakeUsers {
        update_calls: AtomicU32,
        last_request: Mutex<Option<UpdateUserRequest>>,
        reject_delete: bool,
    }

    #[async_trait]
    impl UserService for FakeUsers {
        async fn update_user(
            &self,
            request: UpdateUserRequest,
        ) -> ServiceResult<UpdateUserResponse> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            Ok(UpdateUserResponse {
                new_token: Some("token2".to_string()),
            })
        }

        async fn delete_account(&self, _password: &str) -> ServiceResult<()> {
            if self.reject_delete {
                return Err(ServiceError::with_path("Invalid password.", "password"));
            }
            Ok(())
        }

        async fn send_email_confirm_code(&self) -> ServiceResult<String> {
            Ok("code sent".to_string())
        }

        async fn verify_email_confirm_code(&self, code: &str) -> ServiceResult<bool> {
            Ok(code == "12345")
        }
    }

    fn store_with_account(email: &str) -> SharedStore {
        let mut store = Store::new();
        store.tx().set_account(AccountUpdate {
            user_id: Some("u1".into()),
            email: Some(email.to_string()),
            email_confirmed: Some(true),
            ..AccountUpdate::default()
        });
        Arc::new(Mutex::new(store))
    }

    #[tokio::test]
    async fn test_password_mismatch_fails_before_network() {
        let store = store_with_account("a@b.c");
        let users = FakeUsers::default();

        let err = update_account(
            &store,
            &users,
            UpdateAccountInput {
                new_password: Some("secret".to_string()),
                confirm_new_password: Some("secreT".to_string()),
                ..UpdateAccountInput::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.message, "Confirm password does not match.");
        assert_eq!(users.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_password_rejected_locally() {
        let store = store_with_account("a@b.c");
        let users = FakeUsers::default();
        let long = "x".repeat(73);

        let err = update_account(
            &store,
            &users,
            UpdateAccountInput {
                new_password: Some(long.clone()),
                confirm_new_password: Some(long),
                ..UpdateAccountInput::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.message, "Password must be less than 72 characters.");
        assert_eq!(users.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_email_change_resets_confirmed_flag() {
        let store = store_with_account("a@b.c");
        let users = FakeUsers::default();

        let response = update_account(
            &store,
            &users,
            UpdateAccountInput {
                email: Some("new@b.c".to_string()),
                ..UpdateAccountInput::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(response.new_token.as_deref(), Some("token2"));
        let guard = store.lock().unwrap();
        assert_eq!(guard.account().email.as_deref(), Some("new@b.c"));
        assert!(!guard.account().email_confirmed);
    }

    #[tokio::test]
    async fn test_delete_account_surfaces_password_rejection() {
        let users = FakeUsers {
            reject_delete: true,
            ..FakeUsers::default()
        };
        let err = delete_account(&users, "wrong").await.unwrap_err();
        assert!(err.is_path("password"));

        let users = FakeUsers::default();
        delete_account(&users, "right").await.unwrap();
    }

    #[tokio::test]
    async fn test_confirm_email_sets_flag_on_success() {
        let store = store_with_account("a@b.c");
        let users = FakeUsers::default();

        // Reset the flag first (email changed elsewhere).
        store.lock().unwrap().tx().set_account(AccountUpdate {
            email_confirmed: Some(false),
            ..AccountUpdate::default()
        });

        assert!(!confirm_email(&store, &users, "00000").await.unwrap());
        assert!(!store.lock().unwrap().account().email_confirmed);

        assert!(confirm_email(&store, &users, "12345").await.unwrap());
        assert!(store.lock().unwrap().account().email_confirmed);
    }
}
