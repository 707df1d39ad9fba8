//! Logged-in account state.

use crate::models::{Account, AccountUpdate};
use crate::notify::EntityKey;
use crate::store::{Store, StoreTx};

impl StoreTx<'_> {
    /// Merge a partial update into the account record.
    pub fn set_account(&mut self, update: AccountUpdate) {
        let account = &mut self.store.account;
        if let Some(user_id) = update.user_id {
            account.user_id = Some(user_id);
        }
        if let Some(username) = update.username {
            account.username = Some(username);
        }
        if let Some(tag) = update.tag {
            account.tag = Some(tag);
        }
        if let Some(email) = update.email {
            account.email = Some(email);
        }
        if let Some(email_confirmed) = update.email_confirmed {
            account.email_confirmed = email_confirmed;
        }
        self.changes.updated(EntityKey::Account);
    }
}

impl Store {
    pub fn account(&self) -> &Account {
        &self.account
    }
}
