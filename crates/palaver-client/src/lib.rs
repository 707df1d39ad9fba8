//! # palaver-client
//!
//! Side-effect coordinators for the Palaver chat client: the async REST
//! service boundary, voice-call session handling, account and friend
//! mutations, moderation batch operations, and the push-event dispatch
//! that lands server events in the store.
//!
//! Coordinators lock the shared store only around mutations, never across
//! an `.await`; any state read before a network call is re-validated once
//! the call resolves, so stale responses are dropped instead of clobbering
//! newer state.

pub mod account;
pub mod error;
pub mod events;
pub mod friends;
pub mod moderation;
pub mod services;
pub mod tickets;
pub mod voice;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::{fmt, EnvFilter};

use palaver_store::Store;

pub use error::{ServiceError, ServiceResult};

/// The store handle shared between the event loop and coordinators.
pub type SharedStore = Arc<Mutex<Store>>;

pub(crate) fn lock(store: &SharedStore) -> ServiceResult<MutexGuard<'_, Store>> {
    store
        .lock()
        .map_err(|e| ServiceError::new(format!("State lock poisoned: {e}")))
}

/// Install the global tracing subscriber, honouring `RUST_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("palaver_client=debug,palaver_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
