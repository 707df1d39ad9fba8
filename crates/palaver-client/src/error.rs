//! Service-boundary error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure returned by a REST-style service call.
///
/// `path` attributes the failure to one input field (e.g. `"password"`)
/// so callers can surface it next to the right control; `retry_after_secs`
/// carries the cooldown of rate-limited endpoints such as the
/// email-confirmation code.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub retry_after_secs: Option<u64>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            retry_after_secs: None,
        }
    }

    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
            retry_after_secs: None,
        }
    }

    /// Whether this failure is attributed to the given input field.
    pub fn is_path(&self, path: &str) -> bool {
        self.path.as_deref() == Some(path)
    }
}

/// Convenience alias used throughout the crate.
pub type ServiceResult<T> = Result<T, ServiceError>;
