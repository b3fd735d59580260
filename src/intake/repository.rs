use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, NewApplication};
use crate::security::redact::BackendFailure;

/// Read scope for listing applications. Admins see every record; everyone
/// else sees only their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    User(String),
    Admin,
}

/// Persistence abstraction so the intake service can be exercised in
/// isolation. `list` returns records newest first.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError>;
    fn list(&self, scope: ListScope) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for persistence failures. Display output is the raw
/// backend text; only the redactor may turn it into something user-facing.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate key value violates unique constraint")]
    Conflict,
    #[error("permission denied for relation applications")]
    PermissionDenied,
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Backend(String),
}

impl From<&RepositoryError> for BackendFailure {
    fn from(error: &RepositoryError) -> Self {
        BackendFailure::persistence(error.to_string())
    }
}

/// Fire-and-forget user-facing message surface (a toast in the web client).
/// Not awaited by the gate; implementations swallow their own failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

impl Notification {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn failure(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: NotificationVariant::Destructive,
        }
    }
}
