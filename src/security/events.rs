use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

pub const USER_SIGNIN: &str = "user_signin";
pub const USER_SIGNUP: &str = "user_signup";
pub const USER_SIGNOUT: &str = "user_signout";
pub const PASSWORD_RESET_REQUEST: &str = "password_reset_request";
pub const PASSWORD_UPDATED: &str = "password_updated";
pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
pub const APPLICATION_SUBMITTED: &str = "application_submitted";
pub const APPLICATION_SUBMISSION_FAILED: &str = "application_submission_failed";
pub const VALIDATION_ERROR: &str = "validation_error";

/// Write-only audit record for a security-sensitive operation. Emitted to a
/// sink and never read back.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub details: BTreeMap<String, Value>,
}

impl SecurityEvent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            timestamp: Utc::now(),
            details: BTreeMap::new(),
        }
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Fire-and-forget audit sink. Implementations must not fail the caller;
/// delivery problems are theirs to swallow.
pub trait SecurityEventSink: Send + Sync {
    fn record(&self, event: SecurityEvent);
}

/// Production sink writing structured events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl SecurityEventSink for TracingEventSink {
    fn record(&self, event: SecurityEvent) {
        let details = serde_json::to_string(&event.details).unwrap_or_default();
        tracing::info!(
            target: "security",
            event = %event.name,
            timestamp = %event.timestamp.to_rfc3339(),
            %details,
            "security event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_accumulate_in_key_order() {
        let event = SecurityEvent::new(APPLICATION_SUBMITTED)
            .detail("user_id", "user-1")
            .detail("application_id", "app-9");

        let keys: Vec<_> = event.details.keys().cloned().collect();
        assert_eq!(keys, vec!["application_id", "user_id"]);
    }

    #[test]
    fn serializes_with_iso_timestamp() {
        let event = SecurityEvent::new(USER_SIGNIN).detail("email", "a@b.cd");
        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["name"], "user_signin");
        assert!(json["timestamp"].as_str().expect("timestamp").contains('T'));
    }
}
