use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::auth::provider::{
    AuthProvider, AuthProviderError, Credentials, Session, SignUpOutcome,
};
use crate::auth::service::AuthGate;
use crate::config::SecurityConfig;
use crate::infra::{InMemoryAuthProvider, RecordingEventSink, RecordingNotifier};
use crate::security::rate_limit::RateLimiter;

pub(super) fn build_gate<P: AuthProvider + 'static>(
    provider: Arc<P>,
) -> (
    AuthGate<P, RecordingNotifier, RecordingEventSink>,
    RecordingNotifier,
    RecordingEventSink,
) {
    let notifier = RecordingNotifier::default();
    let events = RecordingEventSink::default();
    let gate = AuthGate::new(
        provider,
        Arc::new(notifier.clone()),
        Arc::new(events.clone()),
        Arc::new(RateLimiter::new()),
        SecurityConfig::default(),
    );
    (gate, notifier, events)
}

pub(super) fn memory_gate() -> (
    AuthGate<InMemoryAuthProvider, RecordingNotifier, RecordingEventSink>,
    Arc<InMemoryAuthProvider>,
    RecordingNotifier,
    RecordingEventSink,
) {
    let provider = Arc::new(InMemoryAuthProvider::default());
    let (gate, notifier, events) = build_gate(provider.clone());
    (gate, provider, notifier, events)
}

/// Provider that rejects every credential pair and counts how often it is
/// reached, so tests can prove the limiter cut a call off locally.
#[derive(Default)]
pub(super) struct RejectingProvider {
    pub(super) sign_in_calls: AtomicU32,
}

impl AuthProvider for RejectingProvider {
    fn sign_up(
        &self,
        _credentials: &Credentials,
        _redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, AuthProviderError> {
        Err(AuthProviderError::AlreadyRegistered)
    }

    fn sign_in(&self, _credentials: &Credentials) -> Result<Session, AuthProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::Relaxed);
        Err(AuthProviderError::InvalidCredentials)
    }

    fn sign_out(&self, _access_token: &str) -> Result<(), AuthProviderError> {
        Ok(())
    }

    fn session(&self, _access_token: &str) -> Result<Option<Session>, AuthProviderError> {
        Ok(None)
    }

    fn request_password_reset(
        &self,
        _email: &str,
        _redirect_to: &str,
    ) -> Result<(), AuthProviderError> {
        Err(AuthProviderError::Provider("connection reset by peer".to_string()))
    }

    fn update_password(
        &self,
        _reset_token: &str,
        _new_password: &str,
    ) -> Result<(), AuthProviderError> {
        Err(AuthProviderError::Provider("invalid or expired reset token".to_string()))
    }
}
