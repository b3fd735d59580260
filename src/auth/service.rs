use std::sync::Arc;

use super::provider::{AuthProvider, Credentials, Session, SignUpOutcome};
use crate::config::SecurityConfig;
use crate::intake::repository::{Notification, Notifier};
use crate::security::events::{self, SecurityEvent, SecurityEventSink};
use crate::security::rate_limit::{auth_key, RateLimiter};
use crate::security::redact::{secure_message, BackendFailure};
use crate::security::validation::{validate_email, validate_password, ValidationReport};
use crate::security::GateError;

/// Gate in front of the hosted auth collaborator: credential shape checks and
/// per-email rate limiting before any request leaves the process.
pub struct AuthGate<P, N, E> {
    provider: Arc<P>,
    notifier: Arc<N>,
    events: Arc<E>,
    limiter: Arc<RateLimiter>,
    config: SecurityConfig,
}

impl<P, N, E> AuthGate<P, N, E>
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    pub fn new(
        provider: Arc<P>,
        notifier: Arc<N>,
        events: Arc<E>,
        limiter: Arc<RateLimiter>,
        config: SecurityConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            events,
            limiter,
            config,
        }
    }

    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, GateError> {
        self.check_credentials(email, password)?;
        self.check_rate("signup", email, self.config.rate_limits.sign_up)?;

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.provider.sign_up(&credentials, redirect_to) {
            Ok(outcome) => {
                self.events.record(
                    SecurityEvent::new(events::USER_SIGNUP)
                        .detail("email", credentials.email.as_str()),
                );
                if outcome.requires_email_confirmation {
                    self.notifier.notify(Notification::success(
                        "Check your email",
                        "We've sent you a confirmation link to complete your registration.",
                    ));
                }
                Ok(outcome)
            }
            Err(error) => Err(self.backend_failure("sign_up", &credentials.email, &error)),
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, GateError> {
        self.check_credentials(email, password)?;
        self.check_rate("signin", email, self.config.rate_limits.sign_in)?;

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.provider.sign_in(&credentials) {
            Ok(session) => {
                self.events.record(
                    SecurityEvent::new(events::USER_SIGNIN)
                        .detail("user_id", session.user_id.as_str()),
                );
                Ok(session)
            }
            Err(error) => Err(self.backend_failure("sign_in", &credentials.email, &error)),
        }
    }

    pub fn sign_out(&self, access_token: &str) -> Result<(), GateError> {
        match self.provider.sign_out(access_token) {
            Ok(()) => {
                self.events.record(SecurityEvent::new(events::USER_SIGNOUT));
                Ok(())
            }
            Err(error) => Err(GateError::Backend {
                user_message: secure_message(&BackendFailure::from(&error)),
            }),
        }
    }

    pub fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), GateError> {
        if let Err(violation) = validate_email(email, &self.config.limits) {
            let mut report = ValidationReport::default();
            report.push(violation.to_string());
            return Err(GateError::ValidationFailed(report));
        }
        self.check_rate("password_reset", email, self.config.rate_limits.password_reset)?;

        match self.provider.request_password_reset(email.trim(), redirect_to) {
            Ok(()) => {
                self.events.record(
                    SecurityEvent::new(events::PASSWORD_RESET_REQUEST)
                        .detail("email", email.trim().to_lowercase()),
                );
                self.notifier.notify(Notification::success(
                    "Check your email",
                    "If an account exists for that address, a reset link is on its way.",
                ));
                Ok(())
            }
            Err(error) => Err(self.backend_failure("password_reset", email, &error)),
        }
    }

    /// Set a new password using the reset token from the emailed link. Only
    /// the password shape is checked; the token is the provider's to verify.
    pub fn update_password(&self, reset_token: &str, new_password: &str) -> Result<(), GateError> {
        if let Err(violation) = validate_password(new_password, &self.config.limits) {
            let mut report = ValidationReport::default();
            report.push(violation.to_string());
            return Err(GateError::ValidationFailed(report));
        }

        match self.provider.update_password(reset_token, new_password) {
            Ok(()) => {
                self.events
                    .record(SecurityEvent::new(events::PASSWORD_UPDATED));
                Ok(())
            }
            Err(error) => Err(GateError::Backend {
                user_message: secure_message(&BackendFailure::from(&error)),
            }),
        }
    }

    fn check_credentials(&self, email: &str, password: &str) -> Result<(), GateError> {
        let mut report = ValidationReport::default();
        if let Err(violation) = validate_email(email, &self.config.limits) {
            report.push(violation.to_string());
        }
        if let Err(violation) = validate_password(password, &self.config.limits) {
            report.push(violation.to_string());
        }
        if report.is_empty() {
            Ok(())
        } else {
            Err(GateError::ValidationFailed(report))
        }
    }

    fn check_rate(
        &self,
        action: &str,
        email: &str,
        policy: crate::security::rate_limit::RateLimitPolicy,
    ) -> Result<(), GateError> {
        let decision = self.limiter.check(&auth_key(action, email), policy);
        if decision.is_allowed() {
            return Ok(());
        }
        self.events.record(
            SecurityEvent::new(events::RATE_LIMIT_EXCEEDED)
                .detail("action", action)
                .detail("email", email.trim().to_lowercase()),
        );
        Err(GateError::RateLimited {
            retry_after_minutes: decision.retry_after_minutes(),
        })
    }

    fn backend_failure(
        &self,
        action: &str,
        email: &str,
        error: &super::provider::AuthProviderError,
    ) -> GateError {
        tracing::warn!(%action, email = %email.trim().to_lowercase(), %error, "auth provider call failed");
        GateError::Backend {
            user_message: secure_message(&BackendFailure::from(error)),
        }
    }
}
