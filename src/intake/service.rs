use std::sync::Arc;

use super::domain::{ApplicationInput, ApplicationRecord, ApplicationStatus, NewApplication, UserIdentity};
use super::repository::{ApplicationRepository, ListScope, Notification, Notifier};
use crate::config::SecurityConfig;
use crate::security::events::{self, SecurityEvent, SecurityEventSink};
use crate::security::rate_limit::RateLimiter;
use crate::security::redact::{secure_message, BackendFailure};
use crate::security::sanitize::sanitize_input;
use crate::security::validation::validate_application;
use crate::security::GateError;

/// Orchestrates the gate for application writes: validate, sanitize,
/// rate-limit, then delegate to the persistence collaborator.
pub struct ApplicationIntakeService<R, N, E> {
    repository: Arc<R>,
    notifier: Arc<N>,
    events: Arc<E>,
    limiter: Arc<RateLimiter>,
    config: SecurityConfig,
}

impl<R, N, E> ApplicationIntakeService<R, N, E>
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        events: Arc<E>,
        limiter: Arc<RateLimiter>,
        config: SecurityConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            events,
            limiter,
            config,
        }
    }

    /// Submit an application on behalf of an authenticated caller.
    ///
    /// Fails fast without touching the rate limiter or the repository when the
    /// caller is anonymous or the payload does not validate.
    pub fn submit(
        &self,
        identity: Option<&UserIdentity>,
        input: ApplicationInput,
    ) -> Result<ApplicationRecord, GateError> {
        let identity = identity.ok_or(GateError::AuthenticationRequired)?;

        if let Err(report) = validate_application(&input, &self.config.limits) {
            self.events.record(
                SecurityEvent::new(events::VALIDATION_ERROR)
                    .detail("user_id", identity.user_id.as_str())
                    .detail("action", "application_submit")
                    .detail("errors", report.joined()),
            );
            return Err(GateError::ValidationFailed(report));
        }

        let key = format!("application_submit_{}", identity.user_id);
        let decision = self
            .limiter
            .check(&key, self.config.rate_limits.application_submit);
        if !decision.is_allowed() {
            self.events.record(
                SecurityEvent::new(events::RATE_LIMIT_EXCEEDED)
                    .detail("user_id", identity.user_id.as_str())
                    .detail("action", "application_submit"),
            );
            return Err(GateError::RateLimited {
                retry_after_minutes: decision.retry_after_minutes(),
            });
        }

        let application = NewApplication {
            user_id: identity.user_id.clone(),
            name: sanitize_input(&input.name),
            age: input.age,
            address: sanitize_input(&input.address),
            annual_income: sanitize_input(&input.annual_income),
            job_description: sanitize_input(&input.job_description),
            status: ApplicationStatus::Submitted,
        };

        match self.repository.insert(application) {
            Ok(record) => {
                self.events.record(
                    SecurityEvent::new(events::APPLICATION_SUBMITTED)
                        .detail("user_id", identity.user_id.as_str())
                        .detail("application_id", record.id.0.as_str()),
                );
                self.notifier.notify(Notification::success(
                    "Application Submitted!",
                    "Thank you for your interest. We'll be in touch within 48 hours.",
                ));
                Ok(record)
            }
            Err(error) => {
                self.events.record(
                    SecurityEvent::new(events::APPLICATION_SUBMISSION_FAILED)
                        .detail("user_id", identity.user_id.as_str())
                        .detail("error", error.to_string()),
                );
                let user_message = secure_message(&BackendFailure::from(&error));
                self.notifier
                    .notify(Notification::failure("Submission failed", &user_message));
                Err(GateError::Backend { user_message })
            }
        }
    }

    /// List applications visible to the caller: admins see all, everyone else
    /// their own, newest first.
    pub fn list(&self, identity: Option<&UserIdentity>) -> Result<Vec<ApplicationRecord>, GateError> {
        let identity = identity.ok_or(GateError::AuthenticationRequired)?;

        let scope = if identity.is_admin {
            ListScope::Admin
        } else {
            ListScope::User(identity.user_id.clone())
        };

        self.repository.list(scope).map_err(|error| {
            tracing::warn!(user_id = %identity.user_id, %error, "application listing failed");
            GateError::Backend {
                user_message: secure_message(&BackendFailure::from(&error)),
            }
        })
    }
}
