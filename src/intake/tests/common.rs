use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::infra::{InMemoryApplicationRepository, RecordingEventSink, RecordingNotifier};
use crate::intake::domain::{ApplicationInput, ApplicationRecord, NewApplication, UserIdentity};
use crate::intake::repository::{ApplicationRepository, ListScope, RepositoryError};
use crate::intake::service::ApplicationIntakeService;
use crate::security::rate_limit::RateLimiter;

pub(super) fn security_config() -> SecurityConfig {
    SecurityConfig::default()
}

pub(super) fn identity(user_id: &str) -> UserIdentity {
    UserIdentity {
        user_id: user_id.to_string(),
        email: format!("{user_id}@practice.example.com"),
        is_admin: false,
    }
}

pub(super) fn admin_identity() -> UserIdentity {
    UserIdentity {
        user_id: "admin-1".to_string(),
        email: "ops@lendgate.example.com".to_string(),
        is_admin: true,
    }
}

pub(super) fn applicant_input() -> ApplicationInput {
    ApplicationInput {
        name: "Dr. Maya Oduya".to_string(),
        age: 38,
        address: "412 Harbor View Drive, Portsmouth".to_string(),
        annual_income: "$180,000".to_string(),
        job_description: "Owner-operator of a two-chair general dentistry practice".to_string(),
    }
}

pub(super) type MemoryIntakeService =
    ApplicationIntakeService<InMemoryApplicationRepository, RecordingNotifier, RecordingEventSink>;

pub(super) fn build_service() -> (
    MemoryIntakeService,
    Arc<InMemoryApplicationRepository>,
    RecordingNotifier,
    RecordingEventSink,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = RecordingNotifier::default();
    let events = RecordingEventSink::default();
    let service = ApplicationIntakeService::new(
        repository.clone(),
        Arc::new(notifier.clone()),
        Arc::new(events.clone()),
        Arc::new(RateLimiter::new()),
        security_config(),
    );
    (service, repository, notifier, events)
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn list(&self, _scope: ListScope) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn list(&self, _scope: ListScope) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn service_with_repository<R: ApplicationRepository + 'static>(
    repository: Arc<R>,
) -> (
    ApplicationIntakeService<R, RecordingNotifier, RecordingEventSink>,
    RecordingNotifier,
    RecordingEventSink,
) {
    let notifier = RecordingNotifier::default();
    let events = RecordingEventSink::default();
    let service = ApplicationIntakeService::new(
        repository,
        Arc::new(notifier.clone()),
        Arc::new(events.clone()),
        Arc::new(RateLimiter::new()),
        security_config(),
    );
    (service, notifier, events)
}
