//! In-process collaborator implementations used by the dev server and the
//! integration tests. Production deployments swap these for adapters over the
//! hosted database and auth provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::auth::provider::{
    AuthProvider, AuthProviderError, Credentials, Session, SignUpOutcome,
};
use crate::intake::domain::{ApplicationId, ApplicationRecord, NewApplication};
use crate::intake::repository::{
    ApplicationRepository, ListScope, Notification, Notifier, RepositoryError,
};
use crate::security::events::{SecurityEvent, SecurityEventSink};

/// Volatile application store ordered by insertion time.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    records: Mutex<Vec<ApplicationRecord>>,
    sequence: AtomicU64,
}

impl InMemoryApplicationRepository {
    fn next_id(&self) -> ApplicationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ApplicationId(format!("app-{id:06}"))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: NewApplication) -> Result<ApplicationRecord, RepositoryError> {
        let now = Utc::now();
        let record = ApplicationRecord {
            id: self.next_id(),
            user_id: application.user_id,
            name: application.name,
            age: application.age,
            address: application.address,
            annual_income: application.annual_income,
            job_description: application.job_description,
            status: application.status,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.lock().expect("repository mutex poisoned");
        records.push(record.clone());
        Ok(record)
    }

    fn list(&self, scope: ListScope) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let mut visible: Vec<ApplicationRecord> = records
            .iter()
            .filter(|record| match &scope {
                ListScope::Admin => true,
                ListScope::User(user_id) => &record.user_id == user_id,
            })
            .cloned()
            .collect();
        visible.sort_by(|a, b| (&b.created_at, &b.id.0).cmp(&(&a.created_at, &a.id.0)));
        Ok(visible)
    }
}

struct RegisteredUser {
    user_id: String,
    password: String,
}

/// Volatile auth collaborator: registers users, issues opaque tokens, and
/// hands out reset tokens through the tracing log instead of email.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    users: Mutex<HashMap<String, RegisteredUser>>,
    sessions: Mutex<HashMap<String, Session>>,
    reset_tokens: Mutex<HashMap<String, String>>,
    sequence: AtomicU64,
}

impl InMemoryAuthProvider {
    fn next_token(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{id:08x}")
    }

    fn open_session(&self, user_id: &str, email: &str) -> Session {
        let session = Session {
            access_token: self.next_token("tok"),
            user_id: user_id.to_string(),
            email: email.to_string(),
            is_admin: false,
        };
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(session.access_token.clone(), session.clone());
        session
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn sign_up(
        &self,
        credentials: &Credentials,
        _redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, AuthProviderError> {
        let email = credentials.email.trim().to_lowercase();
        let mut users = self.users.lock().expect("user mutex poisoned");
        if users.contains_key(&email) {
            return Err(AuthProviderError::AlreadyRegistered);
        }

        let user_id = self.next_token("user");
        users.insert(
            email.clone(),
            RegisteredUser {
                user_id: user_id.clone(),
                password: credentials.password.clone(),
            },
        );
        drop(users);

        // No mail transport here, so sessions open immediately.
        let session = self.open_session(&user_id, &email);
        Ok(SignUpOutcome {
            user_id,
            session: Some(session),
            requires_email_confirmation: false,
        })
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthProviderError> {
        let email = credentials.email.trim().to_lowercase();
        let users = self.users.lock().expect("user mutex poisoned");
        let user = users
            .get(&email)
            .filter(|user| user.password == credentials.password)
            .ok_or(AuthProviderError::InvalidCredentials)?;
        let user_id = user.user_id.clone();
        drop(users);

        Ok(self.open_session(&user_id, &email))
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(access_token);
        Ok(())
    }

    fn session(&self, access_token: &str) -> Result<Option<Session>, AuthProviderError> {
        let sessions = self.sessions.lock().expect("session mutex poisoned");
        Ok(sessions.get(access_token).cloned())
    }

    fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthProviderError> {
        let email = email.trim().to_lowercase();
        // Unknown addresses succeed silently so the endpoint cannot be used
        // to enumerate accounts.
        if self
            .users
            .lock()
            .expect("user mutex poisoned")
            .contains_key(&email)
        {
            let token = self.next_token("reset");
            tracing::info!(%email, %redirect_to, %token, "password reset token issued");
            self.reset_tokens
                .lock()
                .expect("reset mutex poisoned")
                .insert(token, email);
        }
        Ok(())
    }

    fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), AuthProviderError> {
        let email = self
            .reset_tokens
            .lock()
            .expect("reset mutex poisoned")
            .remove(reset_token)
            .ok_or_else(|| AuthProviderError::Provider("invalid or expired reset token".to_string()))?;

        let mut users = self.users.lock().expect("user mutex poisoned");
        match users.get_mut(&email) {
            Some(user) => {
                user.password = new_password.to_string();
                Ok(())
            }
            None => Err(AuthProviderError::Provider(
                "account no longer exists".to_string(),
            )),
        }
    }
}

/// Notifier that forwards user-facing messages to the tracing log. The web
/// client renders these as toasts; the dev server just records them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            title = %notification.title,
            description = %notification.description,
            variant = ?notification.variant,
            "user notification"
        );
    }
}

/// Shared in-memory notifier for tests and demos.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}

/// Shared in-memory audit sink for tests and demos.
#[derive(Default, Clone)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<SecurityEvent>>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.name)
            .collect()
    }
}

impl SecurityEventSink for RecordingEventSink {
    fn record(&self, event: SecurityEvent) {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
    }
}
