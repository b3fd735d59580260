use serde::{Deserialize, Serialize};

use crate::security::redact::BackendFailure;

/// Email/password pair forwarded to the hosted auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Session returned by the auth collaborator once credentials check out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Result of a sign-up request. The provider may withhold a session until the
/// address is confirmed via the emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpOutcome {
    pub user_id: String,
    pub session: Option<Session>,
    pub requires_email_confirmation: bool,
}

/// Structured failure from the auth collaborator. Display output is the
/// provider's own message, which the redactor treats as pre-vetted.
#[derive(Debug, thiserror::Error)]
pub enum AuthProviderError {
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error("User already registered")]
    AlreadyRegistered,
    #[error("{0}")]
    Provider(String),
}

impl From<&AuthProviderError> for BackendFailure {
    fn from(error: &AuthProviderError) -> Self {
        BackendFailure::auth(error.to_string())
    }
}

/// Hosted auth collaborator: sign-up, sign-in, session lookup, and the
/// token-based password-reset pair.
pub trait AuthProvider: Send + Sync {
    fn sign_up(
        &self,
        credentials: &Credentials,
        redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, AuthProviderError>;

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthProviderError>;

    fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError>;

    /// Resolve a bearer token to its session, if one is active.
    fn session(&self, access_token: &str) -> Result<Option<Session>, AuthProviderError>;

    fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthProviderError>;

    /// Set a new password using the reset token embedded in the emailed URL.
    fn update_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), AuthProviderError>;
}
