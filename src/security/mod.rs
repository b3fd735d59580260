//! The security gate: validation, sanitization, rate limiting, and error
//! redaction applied before any write reaches a collaborator.

pub mod events;
pub mod rate_limit;
pub mod redact;
pub mod sanitize;
pub mod validation;

use validation::ValidationReport;

/// Failure surface shared by the auth gate and the intake service.
///
/// Nothing here is fatal: every variant is returned to the caller, and the
/// `Backend` variant only ever carries a message that already went through
/// [`redact::secure_message`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum GateError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("{}", .0.joined())]
    ValidationFailed(ValidationReport),
    #[error("too many attempts, please wait {retry_after_minutes} minute(s)")]
    RateLimited { retry_after_minutes: u64 },
    #[error("{user_message}")]
    Backend { user_message: String },
}
