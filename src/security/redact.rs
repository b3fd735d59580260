/// Shown when a failure carries no message at all.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";
/// Shown when a message exists but matches no known category.
pub const FALLBACK_MESSAGE: &str = "An error occurred. Please try again";

const DUPLICATE_MESSAGE: &str = "This record already exists";
const PERMISSION_MESSAGE: &str = "You do not have permission to perform this action";
const NETWORK_MESSAGE: &str = "Network connection error. Please try again";
const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again";

/// A collaborator failure reduced to the two facts redaction needs: the raw
/// message, if any, and whether the auth provider produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendFailure {
    pub message: Option<String>,
    pub from_auth_provider: bool,
}

impl BackendFailure {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            from_auth_provider: false,
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            from_auth_provider: true,
        }
    }
}

/// Map an arbitrary collaborator failure to a fixed vocabulary of user-facing
/// messages so schema and infrastructure details never leak.
///
/// Auth-provider messages pass through unredacted; they are pre-vetted as
/// safe. Total over any input, including a missing message.
pub fn secure_message(failure: &BackendFailure) -> String {
    let message = match failure.message.as_deref() {
        Some(message) if !message.is_empty() => message,
        _ => return GENERIC_MESSAGE.to_string(),
    };

    if message.contains("duplicate key") || message.contains("unique constraint") {
        return DUPLICATE_MESSAGE.to_string();
    }
    if message.contains("permission denied") || message.contains("unauthorized") {
        return PERMISSION_MESSAGE.to_string();
    }
    if message.contains("connection") || message.contains("network") {
        return NETWORK_MESSAGE.to_string();
    }
    if message.contains("timeout") {
        return TIMEOUT_MESSAGE.to_string();
    }

    if failure.from_auth_provider || message.contains("Invalid login credentials") {
        return message.to_string();
    }

    FALLBACK_MESSAGE.to_string()
}
