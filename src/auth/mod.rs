//! Auth gate: credential shape checks and per-email rate limiting in front of
//! the hosted auth collaborator.

pub mod provider;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use provider::{AuthProvider, AuthProviderError, Credentials, Session, SignUpOutcome};
pub use router::{auth_router, AuthRouterState};
pub use service::AuthGate;
