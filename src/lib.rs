//! Security gate and HTTP surface for the practice lending lead-intake service.
//!
//! Every write path (sign-up, sign-in, password reset, application submission)
//! runs through the [`security`] gate before a request reaches the persistence
//! or auth collaborator. The collaborators themselves are traits so the gate
//! can be exercised against in-memory fakes.

pub mod auth;
pub mod config;
pub mod error;
pub mod infra;
pub mod intake;
pub mod security;
pub mod telemetry;
