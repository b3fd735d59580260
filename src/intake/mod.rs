//! Application intake: domain types, persistence seam, gate orchestration,
//! and the HTTP routes that expose them.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationInput, ApplicationRecord, ApplicationStatus, NewApplication,
    UserIdentity,
};
pub use repository::{
    ApplicationRepository, ListScope, Notification, NotificationVariant, Notifier, RepositoryError,
};
pub use router::{intake_router, IntakeRouterState};
pub use service::ApplicationIntakeService;
