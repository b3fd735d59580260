use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Authenticated caller identity attached to every gated write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Untrusted form payload as submitted by the applicant. The gate validates
/// and sanitizes a copy; the caller keeps the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInput {
    pub name: String,
    pub age: i64,
    pub address: String,
    pub annual_income: String,
    pub job_description: String,
}

/// Sanitized insert request handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub user_id: String,
    pub name: String,
    pub age: i64,
    pub address: String,
    pub annual_income: String,
    pub job_description: String,
    pub status: ApplicationStatus,
}

/// Persisted application with server-assigned metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub user_id: String,
    pub name: String,
    pub age: i64,
    pub address: String,
    pub annual_income: String,
    pub job_description: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a funding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Declined,
}
