use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intake::domain::ApplicationInput;

/// `local-part@domain.tld`: a non-whitespace, non-`@` run on each side of the
/// `@`, and at least one `.` in the domain.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Field bounds mirroring the persistence schema the gate writes into.
///
/// Passed into the validators rather than hard-coded so the limits can be
/// versioned alongside the rest of [`crate::config::SecurityConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    pub email_max_length: usize,
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub name_min_length: usize,
    pub name_max_length: usize,
    pub age_min: i64,
    pub age_max: i64,
    pub address_min_length: usize,
    pub address_max_length: usize,
    pub annual_income_max_length: usize,
    pub job_description_min_length: usize,
    pub job_description_max_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            email_max_length: 254,
            password_min_length: 8,
            password_max_length: 128,
            name_min_length: 2,
            name_max_length: 100,
            age_min: 18,
            age_max: 120,
            address_min_length: 10,
            address_max_length: 500,
            annual_income_max_length: 50,
            job_description_min_length: 10,
            job_description_max_length: 1000,
        }
    }
}

/// Shape failure for a single credential field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialViolation {
    #[error("Email is required")]
    EmailRequired,
    #[error("Email address too long")]
    EmailTooLong,
    #[error("Invalid email format")]
    EmailFormat,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("Password too long")]
    PasswordTooLong,
    #[error("Password must contain at least one letter and one number")]
    PasswordComposition,
}

/// Check shape, length, and format of an email address.
pub fn validate_email(raw: &str, limits: &ValidationLimits) -> Result<(), CredentialViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CredentialViolation::EmailRequired);
    }
    if trimmed.chars().count() > limits.email_max_length {
        return Err(CredentialViolation::EmailTooLong);
    }
    if !EMAIL_SHAPE.is_match(trimmed) {
        return Err(CredentialViolation::EmailFormat);
    }
    Ok(())
}

/// Check password length bounds and letter/digit composition.
pub fn validate_password(raw: &str, limits: &ValidationLimits) -> Result<(), CredentialViolation> {
    if raw.is_empty() {
        return Err(CredentialViolation::PasswordRequired);
    }
    let length = raw.chars().count();
    if length < limits.password_min_length {
        return Err(CredentialViolation::PasswordTooShort {
            min: limits.password_min_length,
        });
    }
    if length > limits.password_max_length {
        return Err(CredentialViolation::PasswordTooLong);
    }
    let has_letter = raw.chars().any(|c| c.is_alphabetic());
    let has_digit = raw.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(CredentialViolation::PasswordComposition);
    }
    Ok(())
}

/// Ordered accumulation of every failing-field message from one validation
/// pass. Callers join the list for display instead of stopping at the first
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn joined(&self) -> String {
        self.errors.join(", ")
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Validate every application field, accumulating all failures in field order.
pub fn validate_application(
    input: &ApplicationInput,
    limits: &ValidationLimits,
) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();

    let name = input.name.trim();
    if name.is_empty() {
        report.push("Name is required");
    } else if name.chars().count() < limits.name_min_length {
        report.push(format!(
            "Name must be at least {} characters",
            limits.name_min_length
        ));
    } else if name.chars().count() > limits.name_max_length {
        report.push("Name too long");
    }

    if input.age < limits.age_min || input.age > limits.age_max {
        report.push(format!(
            "Age must be between {} and {}",
            limits.age_min, limits.age_max
        ));
    }

    let address = input.address.trim();
    if address.is_empty() {
        report.push("Address is required");
    } else if address.chars().count() < limits.address_min_length {
        report.push("Please provide a complete address");
    } else if address.chars().count() > limits.address_max_length {
        report.push("Address too long");
    }

    let income = input.annual_income.trim();
    if income.is_empty() {
        report.push("Annual income is required");
    } else if income.chars().count() > limits.annual_income_max_length {
        report.push("Annual income format too long");
    }

    let job = input.job_description.trim();
    if job.is_empty() {
        report.push("Job description is required");
    } else if job.chars().count() < limits.job_description_min_length {
        report.push("Please provide a more detailed job description");
    } else if job.chars().count() > limits.job_description_max_length {
        report.push("Job description too long");
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}
