use crate::config::ConfigError;
use crate::security::GateError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level failures raised while bootstrapping or running the service.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            GateError::AuthenticationRequired => {
                let body = Json(json!({ "error": "authentication required" }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            GateError::ValidationFailed(report) => {
                let body = Json(json!({
                    "error": report.joined(),
                    "errors": report.errors(),
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            GateError::RateLimited {
                retry_after_minutes,
            } => {
                let body = Json(json!({
                    "error": format!(
                        "Too many attempts, please wait {retry_after_minutes} minute(s)"
                    ),
                    "retry_after_minutes": retry_after_minutes,
                }));
                (StatusCode::TOO_MANY_REQUESTS, body).into_response()
            }
            GateError::Backend { user_message } => {
                let body = Json(json!({ "error": user_message }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
        }
    }
}
