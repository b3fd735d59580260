use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::provider::AuthProvider;
use super::service::AuthGate;
use crate::intake::repository::Notifier;
use crate::security::events::SecurityEventSink;

pub struct AuthRouterState<P, N, E> {
    pub gate: Arc<AuthGate<P, N, E>>,
}

impl<P, N, E> Clone for AuthRouterState<P, N, E> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
        }
    }
}

/// Router exposing the gated auth endpoints.
pub fn auth_router<P, N, E>(state: AuthRouterState<P, N, E>) -> Router
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    Router::new()
        .route("/api/v1/auth/signup", post(sign_up_handler::<P, N, E>))
        .route("/api/v1/auth/signin", post(sign_in_handler::<P, N, E>))
        .route("/api/v1/auth/signout", post(sign_out_handler::<P, N, E>))
        .route(
            "/api/v1/auth/password-reset",
            post(password_reset_handler::<P, N, E>),
        )
        .route(
            "/api/v1/auth/password-update",
            post(password_update_handler::<P, N, E>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignUpRequest {
    email: String,
    password: String,
    #[serde(default)]
    redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PasswordResetRequest {
    email: String,
    redirect_to: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PasswordUpdateRequest {
    reset_token: String,
    new_password: String,
}

pub(crate) async fn sign_up_handler<P, N, E>(
    State(state): State<AuthRouterState<P, N, E>>,
    axum::Json(request): axum::Json<SignUpRequest>,
) -> Response
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    match state
        .gate
        .sign_up(&request.email, &request.password, request.redirect_to.as_deref())
    {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn sign_in_handler<P, N, E>(
    State(state): State<AuthRouterState<P, N, E>>,
    axum::Json(request): axum::Json<SignInRequest>,
) -> Response
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    match state.gate.sign_in(&request.email, &request.password) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn sign_out_handler<P, N, E>(
    State(state): State<AuthRouterState<P, N, E>>,
    headers: HeaderMap,
) -> Response
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "error": "authentication required" })),
        )
            .into_response();
    };

    match state.gate.sign_out(token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn password_reset_handler<P, N, E>(
    State(state): State<AuthRouterState<P, N, E>>,
    axum::Json(request): axum::Json<PasswordResetRequest>,
) -> Response
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    match state
        .gate
        .request_password_reset(&request.email, &request.redirect_to)
    {
        Ok(()) => (
            StatusCode::ACCEPTED,
            axum::Json(json!({ "status": "accepted" })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn password_update_handler<P, N, E>(
    State(state): State<AuthRouterState<P, N, E>>,
    axum::Json(request): axum::Json<PasswordUpdateRequest>,
) -> Response
where
    P: AuthProvider + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
{
    match state
        .gate
        .update_password(&request.reset_token, &request.new_password)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}
