use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::domain::{ApplicationInput, UserIdentity};
use super::repository::{ApplicationRepository, Notifier};
use super::service::ApplicationIntakeService;
use crate::auth::provider::AuthProvider;
use crate::security::events::SecurityEventSink;

/// Shared state for the intake routes: the gate itself plus the auth
/// collaborator that resolves bearer tokens to sessions.
pub struct IntakeRouterState<R, N, E, P> {
    pub service: Arc<ApplicationIntakeService<R, N, E>>,
    pub provider: Arc<P>,
}

impl<R, N, E, P> Clone for IntakeRouterState<R, N, E, P> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            provider: self.provider.clone(),
        }
    }
}

/// Router exposing application submission and listing.
pub fn intake_router<R, N, E, P>(state: IntakeRouterState<R, N, E, P>) -> Router
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
    P: AuthProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<R, N, E, P>).get(list_handler::<R, N, E, P>),
        )
        .with_state(state)
}

/// Resolve the caller's identity from a bearer token, treating lookup
/// failures as anonymous so the gate's `AuthenticationRequired` path decides.
pub(crate) fn identity_from_headers<P: AuthProvider>(
    provider: &P,
    headers: &HeaderMap,
) -> Option<UserIdentity> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    match provider.session(token) {
        Ok(Some(session)) => Some(UserIdentity {
            user_id: session.user_id,
            email: session.email,
            is_admin: session.is_admin,
        }),
        Ok(None) => None,
        Err(error) => {
            tracing::warn!(%error, "session lookup failed");
            None
        }
    }
}

pub(crate) async fn submit_handler<R, N, E, P>(
    State(state): State<IntakeRouterState<R, N, E, P>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<ApplicationInput>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
    P: AuthProvider + 'static,
{
    let identity = identity_from_headers(state.provider.as_ref(), &headers);
    match state.service.submit(identity.as_ref(), input) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_handler<R, N, E, P>(
    State(state): State<IntakeRouterState<R, N, E, P>>,
    headers: HeaderMap,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
    E: SecurityEventSink + 'static,
    P: AuthProvider + 'static,
{
    let identity = identity_from_headers(state.provider.as_ref(), &headers);
    match state.service.list(identity.as_ref()) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error.into_response(),
    }
}
