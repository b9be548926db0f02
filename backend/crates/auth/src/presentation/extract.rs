//! Request Extractors
//!
//! `CurrentUser` and `MaybeUser` reuse a value stored by `require_auth` /
//! `optional_auth` when present and resolve the session themselves
//! otherwise.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::application::session_marker::SessionMarker;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;
use crate::presentation::session_cookie::{read_marker, write_marker};

/// Instant captured when the request entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTime(pub DateTime<Utc>);

impl<S> FromRequestParts<S> for RequestTime
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestTime>()
            .copied()
            .unwrap_or_else(|| RequestTime(Utc::now())))
    }
}

/// JSON request body whose rejections render as the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Authenticated user (strict)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// User if the request carries a valid session
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Failed strict authentication, with the marker-clearing cookie if any
#[derive(Debug)]
pub struct AuthRejection {
    error: AuthError,
    headers: HeaderMap,
}

impl AuthRejection {
    fn new(error: AuthError, config: &AuthConfig, marker: &SessionMarker) -> Self {
        let mut headers = HeaderMap::new();
        write_marker(&mut headers, config, marker);
        Self { error, headers }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.headers, self.error).into_response()
    }
}

/// Request time from the context, or the state clock when not captured
pub(crate) fn request_time<R>(extensions: &Extensions, state: &AuthAppState<R>) -> DateTime<Utc>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    extensions
        .get::<RequestTime>()
        .map(|t| t.0)
        .unwrap_or_else(|| state.clock.now())
}

pub(crate) async fn authenticate_strict<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<User, AuthRejection>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut marker = read_marker(headers, &state.config);
    let result = AuthenticateUseCase::new(state.repo.clone())
        .resolve_strict(&mut marker, now)
        .await;

    result.map_err(|error| AuthRejection::new(error, &state.config, &marker))
}

pub(crate) async fn authenticate_optional<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<Option<User>, AuthError>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let marker = read_marker(headers, &state.config);
    AuthenticateUseCase::new(state.repo.clone())
        .resolve_optional(&marker, now)
        .await
}

impl<R> FromRequestParts<AuthAppState<R>> for CurrentUser
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let now = request_time(&parts.extensions, state);
        let user = authenticate_strict(state, &parts.headers, now).await?;
        parts.extensions.insert(CurrentUser(user.clone()));
        Ok(CurrentUser(user))
    }
}

impl<R> FromRequestParts<AuthAppState<R>> for MaybeUser
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<MaybeUser>() {
            return Ok(user.clone());
        }

        let now = request_time(&parts.extensions, state);
        let user = authenticate_optional(state, &parts.headers, now).await?;
        Ok(MaybeUser(user))
    }
}
