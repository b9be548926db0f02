//! Auth Middleware
//!
//! Pipeline, outermost first: `request_context` -> `csrf_guard` ->
//! `require_auth` / `optional_auth` -> handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::stamp_error_response;
use platform::cookie::{append_set_cookie, extract_cookie};

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfGuard;
use crate::domain::clock::Clock;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::csrf_token::CsrfToken;
use crate::presentation::extract::{
    AuthRejection, CurrentUser, MaybeUser, RequestTime, authenticate_optional,
    authenticate_strict, request_time,
};
use crate::presentation::handlers::AuthAppState;

/// Capture the request timestamp once, before anything else runs
///
/// Error envelopes produced further in are restamped with the same instant.
pub async fn request_context(
    State(clock): State<Arc<dyn Clock>>,
    mut req: Request,
    next: Next,
) -> Response {
    let at = clock.now();
    req.extensions_mut().insert(RequestTime(at));
    stamp_error_response(next.run(req).await, at)
}

/// Double-submit CSRF check and token issuance
///
/// A request arriving without the CSRF cookie gets a fresh token on its
/// response, whatever the outcome (403 included). Runs before
/// authentication, so a forged request is rejected with 403 even when it
/// also lacks a session.
pub async fn csrf_guard(
    State(config): State<Arc<AuthConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let cookie = extract_cookie(req.headers(), &config.csrf_cookie_name)
        .and_then(|value| CsrfToken::from_client(&value));
    let header = req
        .headers()
        .get(config.csrf_header_name.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(CsrfToken::from_client);

    let issued = cookie.is_none().then(CsrfToken::generate);

    let verdict = CsrfGuard::new(&config).verify(
        req.method(),
        req.uri().path(),
        cookie.as_ref(),
        header.as_ref(),
    );

    let mut response = match verdict {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    };

    if let Some(token) = issued {
        append_set_cookie(
            response.headers_mut(),
            &config.csrf_cookie().build_set_cookie(token.as_str()),
        );
    }

    response
}

/// Reject unauthenticated requests; store `CurrentUser` for handlers
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let now = request_time(req.extensions(), &state);
    let user = authenticate_strict(&state, req.headers(), now).await?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Resolve the session if there is one; store `MaybeUser` for handlers
pub async fn optional_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let now = request_time(req.extensions(), &state);
    match authenticate_optional(&state, req.headers(), now).await {
        Ok(user) => {
            req.extensions_mut().insert(MaybeUser(user));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
