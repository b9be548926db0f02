//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{csrf_guard, optional_auth, request_context, require_auth};

/// Routes owned by the auth crate, without the request pipeline
///
/// Other feature routers are merged into this one before
/// [`with_pipeline`] so they sit behind the same CSRF guard.
pub fn auth_routes<R>(state: &AuthAppState<R>) -> Router<AuthAppState<R>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let protected: Router<AuthAppState<R>> = Router::new()
        .route("/v1/auth/me", get(handlers::me))
        .route(
            "/v1/users/me",
            get(handlers::me)
                .patch(handlers::update_profile::<R>)
                .delete(handlers::withdraw::<R>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth::<R>));

    let profiles: Router<AuthAppState<R>> = Router::new()
        .route("/v1/users/{nickname}", get(handlers::user_profile::<R>))
        .route_layer(from_fn_with_state(state.clone(), optional_auth::<R>));

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/v1/auth/session",
            post(handlers::login::<R>).delete(handlers::logout::<R>),
        )
        .route("/v1/users", post(handlers::sign_up::<R>))
        .merge(protected)
        .merge(profiles)
}

/// Wrap routes in the request pipeline and bind the state
///
/// Outermost first: request context, then the CSRF guard.
pub fn with_pipeline<R>(routes: Router<AuthAppState<R>>, state: AuthAppState<R>) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    routes
        .layer(from_fn_with_state(state.config.clone(), csrf_guard))
        .layer(from_fn_with_state(state.clock.clone(), request_context))
        .with_state(state)
}

/// Auth routes behind the full pipeline
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    with_pipeline(auth_routes(&state), state)
}
