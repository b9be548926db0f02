//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::{AppError, AppResult};
use kernel::response::ApiResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase, UpdateProfileInput,
    UpdateProfileUseCase, WithdrawUseCase,
};
use crate::domain::clock::Clock;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::nickname::Nickname;
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, ProfileResponse, SignUpRequest, UpdateProfileRequest, UserData, UserResponse,
};
use crate::presentation::extract::{CurrentUser, JsonBody, MaybeUser, RequestTime};
use crate::presentation::session_cookie::{read_marker, write_marker};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub clock: Arc<dyn Clock>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            clock,
        }
    }
}

fn envelope<T: serde::Serialize>(
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    data: T,
    now: RequestTime,
) -> Response {
    (status, Json(ApiResponse::new(code, message, data, now.0))).into_response()
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
///
/// Also the usual first request of a browser session, which receives the
/// CSRF cookie.
pub async fn health(now: RequestTime) -> Response {
    envelope(
        StatusCode::OK,
        "HEALTH_OK",
        "Service is running",
        serde_json::json!({ "status": "ok" }),
        now,
    )
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /v1/users
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> AppResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        email: req.email,
        password: req.password,
        nickname: req.nickname,
        profile_image_url: req.profile_image_url,
    };

    let user = use_case.execute(input, now.0).await?;

    Ok(envelope(
        StatusCode::CREATED,
        "SIGNUP_SUCCESS",
        "User created",
        UserData {
            user: UserResponse::from(&user),
        },
        now,
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /v1/auth/session
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    headers: HeaderMap,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut marker = read_marker(&headers, &state.config);
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input, &mut marker, now.0).await?;

    let mut response = envelope(
        StatusCode::OK,
        "LOGIN_SUCCESS",
        "Logged in",
        UserData {
            user: UserResponse::from(&output.user),
        },
        now,
    );
    write_marker(response.headers_mut(), &state.config, &marker);
    Ok(response)
}

/// DELETE /v1/auth/session
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    _user: CurrentUser,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut marker = read_marker(&headers, &state.config);
    SignOutUseCase::new(state.repo.clone())
        .execute(&mut marker)
        .await?;

    let mut response = envelope(
        StatusCode::OK,
        "LOGOUT_SUCCESS",
        "Logged out",
        serde_json::json!({}),
        now,
    );
    write_marker(response.headers_mut(), &state.config, &marker);
    Ok(response)
}

// ============================================================================
// Current user
// ============================================================================

/// GET /v1/auth/me, GET /v1/users/me
pub async fn me(CurrentUser(user): CurrentUser, now: RequestTime) -> Response {
    envelope(
        StatusCode::OK,
        "AUTH_SUCCESS",
        "Currently logged in",
        UserData {
            user: UserResponse::from(&user),
        },
        now,
    )
}

/// PATCH /v1/users/me
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    CurrentUser(user): CurrentUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> AppResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let input = UpdateProfileInput {
        nickname: req.nickname,
    };
    let updated = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&user, input, now.0)
        .await?;

    Ok(envelope(
        StatusCode::OK,
        "UPDATE_SUCCESS",
        "Profile updated",
        UserData {
            user: UserResponse::from(&updated),
        },
        now,
    ))
}

/// DELETE /v1/users/me
pub async fn withdraw<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut marker = read_marker(&headers, &state.config);
    WithdrawUseCase::new(state.repo.clone())
        .execute(&user, &mut marker, now.0)
        .await?;

    let mut response = envelope(
        StatusCode::OK,
        "WITHDRAW_SUCCESS",
        "Account withdrawn",
        serde_json::json!({}),
        now,
    );
    write_marker(response.headers_mut(), &state.config, &marker);
    Ok(response)
}

// ============================================================================
// Public profile
// ============================================================================

/// GET /v1/users/{nickname}
pub async fn user_profile<R>(
    State(state): State<AuthAppState<R>>,
    now: RequestTime,
    MaybeUser(viewer): MaybeUser,
    Path(nickname): Path<String>,
) -> AppResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let nickname = Nickname::parse(&nickname)?;
    let user = state
        .repo
        .get_by_nickname(&nickname)
        .await?
        .ok_or_else(|| AppError::not_found("User not found").with_code("user_not_found"))?;

    Ok(envelope(
        StatusCode::OK,
        "USER_FOUND",
        "User found",
        UserData {
            user: ProfileResponse::new(&user, viewer.as_ref()),
        },
        now,
    ))
}
