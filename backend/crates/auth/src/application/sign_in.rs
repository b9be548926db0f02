//! Sign In Use Case
//!
//! Verifies credentials and opens a new session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::session_marker::SessionMarker;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub session: Session,
}

pub struct SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Authenticate by email + password
    ///
    /// Always mints a fresh session id. A session already referenced by
    /// `marker` is deleted so it cannot be reused.
    pub async fn execute(
        &self,
        input: SignInInput,
        marker: &mut SessionMarker,
        now: DateTime<Utc>,
    ) -> AppResult<SignInOutput> {
        let email = Email::parse(&input.email).map_err(|_| invalid_credentials())?;

        let user = self
            .repo
            .get_by_email(&email)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(invalid_credentials)?;

        let password = ClearTextPassword::for_verification(input.password);
        if !user.password_hash.verify(&password, self.config.pepper()) {
            tracing::warn!(user_id = %user.id, "Invalid login attempt");
            return Err(invalid_credentials());
        }

        if let Some(prior) = marker.session_id() {
            self.repo.delete_session(prior).await?;
        }

        let session = Session::issue(user.id, now, self.config.session_ttl());
        self.repo
            .create_session(session.user_id, session.session_id, session.expires_at)
            .await?;
        marker.issue(session.session_id);

        tracing::info!(
            user_id = %user.id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput { user, session })
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password").with_code("invalid_credentials")
}
