//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{DEFAULT_PROFILE_IMAGE_URL, NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, nickname::Nickname};

/// Accepted profile image extensions
const PROFILE_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}

pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignUpInput, now: DateTime<Utc>) -> AppResult<User> {
        let email = Email::parse(&input.email)?;
        let nickname = Nickname::parse(&input.nickname)?;
        let password = ClearTextPassword::new(input.password).map_err(|e| {
            AppError::bad_request(e.to_string()).with_code("invalid_password_format")
        })?;
        let profile_image_url = profile_image_url(input.profile_image_url)?;

        if self.user_repo.get_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered")
                .with_code("email_already_exists"));
        }
        if self.user_repo.get_by_nickname(&nickname).await?.is_some() {
            return Err(AppError::conflict("Nickname is already taken")
                .with_code("nickname_already_exists"));
        }

        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))?;

        let user = self
            .user_repo
            .insert(NewUser {
                email,
                nickname,
                password_hash,
                profile_image_url,
                created_at: now,
            })
            .await?;

        tracing::info!(user_id = %user.id, nickname = %user.nickname, "User signed up");

        Ok(user)
    }
}

fn profile_image_url(raw: Option<String>) -> AppResult<String> {
    let Some(url) = raw.filter(|url| !url.trim().is_empty()) else {
        return Ok(DEFAULT_PROFILE_IMAGE_URL.to_string());
    };

    let lower = url.to_ascii_lowercase();
    if PROFILE_IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(url)
    } else {
        Err(AppError::bad_request("Profile image must be a .jpg, .jpeg or .png file")
            .with_code("invalid_image_format"))
    }
}
