//! Update Profile Use Case
//!
//! Changes the signed-in user's nickname.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::nickname::Nickname;

/// Update profile input
pub struct UpdateProfileInput {
    pub nickname: Option<String>,
}

pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        user: &User,
        input: UpdateProfileInput,
        now: DateTime<Utc>,
    ) -> AppResult<User> {
        let Some(raw) = input.nickname.filter(|n| !n.is_empty()) else {
            return Err(
                AppError::bad_request("No changes provided").with_code("no_changes_provided")
            );
        };

        let nickname = Nickname::parse(&raw).map_err(|e| {
            AppError::unprocessable(e.message().to_string()).with_code("invalid_nickname_format")
        })?;

        let taken = self
            .user_repo
            .get_by_nickname(&nickname)
            .await?
            .is_some_and(|existing| existing.id != user.id);
        if taken {
            return Err(AppError::conflict("Nickname is already taken")
                .with_code("nickname_already_exists"));
        }

        let updated = user.renamed(nickname, now);
        self.user_repo.update(&updated).await?;

        tracing::info!(user_id = %updated.id, nickname = %updated.nickname, "User updated profile");

        Ok(updated)
    }
}
