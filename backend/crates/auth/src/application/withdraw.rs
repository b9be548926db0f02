//! Withdraw Use Case
//!
//! Soft-deletes an account and invalidates all of its sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::session_marker::SessionMarker;
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

pub struct WithdrawUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    repo: Arc<R>,
}

impl<R> WithdrawUseCase<R>
where
    R: UserRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user: &User,
        marker: &mut SessionMarker,
        now: DateTime<Utc>,
    ) -> AuthResult<()> {
        self.repo.update(&user.withdrawn(now)).await?;
        let sessions = self.repo.delete_user_sessions(user.id).await?;
        marker.clear();

        tracing::info!(user_id = %user.id, sessions_deleted = sessions, "User withdrew");
        Ok(())
    }
}
