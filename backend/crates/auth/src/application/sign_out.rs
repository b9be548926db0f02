//! Sign Out Use Case
//!
//! Destroys the current session.

use std::sync::Arc;

use crate::application::session_marker::SessionMarker;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Delete the session behind `marker` and clear it
    pub async fn execute(&self, marker: &mut SessionMarker) -> AuthResult<()> {
        if let Some(session_id) = marker.session_id() {
            self.session_repo.delete_session(session_id).await?;
            tracing::info!(session_id = %session_id, "User signed out");
        }
        marker.clear();
        Ok(())
    }
}
