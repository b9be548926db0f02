//! Authenticate Use Case
//!
//! Resolves the user behind a session marker.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::session_marker::SessionMarker;
use crate::domain::entity::user::User;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> AuthenticateUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Resolve the current user or fail
    ///
    /// Clears the marker when the cookie was forged or the session is not
    /// usable. Expired rows are deleted before failing.
    pub async fn resolve_strict(
        &self,
        marker: &mut SessionMarker,
        now: DateTime<Utc>,
    ) -> AuthResult<User> {
        let Some(session_id) = marker.session_id() else {
            if marker.is_rejected() {
                marker.clear();
            }
            return Err(AuthError::Unauthenticated);
        };

        let Some(owner) = self.session_repo.get_user_and_session(session_id).await? else {
            marker.clear();
            return Err(AuthError::Unauthenticated);
        };

        if owner.is_expired_at(now) {
            self.session_repo.delete_session(session_id).await?;
            marker.clear();
            tracing::info!(
                user_id = %owner.user.id,
                session_id = %session_id,
                "Session expired"
            );
            return Err(AuthError::SessionExpired);
        }

        if owner.user.is_deleted() {
            marker.clear();
            return Err(AuthError::Unauthenticated);
        }

        Ok(owner.user)
    }

    /// Resolve the current user if there is one
    ///
    /// Authentication failures read as `None` and nothing is deleted or
    /// cleared. Store failures still propagate.
    pub async fn resolve_optional(
        &self,
        marker: &SessionMarker,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let Some(session_id) = marker.session_id() else {
            return Ok(None);
        };

        let user = self
            .session_repo
            .get_user_and_session(session_id)
            .await?
            .filter(|owner| !owner.is_expired_at(now) && !owner.user.is_deleted())
            .map(|owner| owner.user);

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Duration;
    use platform::password::ClearTextPassword;

    use super::*;
    use crate::application::session_marker::MarkerChange;
    use crate::domain::entity::session::{Session, SessionOwner};
    use crate::domain::entity::user::NewUser;
    use crate::domain::value_object::{
        email::Email, nickname::Nickname, session_id::SessionId, user_id::UserId,
    };

    /// Store returning a fixed joined row, recording deletions
    struct StubStore {
        owner: Option<SessionOwner>,
        deleted: Mutex<Vec<SessionId>>,
    }

    impl StubStore {
        fn new(owner: Option<SessionOwner>) -> Self {
            Self {
                owner,
                deleted: Mutex::new(Vec::new()),
            }
        }

        fn deleted(&self) -> Vec<SessionId> {
            self.deleted.lock().unwrap().clone()
        }
    }

    impl SessionRepository for StubStore {
        async fn create_session(
            &self,
            _user_id: UserId,
            _session_id: SessionId,
            _expires_at: DateTime<Utc>,
        ) -> AuthResult<()> {
            Ok(())
        }

        async fn get_session(&self, _session_id: SessionId) -> AuthResult<Option<Session>> {
            Ok(None)
        }

        async fn delete_session(&self, session_id: SessionId) -> AuthResult<()> {
            self.deleted.lock().unwrap().push(session_id);
            Ok(())
        }

        async fn delete_user_sessions(&self, _user_id: UserId) -> AuthResult<u64> {
            Ok(0)
        }

        async fn get_user_and_session(
            &self,
            _session_id: SessionId,
        ) -> AuthResult<Option<SessionOwner>> {
            Ok(self.owner.clone())
        }
    }

    struct FailingStore;

    impl SessionRepository for FailingStore {
        async fn create_session(
            &self,
            _user_id: UserId,
            _session_id: SessionId,
            _expires_at: DateTime<Utc>,
        ) -> AuthResult<()> {
            Err(AuthError::Persistence("down".into()))
        }

        async fn get_session(&self, _session_id: SessionId) -> AuthResult<Option<Session>> {
            Err(AuthError::Persistence("down".into()))
        }

        async fn delete_session(&self, _session_id: SessionId) -> AuthResult<()> {
            Err(AuthError::Persistence("down".into()))
        }

        async fn delete_user_sessions(&self, _user_id: UserId) -> AuthResult<u64> {
            Err(AuthError::Persistence("down".into()))
        }

        async fn get_user_and_session(
            &self,
            _session_id: SessionId,
        ) -> AuthResult<Option<SessionOwner>> {
            Err(AuthError::Persistence("down".into()))
        }
    }

    fn user(now: DateTime<Utc>) -> User {
        NewUser {
            email: Email::parse("alice@example.com").unwrap(),
            nickname: Nickname::parse("alice").unwrap(),
            password_hash: ClearTextPassword::new("Sunflower-42!".to_string())
                .unwrap()
                .hash(None)
                .unwrap(),
            profile_image_url: "/assets/default_profile.png".to_string(),
            created_at: now,
        }
        .into_user(UserId::new(1))
    }

    fn owner(user: User, expires_at: DateTime<Utc>) -> Option<SessionOwner> {
        Some(SessionOwner { user, expires_at })
    }

    #[tokio::test]
    async fn test_strict_without_session_id() {
        let store = Arc::new(StubStore::new(None));
        let mut marker = SessionMarker::incoming(None);

        let err = AuthenticateUseCase::new(store)
            .resolve_strict(&mut marker, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
        assert_eq!(marker.change(), MarkerChange::Unchanged);
    }

    #[tokio::test]
    async fn test_strict_rejected_cookie_clears_marker() {
        let store = Arc::new(StubStore::new(None));
        let mut marker = SessionMarker::rejected();

        let err = AuthenticateUseCase::new(store.clone())
            .resolve_strict(&mut marker, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
        assert_eq!(marker.change(), MarkerChange::Cleared);
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_strict_unknown_session_clears_marker() {
        let store = Arc::new(StubStore::new(None));
        let mut marker = SessionMarker::incoming(Some(SessionId::generate()));

        let err = AuthenticateUseCase::new(store.clone())
            .resolve_strict(&mut marker, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
        assert_eq!(marker.change(), MarkerChange::Cleared);
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_strict_expired_deletes_row_and_clears_marker() {
        let now = Utc::now();
        let id = SessionId::generate();
        let store = Arc::new(StubStore::new(owner(user(now), now)));
        let mut marker = SessionMarker::incoming(Some(id));

        let err = AuthenticateUseCase::new(store.clone())
            .resolve_strict(&mut marker, now)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::SessionExpired));
        assert_eq!(store.deleted(), vec![id]);
        assert_eq!(marker.change(), MarkerChange::Cleared);
    }

    #[tokio::test]
    async fn test_strict_rechecks_deleted_owner() {
        let now = Utc::now();
        let gone = user(now).withdrawn(now);
        let store = Arc::new(StubStore::new(owner(gone, now + Duration::hours(1))));
        let mut marker = SessionMarker::incoming(Some(SessionId::generate()));

        let err = AuthenticateUseCase::new(store.clone())
            .resolve_strict(&mut marker, now)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
        assert_eq!(marker.change(), MarkerChange::Cleared);
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_strict_valid_session() {
        let now = Utc::now();
        let store = Arc::new(StubStore::new(owner(user(now), now + Duration::hours(24))));
        let mut marker = SessionMarker::incoming(Some(SessionId::generate()));

        let resolved = AuthenticateUseCase::new(store)
            .resolve_strict(&mut marker, now)
            .await
            .unwrap();

        assert_eq!(resolved.id, UserId::new(1));
        assert_eq!(marker.change(), MarkerChange::Unchanged);
    }

    #[tokio::test]
    async fn test_optional_has_no_side_effects() {
        let now = Utc::now();
        let id = SessionId::generate();
        let marker = SessionMarker::incoming(Some(id));

        let expired = Arc::new(StubStore::new(owner(user(now), now)));
        let resolved = AuthenticateUseCase::new(expired.clone())
            .resolve_optional(&marker, now)
            .await
            .unwrap();
        assert!(resolved.is_none());
        assert!(expired.deleted().is_empty());

        let gone = Arc::new(StubStore::new(owner(
            user(now).withdrawn(now),
            now + Duration::hours(1),
        )));
        let resolved = AuthenticateUseCase::new(gone)
            .resolve_optional(&marker, now)
            .await
            .unwrap();
        assert!(resolved.is_none());

        let valid = Arc::new(StubStore::new(owner(user(now), now + Duration::hours(1))));
        let resolved = AuthenticateUseCase::new(valid)
            .resolve_optional(&marker, now)
            .await
            .unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(UserId::new(1)));

        assert_eq!(marker.change(), MarkerChange::Unchanged);
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let marker = SessionMarker::incoming(Some(SessionId::generate()));
        let mut strict_marker = marker.clone();
        let use_case = AuthenticateUseCase::new(Arc::new(FailingStore));

        assert!(matches!(
            use_case.resolve_strict(&mut strict_marker, Utc::now()).await,
            Err(AuthError::Persistence(_))
        ));
        assert!(matches!(
            use_case.resolve_optional(&marker, Utc::now()).await,
            Err(AuthError::Persistence(_))
        ));
    }
}
