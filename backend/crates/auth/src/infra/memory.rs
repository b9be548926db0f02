//! In-Memory Repository Implementation
//!
//! Process-local store with the same contract as the PostgreSQL one,
//! including soft-delete filtering and unique email/nickname among
//! active users. Used by tests and single-process development runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{
    session::{Session, SessionOwner},
    user::{NewUser, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, nickname::Nickname, session_id::SessionId, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Users {
    next_id: i64,
    rows: HashMap<UserId, User>,
}

impl Users {
    fn active(&self) -> impl Iterator<Item = &User> {
        self.rows.values().filter(|user| !user.is_deleted())
    }
}

/// Cheap to clone; clones share the same maps
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<RwLock<Users>>,
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every session expired at `now`
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> u64 {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        (before - sessions.len()) as u64
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn get_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.rows.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.active().find(|u| u.email == *email).cloned())
    }

    async fn get_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.active().find(|u| u.nickname == *nickname).cloned())
    }

    async fn insert(&self, user: NewUser) -> AuthResult<User> {
        let mut users = self.users.write().await;

        if users
            .active()
            .any(|u| u.email == user.email || u.nickname == user.nickname)
        {
            return Err(AuthError::Persistence(
                "duplicate email or nickname".to_string(),
            ));
        }

        users.next_id += 1;
        let user = user.into_user(UserId::new(users.next_id));
        users.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if let Some(row) = users.rows.get_mut(&user.id) {
            *row = user.clone();
        }
        Ok(())
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_id).or_insert(Session {
            session_id,
            user_id,
            expires_at,
        });
        Ok(())
    }

    async fn get_session(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn get_user_and_session(
        &self,
        session_id: SessionId,
    ) -> AuthResult<Option<SessionOwner>> {
        let Some(session) = self.sessions.read().await.get(&session_id).cloned() else {
            return Ok(None);
        };

        let users = self.users.read().await;
        let owner = users
            .rows
            .get(&session.user_id)
            .filter(|u| !u.is_deleted())
            .map(|user| SessionOwner {
                user: user.clone(),
                expires_at: session.expires_at,
            });

        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use platform::password::ClearTextPassword;

    fn new_user(email: &str, nickname: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            nickname: Nickname::parse(nickname).unwrap(),
            password_hash: ClearTextPassword::new("Sunflower-42!".to_string())
                .unwrap()
                .hash(None)
                .unwrap(),
            profile_image_url: "/assets/default_profile.png".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_enforces_uniqueness() {
        let repo = InMemoryAuthRepository::new();
        let a = repo.insert(new_user("a@example.com", "alice")).await.unwrap();
        let b = repo.insert(new_user("b@example.com", "bobby")).await.unwrap();
        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));

        assert!(repo.insert(new_user("a@example.com", "other")).await.is_err());
        assert!(repo.insert(new_user("c@example.com", "alice")).await.is_err());
    }

    #[tokio::test]
    async fn test_lookups_skip_deleted_users() {
        let repo = InMemoryAuthRepository::new();
        let user = repo.insert(new_user("a@example.com", "alice")).await.unwrap();
        repo.update(&user.withdrawn(Utc::now())).await.unwrap();

        assert!(repo.get_by_id(user.id).await.unwrap().is_none());
        assert!(repo.get_by_email(&user.email).await.unwrap().is_none());
        assert!(repo.get_by_nickname(&user.nickname).await.unwrap().is_none());

        // freed identifiers can be registered again
        assert!(repo.insert(new_user("a@example.com", "alice")).await.is_ok());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let repo = InMemoryAuthRepository::new();
        let user = repo.insert(new_user("a@example.com", "alice")).await.unwrap();
        let now = Utc::now();
        let session = Session::issue(user.id, now, Duration::hours(24));

        repo.create_session(user.id, session.session_id, session.expires_at)
            .await
            .unwrap();
        // idempotent
        repo.create_session(user.id, session.session_id, now)
            .await
            .unwrap();
        assert_eq!(
            repo.get_session(session.session_id).await.unwrap(),
            Some(session.clone())
        );

        let owner = repo
            .get_user_and_session(session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.user.id, user.id);
        assert_eq!(owner.expires_at, session.expires_at);

        repo.delete_session(session.session_id).await.unwrap();
        repo.delete_session(session.session_id).await.unwrap();
        assert!(repo.get_session(session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_sessions_and_cleanup() {
        let repo = InMemoryAuthRepository::new();
        let user = repo.insert(new_user("a@example.com", "alice")).await.unwrap();
        let other = repo.insert(new_user("b@example.com", "bobby")).await.unwrap();
        let now = Utc::now();

        for _ in 0..2 {
            let s = Session::issue(user.id, now, Duration::hours(1));
            repo.create_session(s.user_id, s.session_id, s.expires_at).await.unwrap();
        }
        let kept = Session::issue(other.id, now, Duration::hours(1));
        repo.create_session(kept.user_id, kept.session_id, kept.expires_at)
            .await
            .unwrap();

        assert_eq!(repo.delete_user_sessions(user.id).await.unwrap(), 2);
        assert!(repo.get_session(kept.session_id).await.unwrap().is_some());

        assert_eq!(repo.cleanup_expired(now + Duration::hours(1)).await, 1);
        assert!(repo.get_session(kept.session_id).await.unwrap().is_none());
    }
}
