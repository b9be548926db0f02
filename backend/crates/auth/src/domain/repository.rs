//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//!
//! Every user lookup skips soft-deleted rows (`deleted_at` set), including
//! the joined session lookup.

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    session::{Session, SessionOwner},
    user::{NewUser, User},
};
use crate::domain::value_object::{
    email::Email, nickname::Nickname, session_id::SessionId, user_id::UserId,
};
use crate::error::AuthResult;

/// User directory
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn get_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn get_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn get_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>>;

    /// Store a new user and return it with its assigned id
    async fn insert(&self, user: NewUser) -> AuthResult<User>;

    /// Replace the stored version of `user`
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Session store
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a session row. Inserting an existing id is a no-op.
    async fn create_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    async fn get_session(&self, session_id: SessionId) -> AuthResult<Option<Session>>;

    /// Delete a session row. Deleting a missing id is a no-op.
    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()>;

    /// Delete every session of `user_id`, returning how many were removed
    async fn delete_user_sessions(&self, user_id: UserId) -> AuthResult<u64>;

    /// Session joined with its (non-deleted) owner in a single lookup
    async fn get_user_and_session(&self, session_id: SessionId)
    -> AuthResult<Option<SessionOwner>>;
}
