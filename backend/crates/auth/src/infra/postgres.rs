//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    session::{Session, SessionOwner},
    user::{NewUser, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, nickname::Nickname, session_id::SessionId, user_id::UserId,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    email,
    nickname,
    password_hash,
    profile_image_url,
    created_at,
    updated_at,
    deleted_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_session WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }

    async fn fetch_user(&self, filter: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE {} = $1 AND deleted_at IS NULL",
            USER_COLUMNS, filter
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn get_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.fetch_user("email", email.as_str()).await
    }

    async fn get_by_nickname(&self, nickname: &Nickname) -> AuthResult<Option<User>> {
        self.fetch_user("nickname", nickname.as_str()).await
    }

    async fn insert(&self, user: NewUser) -> AuthResult<User> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                email,
                nickname,
                password_hash,
                profile_image_url,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.nickname.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(&user.profile_image_url)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into_user(UserId::new(id)))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                nickname = $3,
                password_hash = $4,
                profile_image_url = $5,
                updated_at = $6,
                deleted_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.get())
        .bind(user.email.as_str())
        .bind(user.nickname.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(&user.profile_image_url)
        .bind(user.updated_at)
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_session (session_id, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(user_id.get())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_session(&self, session_id: SessionId) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT session_id, user_id, expires_at FROM user_session WHERE session_id = $1",
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_session(&self, session_id: SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM user_session WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_session WHERE user_id = $1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn get_user_and_session(
        &self,
        session_id: SessionId,
    ) -> AuthResult<Option<SessionOwner>> {
        let row = sqlx::query_as::<_, SessionOwnerRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.nickname,
                u.password_hash,
                u.profile_image_url,
                u.created_at,
                u.updated_at,
                u.deleted_at,
                s.expires_at AS session_expires_at
            FROM user_session s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_id = $1
              AND u.deleted_at IS NULL
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionOwnerRow::into_owner).transpose()
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    nickname: String,
    password_hash: String,
    profile_image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash).map_err(|e| {
            AuthError::Persistence(format!("user {}: stored password hash: {e}", self.id))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            nickname: Nickname::from_db(self.nickname),
            password_hash,
            profile_image_url: self.profile_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: i64,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from_uuid(self.session_id),
            user_id: UserId::new(self.user_id),
            expires_at: self.expires_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionOwnerRow {
    #[sqlx(flatten)]
    user: UserRow,
    session_expires_at: DateTime<Utc>,
}

impl SessionOwnerRow {
    fn into_owner(self) -> AuthResult<SessionOwner> {
        Ok(SessionOwner {
            user: self.user.into_user()?,
            expires_at: self.session_expires_at,
        })
    }
}
