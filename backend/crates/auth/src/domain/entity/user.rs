//! User Entity
//!
//! A registered account. Values are replaced, never mutated in place:
//! every change goes through a method returning the next version and is
//! persisted with `UserRepository::update`.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, nickname::Nickname, user_id::UserId};

/// Profile image used when signup does not provide one
pub const DEFAULT_PROFILE_IMAGE_URL: &str = "/assets/default_profile.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub nickname: Nickname,
    pub password_hash: HashedPassword,
    pub profile_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the account is withdrawn (soft delete)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Next version of this user with a new nickname
    pub fn renamed(&self, nickname: Nickname, at: DateTime<Utc>) -> Self {
        Self {
            nickname,
            updated_at: at,
            ..self.clone()
        }
    }

    /// Next version of this user, marked as withdrawn at `at`
    pub fn withdrawn(&self, at: DateTime<Utc>) -> Self {
        Self {
            deleted_at: Some(at),
            updated_at: at,
            ..self.clone()
        }
    }
}

/// User data before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub nickname: Nickname,
    pub password_hash: HashedPassword,
    pub profile_image_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            nickname: self.nickname,
            password_hash: self.password_hash,
            profile_image_url: self.profile_image_url,
            created_at: self.created_at,
            updated_at: self.created_at,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn sample_user() -> User {
        let hash = ClearTextPassword::new("Sunflower-42!".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        NewUser {
            email: Email::parse("alice@example.com").unwrap(),
            nickname: Nickname::parse("alice").unwrap(),
            password_hash: hash,
            profile_image_url: DEFAULT_PROFILE_IMAGE_URL.to_string(),
            created_at: Utc::now(),
        }
        .into_user(UserId::new(1))
    }

    #[test]
    fn test_withdrawn_returns_new_version() {
        let user = sample_user();
        let at = user.created_at + chrono::Duration::minutes(5);
        let gone = user.withdrawn(at);

        assert!(!user.is_deleted());
        assert!(gone.is_deleted());
        assert_eq!(gone.deleted_at, Some(at));
        assert_eq!(gone.updated_at, at);
        assert_eq!(gone.id, user.id);
    }

    #[test]
    fn test_renamed_returns_new_version() {
        let user = sample_user();
        let at = user.created_at + chrono::Duration::minutes(5);
        let renamed = user.renamed(Nickname::parse("alice_2").unwrap(), at);

        assert_eq!(renamed.nickname.to_string(), "alice_2");
        assert_eq!(renamed.updated_at, at);
        assert_eq!(user.nickname.to_string(), "alice");
    }
}
