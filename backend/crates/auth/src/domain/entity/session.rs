//! Session Entity
//!
//! Server-side login session. The row is the source of truth; the client
//! only holds a signed reference to `session_id`.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entity::user::User;
use crate::domain::value_object::{session_id::SessionId, user_id::UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// New session for `user_id`, valid for `ttl` from `now`
    pub fn issue(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            session_id: SessionId::generate(),
            user_id,
            expires_at: now + ttl,
        }
    }

    /// A session is never valid at or after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }
}

/// Result of the joined session + user lookup
#[derive(Debug, Clone)]
pub struct SessionOwner {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl SessionOwner {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }
}

fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}
