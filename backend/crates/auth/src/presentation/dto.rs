//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;

// ============================================================================
// Requests
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub nickname: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// `data` of responses carrying a user
#[derive(Debug, Clone, Serialize)]
pub struct UserData<U: Serialize> {
    pub user: U,
}

/// The signed-in user's own account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub email: String,
    pub nickname: String,
    pub profile_image_url: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.to_string(),
            nickname: user.nickname.to_string(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

/// Another user's public profile
///
/// `email` is only present when viewers look at their own profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: UserId,
    pub nickname: String,
    pub profile_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_me: bool,
}

impl ProfileResponse {
    pub fn new(user: &User, viewer: Option<&User>) -> Self {
        let is_me = viewer.is_some_and(|viewer| viewer.id == user.id);
        Self {
            user_id: user.id,
            nickname: user.nickname.to_string(),
            profile_image_url: user.profile_image_url.clone(),
            email: is_me.then(|| user.email.to_string()),
            is_me,
        }
    }
}
