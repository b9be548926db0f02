//! Email Value Object
//!
//! Login identifier of a user. Stored lowercased so lookups and the
//! uniqueness constraint ignore case.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

/// Maximum email length (RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local-part length (RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalize an address submitted by a client
    pub fn parse(raw: &str) -> AppResult<Self> {
        let email = raw.trim().to_lowercase();

        if email.is_empty() {
            return Err(invalid("Email cannot be empty"));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(invalid(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }
        if !has_valid_shape(&email) {
            return Err(invalid("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Rehydrate from a stored value
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> AppError {
    AppError::bad_request(message).with_code("invalid_email")
}

fn has_valid_shape(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || domain.contains('@') {
        return false;
    }

    if !domain.contains('.')
        || domain.starts_with(['.', '-'])
        || domain.ends_with(['.', '-'])
        || domain.contains("..")
    {
        return false;
    }

    domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
