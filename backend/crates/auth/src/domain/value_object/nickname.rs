//! Nickname Value Object
//!
//! Public display handle. 3-20 characters of ASCII letters, digits or `_`.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

const NICKNAME_MIN_LENGTH: usize = 3;
const NICKNAME_MAX_LENGTH: usize = 20;

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let len = raw.len();
        let allowed = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !(NICKNAME_MIN_LENGTH..=NICKNAME_MAX_LENGTH).contains(&len) || !allowed {
            return Err(AppError::bad_request(format!(
                "Nickname must be {}-{} letters, digits or underscores",
                NICKNAME_MIN_LENGTH, NICKNAME_MAX_LENGTH
            ))
            .with_code("invalid_nickname_format"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn from_db(nickname: impl Into<String>) -> Self {
        Self(nickname.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_valid() {
        assert!(Nickname::parse("abc").is_ok());
        assert!(Nickname::parse("snake_case_42").is_ok());
        assert!(Nickname::parse(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn test_nickname_invalid() {
        for raw in ["ab", "has space", "dash-ed", "한글닉네임", ""] {
            let err = Nickname::parse(raw).unwrap_err();
            assert_eq!(err.code(), "invalid_nickname_format", "{raw}");
        }
        assert!(Nickname::parse(&"a".repeat(21)).is_err());
    }
}
