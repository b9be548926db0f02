//! CSRF Token Value Object
//!
//! Random value for the double-submit check. The same value travels in
//! the `csrf_token` cookie and in the `X-CSRF-Token` request header.

use std::fmt;

use platform::crypto::{constant_time_eq, random_token};

/// Random bytes behind each token (256 bits)
const CSRF_TOKEN_BYTES: usize = 32;

#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a new high-entropy token (URL-safe base64)
    pub fn generate() -> Self {
        Self(random_token(CSRF_TOKEN_BYTES))
    }

    /// Wrap a value received from the client
    ///
    /// Blank values are treated as absent. Anything else is kept byte for
    /// byte.
    pub fn from_client(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a submitted value in constant time
    pub fn matches(&self, submitted: &CsrfToken) -> bool {
        constant_time_eq(self.0.as_bytes(), submitted.0.as_bytes())
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_differ() {
        let a = CsrfToken::generate();
        let b = CsrfToken::generate();
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.as_str().len() >= 43);
    }

    #[test]
    fn test_from_client_rejects_empty() {
        assert!(CsrfToken::from_client("").is_none());
        assert!(CsrfToken::from_client("   ").is_none());
        assert!(CsrfToken::from_client("abc").is_some());
    }

    #[test]
    fn test_matches_exactly() {
        let token = CsrfToken::from_client("token-a").unwrap();
        assert!(token.matches(&CsrfToken::from_client("token-a").unwrap()));
        assert!(!token.matches(&CsrfToken::from_client("token-b").unwrap()));
        assert!(!token.matches(&CsrfToken::from_client("token-a2").unwrap()));
    }

    #[test]
    fn test_from_client_keeps_value_verbatim() {
        let padded = CsrfToken::from_client(" token-a").unwrap();
        assert_eq!(padded.as_str(), " token-a");

        let token = CsrfToken::from_client("token-a").unwrap();
        assert!(!token.matches(&padded));
    }
}
