//! CSRF Guard
//!
//! Double-submit verification: on mutating requests the token in the
//! CSRF cookie must be echoed byte-for-byte in the CSRF header.

use http::Method;

use crate::application::config::AuthConfig;
use crate::domain::value_object::csrf_token::CsrfToken;
use crate::error::{AuthError, AuthResult};

pub struct CsrfGuard<'a> {
    config: &'a AuthConfig,
}

impl<'a> CsrfGuard<'a> {
    pub fn new(config: &'a AuthConfig) -> Self {
        Self { config }
    }

    /// Whether a request must pass the double-submit check
    pub fn requires_check(&self, method: &Method, path: &str) -> bool {
        is_mutating(method) && !self.config.is_csrf_exempt(method, path)
    }

    pub fn verify(
        &self,
        method: &Method,
        path: &str,
        cookie: Option<&CsrfToken>,
        header: Option<&CsrfToken>,
    ) -> AuthResult<()> {
        if !self.requires_check(method, path) {
            return Ok(());
        }

        match (cookie, header) {
            (Some(cookie), Some(header)) if cookie.matches(header) => Ok(()),
            _ => {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    has_cookie = cookie.is_some(),
                    has_header = header.is_some(),
                    "Rejected request failing CSRF check"
                );
                Err(AuthError::CsrfValidationFailed)
            }
        }
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> CsrfToken {
        CsrfToken::from_client(value).unwrap()
    }

    #[test]
    fn test_safe_methods_skip_check() {
        let config = AuthConfig::default();
        let guard = CsrfGuard::new(&config);
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(guard.verify(&method, "/v1/posts/1/likes", None, None).is_ok());
        }
    }

    #[test]
    fn test_mutating_requires_matching_pair() {
        let config = AuthConfig::default();
        let guard = CsrfGuard::new(&config);
        let path = "/v1/posts/1/likes";

        assert!(matches!(
            guard.verify(&Method::POST, path, None, None),
            Err(AuthError::CsrfValidationFailed)
        ));
        assert!(matches!(
            guard.verify(&Method::PUT, path, Some(&token("a")), None),
            Err(AuthError::CsrfValidationFailed)
        ));
        assert!(matches!(
            guard.verify(&Method::PATCH, path, None, Some(&token("a"))),
            Err(AuthError::CsrfValidationFailed)
        ));
        assert!(matches!(
            guard.verify(&Method::DELETE, path, Some(&token("a")), Some(&token("b"))),
            Err(AuthError::CsrfValidationFailed)
        ));
        assert!(guard
            .verify(&Method::POST, path, Some(&token("a")), Some(&token("a")))
            .is_ok());
    }

    #[test]
    fn test_exempt_routes_bypass() {
        let config = AuthConfig::default();
        let guard = CsrfGuard::new(&config);
        assert!(guard.verify(&Method::POST, "/v1/auth/session", None, None).is_ok());
        assert!(guard.verify(&Method::POST, "/v1/users", None, None).is_ok());
        assert!(guard.verify(&Method::DELETE, "/v1/auth/session", None, None).is_err());
    }
}
