//! Application Configuration
//!
//! Configuration for sessions, cookies and the CSRF guard.

use std::time::Duration;

use http::Method;
use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// A method + path pair that bypasses CSRF verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfExemption {
    pub method: Method,
    pub path: String,
}

impl CsrfExemption {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && trim_trailing_slash(&self.path) == trim_trailing_slash(path)
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (24 hours)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// CSRF double-submit cookie name
    pub csrf_cookie_name: String,
    /// CSRF request header name (lowercase)
    pub csrf_header_name: String,
    /// Routes that skip CSRF verification (login, signup)
    pub csrf_exempt: Vec<CsrfExemption>,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            csrf_cookie_name: "csrf_token".to_string(),
            csrf_header_name: "x-csrf-token".to_string(),
            csrf_exempt: vec![
                CsrfExemption::new(Method::POST, "/v1/auth/session"),
                CsrfExemption::new(Method::POST, "/v1/users"),
            ],
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Session TTL as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl.as_secs() as i64)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn is_csrf_exempt(&self, method: &Method, path: &str) -> bool {
        self.csrf_exempt.iter().any(|e| e.matches(method, path))
    }

    /// HttpOnly cookie carrying the signed session reference
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }

    /// Script-readable cookie carrying the CSRF token, kept for the browser session
    pub fn csrf_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.csrf_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}
