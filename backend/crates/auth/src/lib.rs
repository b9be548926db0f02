//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, clock
//! - `application/` - Use cases, session marker, CSRF guard, config
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, extractors, middleware, router
//!
//! ## Features
//! - Signup, login/logout, current user, profile update, withdrawal (soft delete)
//! - Server-side sessions referenced by an HMAC-signed cookie, 24h TTL
//! - Double-submit CSRF protection for mutating requests
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Login always issues a fresh session id and drops the previous one
//! - Expired sessions are deleted when detected
//! - Withdrawn users never authenticate; all their sessions are deleted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, CsrfExemption};
pub use domain::clock::{Clock, SystemClock};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::{AuthAppState, auth_router, auth_routes, with_pipeline};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod extract {
    pub use crate::presentation::extract::*;
}
