//! Value Objects
//!
//! Immutable, self-validating types used by the auth domain.

pub mod csrf_token;
pub mod email;
pub mod nickname;
pub mod session_id;
pub mod user_id;
