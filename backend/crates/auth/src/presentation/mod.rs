//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, middleware and router.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session_cookie;

pub use extract::{AuthRejection, CurrentUser, JsonBody, MaybeUser, RequestTime};
pub use handlers::AuthAppState;
pub use middleware::{csrf_guard, optional_auth, request_context, require_auth};
pub use router::{auth_router, auth_routes, with_pipeline};
