//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod csrf;
pub mod session_marker;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod update_profile;
pub mod withdraw;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::{AuthConfig, CsrfExemption};
pub use csrf::CsrfGuard;
pub use session_marker::{MarkerChange, SessionMarker};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
pub use withdraw::WithdrawUseCase;
