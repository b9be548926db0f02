//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the clock.

pub mod clock;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use entity::{
    session::{Session, SessionOwner},
    user::{NewUser, User},
};
pub use repository::{SessionRepository, UserRepository};
