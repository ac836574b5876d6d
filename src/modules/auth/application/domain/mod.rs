pub mod entities;
pub mod error;

pub use entities::{User, UserProfile, UserRole};
pub use error::AuthError;
