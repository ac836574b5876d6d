pub mod password_policy;
pub mod rate_limiter;
pub mod refresh_token_manager;
pub mod secure_token;

pub use rate_limiter::{RateLimitFlow, RateLimiter};
pub use refresh_token_manager::RefreshTokenManager;
