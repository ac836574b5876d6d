pub mod password_hasher;
pub mod rate_limit_store;
pub mod refresh_token_store;
pub mod token_provider;
pub mod user_store;

pub use password_hasher::PasswordHasher;
pub use rate_limit_store::RateLimitStore;
pub use refresh_token_store::{NewRefreshToken, RefreshTokenStore, RefreshTokenStoreError};
pub use user_store::{CreateUserData, UserStore, UserStoreError};
