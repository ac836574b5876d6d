use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefreshTokenStoreError {
    #[error("Database error: {0}")]
    Database(String),
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        token: &NewRefreshToken,
    ) -> Result<(), RefreshTokenStoreError>;

    /// Atomically find-and-revoke: marks the token revoked and returns its
    /// owner, but only if it was live and unexpired. Exactly one concurrent
    /// caller can win; everyone else sees `None`. Implementations must do
    /// this in a single conditional write, never read-then-write.
    async fn consume(&self, token: &str) -> Result<Option<Uuid>, RefreshTokenStoreError>;

    /// Revoke a single token. Unknown or already-revoked tokens are a no-op.
    async fn revoke(&self, token: &str) -> Result<(), RefreshTokenStoreError>;

    /// Revoke every live token of a user, returning how many were revoked.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, RefreshTokenStoreError>;
}
