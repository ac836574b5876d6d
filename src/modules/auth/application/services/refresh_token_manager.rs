use chrono::{Duration, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::ports::outgoing::refresh_token_store::{
    NewRefreshToken, RefreshTokenStore, RefreshTokenStoreError,
};
use crate::auth::application::services::secure_token::generate_secure_token;

/// Mints and retires opaque refresh tokens on top of the store.
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
    ttl_secs: i64,
}

impl fmt::Debug for RefreshTokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenManager")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl_secs: i64) -> Self {
        Self { store, ttl_secs }
    }

    /// Mint a token without persisting it. Used when the insert belongs to
    /// a larger transaction owned by another store.
    pub fn mint(&self) -> NewRefreshToken {
        NewRefreshToken {
            token: generate_secure_token(),
            expires_at: Utc::now() + Duration::seconds(self.ttl_secs),
        }
    }

    /// Mint and persist a token for the user.
    pub async fn issue(&self, user_id: Uuid) -> Result<NewRefreshToken, RefreshTokenStoreError> {
        let token = self.mint();
        self.store.insert(user_id, &token).await?;
        Ok(token)
    }

    /// Single-use redemption: returns the owning user exactly once per token.
    pub async fn consume(&self, token: &str) -> Result<Option<Uuid>, RefreshTokenStoreError> {
        self.store.consume(token).await
    }

    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenStoreError> {
        self.store.revoke(token).await
    }

    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, RefreshTokenStoreError> {
        self.store.revoke_all_for_user(user_id).await
    }
}
